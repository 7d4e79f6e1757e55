//! Random sources backing `RandomPort`

use rand::Rng;

use crate::domain::services::RandomPort;

/// Draws from the thread-local generator
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl RandomPort for ThreadRandom {
    fn next_float(&self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }

    fn next_int(&self, bound: u32) -> u32 {
        if bound == 0 {
            return 0;
        }
        rand::thread_rng().gen_range(0..bound)
    }
}

/// Replays a fixed script of draws, wrapping around at the end
#[cfg(test)]
pub struct ScriptedRandom {
    values: Vec<f64>,
    cursor: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl ScriptedRandom {
    pub fn cycle(values: impl Into<Vec<f64>>) -> Self {
        let values = values.into();
        assert!(!values.is_empty(), "script needs at least one value");
        Self {
            values,
            cursor: std::sync::atomic::AtomicUsize::new(0),
        }
    }
}

#[cfg(test)]
impl RandomPort for ScriptedRandom {
    fn next_float(&self) -> f64 {
        let i = self
            .cursor
            .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        self.values[i % self.values.len()]
    }
}
