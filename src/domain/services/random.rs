//! Random source seam
//!
//! Combat and character generation draw every random number through this trait
//! so tests can script outcomes.

pub trait RandomPort: Send + Sync {
    /// Uniform draw in `[0, 1)`.
    fn next_float(&self) -> f64;

    /// Uniform draw in `[0, bound)`; returns 0 when `bound` is 0.
    fn next_int(&self, bound: u32) -> u32 {
        if bound == 0 {
            return 0;
        }
        ((self.next_float() * f64::from(bound)) as u32).min(bound - 1)
    }
}
