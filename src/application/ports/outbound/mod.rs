//! Outbound ports - Interfaces the application needs from infrastructure

mod character_repository_port;

pub use character_repository_port::{CharacterRepositoryPort, RepoError};
