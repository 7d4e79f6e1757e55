//! Character persistence adapters

mod http_character_repository;
mod in_memory_character_repository;

pub use http_character_repository::HttpCharacterRepository;
pub use in_memory_character_repository::InMemoryCharacterRepository;
