pub mod base;
pub mod file_store;
pub mod memory_store;
pub mod preferences;
pub mod tokens;

// Re-export the primary store items so code outside can do
// "use crate::store::{Storage, TokenStore, create_storage};"
pub use base::{create_storage, keys, Storage};
pub use file_store::FileStorage;
pub use memory_store::MemoryStorage;
pub use preferences::{Language, Preferences, Theme};
pub use tokens::TokenStore;
