// Re-export modules for the binary and integration tests
pub mod auth;
pub mod conversations;
pub mod filter;
pub mod models;
pub mod seed;
pub mod settings;

// Re-export main types for convenience
pub use conversations::ConversationStore;
pub use models::*;
