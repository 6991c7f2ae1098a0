//! Vocabulary and term persistence

pub mod init;
pub mod models;
pub mod retry;
pub mod terms;
pub mod vocabularies;

pub use init::*;
pub use models::*;
pub use retry::*;
pub use terms::*;
pub use vocabularies::*;
