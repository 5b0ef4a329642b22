pub mod cli;
pub mod config;
pub mod db;
pub mod debounce;
pub mod error;
pub mod html;
pub mod logging;
pub mod models;
pub mod prefs;
pub mod repo;
pub mod session;
pub mod store;
pub mod transfer;

pub use db::Database;
pub use error::NoteError;
pub use repo::NoteRepository;
pub use session::Session;
pub use store::{LocalStore, MemoryStore};
