// src/infrastructure/mod.rs
pub mod auth;
pub mod config;
pub mod database;
pub mod note_store;
pub mod object_store;
pub mod renderer;
pub mod session_file;

pub use auth::SqliteAuth;
pub use config::Config;
pub use database::open_database;
pub use note_store::SqliteNoteStore;
pub use object_store::LocalObjectStore;
pub use renderer::BrowserRenderer;
pub use session_file::SessionFile;
