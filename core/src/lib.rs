pub mod anchor;
pub mod classify;
pub mod dom;
pub mod errors;
pub mod service;
pub mod session;
pub mod settings;
pub mod trigger;
pub mod types;
pub mod watcher;

pub use session::Session;
