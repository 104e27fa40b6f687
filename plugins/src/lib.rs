pub mod relay;
pub mod service;
pub mod settings;

pub use relay::{DirectTransport, RelayTransport};
pub use service::http::HttpOpenService;
pub use settings::file::FileSettingsStore;
