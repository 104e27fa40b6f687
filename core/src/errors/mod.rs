pub mod open_error;
pub mod service_error;
pub mod settings_error;

pub use open_error::OpenError;
pub use service_error::{ServiceError, GENERIC_REJECTION};
pub use settings_error::SettingsError;
