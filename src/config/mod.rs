pub mod loader;
pub mod settings;
pub mod validator;

pub use settings::{ClientConfig, LogFormat, LoggingConfig, RetryConfig};
