//! Configuration
//!
//! Settings are layered: built-in defaults, then a config file, then
//! environment variables, then command-line overrides. See [`ConfigLoader`].

pub mod env_loader;
pub mod file_loader;
pub mod loader;
pub mod logging_config;
pub mod model;

pub use env_loader::{apply_env, apply_process_env};
pub use file_loader::load_from_file;
pub use loader::{ConfigLoader, ConfigOverrides, ConfigSource};
pub use logging_config::{LogFormat, LoggingConfig};
pub use model::{ChatConfig, DEFAULT_BASE_URL, DEFAULT_MODEL, ProviderSettings};
