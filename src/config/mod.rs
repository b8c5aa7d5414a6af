//! Configuration management
//!
//! Configuration is loaded from a TOML file with `${VAR}` environment
//! substitution and `NIVEX_*` environment overrides, then validated before
//! anything touches the network. Credentials are held as [`SecretString`]
//! so they never appear in debug output or logs.

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used items
pub use loader::load_config;
pub use schema::{
    ApplicationConfig, AuthConfig, DriveConfig, EarthEngineConfig, ExportConfig, LoggingConfig,
    NivexConfig, UpstreamConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
