pub mod credentials;
pub mod data;
pub mod io;
pub mod printing;

pub use credentials::{ApiCredentials, CredentialsError};
pub use data::{path_display, Config, ConfigKey};
pub use io::ConfigError;
