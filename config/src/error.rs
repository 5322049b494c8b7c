use pwup_protocol::derive_more::Display;
use pwup_protocol::types::error::{ErrorType, PwError};

#[derive(Display, Debug)]
pub enum ConfigError {
    #[display(fmt = "Invalid config path: {}, reason = {}", _0, _1)]
    LoadingConfig(String, String),

    #[display(fmt = "Invalid config value, reason = {}", _0)]
    InvalidConfig(String),
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for PwError {
    fn from(error: ConfigError) -> PwError {
        PwError::new(ErrorType::Config, Box::new(error))
    }
}
