use pwup_protocol::types::config::{Network, PwConfig};
use pwup_protocol::PwResult;

mod error;
mod presets;


pub use error::ConfigError;

pub fn load_file(path: &str) -> PwResult<PwConfig> {
    let file = std::fs::read_to_string(path)
        .map_err(|err| ConfigError::LoadingConfig(path.into(), err.to_string()))?;
    let config = parse(&file).map_err(|err| ConfigError::LoadingConfig(path.into(), err.message()))?;
    Ok(config)
}

pub fn parse(content: &str) -> PwResult<PwConfig> {
    let config: PwConfig =
        toml::from_str(content).map_err(|err| ConfigError::InvalidConfig(err.to_string()))?;
    validate(&config)?;
    Ok(config)
}

/// Built-in constants of a public network.
pub fn preset(network: Network) -> PwConfig {
    match network {
        Network::Aggron4 => presets::aggron4(),
        Network::Lina => presets::lina(),
    }
}

fn validate(config: &PwConfig) -> PwResult<()> {
    if config.source_lock.code_hash == config.destination_lock.code_hash
        && config.source_lock.hash_type == config.destination_lock.hash_type
    {
        return Err(ConfigError::InvalidConfig(
            "source_lock and destination_lock must be different scripts".into(),
        )
        .into());
    }
    if config.cell_deps.is_empty() {
        return Err(ConfigError::InvalidConfig("cell_deps must not be empty".into()).into());
    }
    Ok(())
}
