//! Configuration commands.

use std::io::Write;
use std::path::Path;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Dump the current configuration.
pub fn dump(config: &ClientConfig, path: &Path, out: &mut dyn Write) -> ClientResult<()> {
    let toml_str = toml::to_string_pretty(config)
        .map_err(|e| ClientError::Config(format!("failed to serialize config: {}", e)))?;
    writeln!(out, "# config.toml ({})", path.display())?;
    writeln!(out, "{}", toml_str)?;

    Ok(())
}

/// Validate the configuration.
pub fn validate(config: &ClientConfig, out: &mut dyn Write) -> ClientResult<()> {
    config.validate().map_err(ClientError::Config)?;

    if let Some(ref joined) = config.communities.joined {
        let directory = config.community_directory();
        for id in joined.iter().filter(|id| directory.get(id).is_none()) {
            writeln!(out, "warning: unknown community id {:?}", id)?;
        }
    }

    writeln!(out, "Configuration is valid.")?;
    Ok(())
}

/// Show the configuration file path.
pub fn path(path: &Path, out: &mut dyn Write) -> ClientResult<()> {
    writeln!(out, "config: {}", path.display())?;
    Ok(())
}
