use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Database path is not empty
/// - Dump file name is a bare file name
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.database.path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "database.path cannot be empty".to_string(),
        ));
    }

    let filename = &config.dump.default_filename;
    if filename.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "dump.default_filename cannot be empty".to_string(),
        ));
    }
    if filename.contains('/') || filename.contains('\\') {
        return Err(ConfigError::ValidationError(format!(
            "dump.default_filename must not contain path separators: {}",
            filename
        )));
    }

    Ok(())
}
