use std::path::Path;

use tracing::{debug, info};

/// Loads `DATABASE_URL` (and any overrides) from a local `.env` file.
/// The file is optional: deployments set real environment variables.
pub fn load_environment() -> Result<(), Box<dyn std::error::Error>> {
    load_env_file(".env")
}

pub(crate) fn load_env_file(path: &str) -> Result<(), Box<dyn std::error::Error>> {
    if !Path::new(path).exists() {
        debug!("Environment file {} not found, skipping", path);
        return Ok(());
    }

    dotenvy::from_filename_override(path)?;
    info!("Loaded environment from: {}", path);
    Ok(())
}
