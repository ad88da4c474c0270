//! `lbprobe config ...`

use anyhow::{Context, Result};
use lbprobe_config::{ConfigLoader, LbProbeConfig};
use std::fs;
use std::path::Path;
use tracing::{error, info};

/// Handle configuration validation
pub fn handle_config_validate(config_file: &Path) -> Result<()> {
    info!("Validating configuration file: {:?}", config_file);

    if !config_file.exists() {
        return Err(anyhow::anyhow!(
            "Configuration file not found: {:?}",
            config_file
        ));
    }

    match ConfigLoader::new().from_file(config_file) {
        Ok(_config) => {
            println!("Configuration file is valid");
            info!("Configuration validation passed");
            Ok(())
        }
        Err(e) => {
            println!("Configuration validation failed: {}", e);
            error!("Configuration validation failed: {}", e);
            Err(e.into())
        }
    }
}

/// Handle configuration generation
pub fn handle_config_generate(output: Option<&Path>, force: bool) -> Result<()> {
    let sample = LbProbeConfig::generate_sample();

    let Some(output) = output else {
        print!("{}", sample);
        return Ok(());
    };

    info!("Generating configuration at: {:?}", output);

    if output.exists() && !force {
        return Err(anyhow::anyhow!(
            "Output file already exists: {:?}. Use --force to overwrite.",
            output
        ));
    }

    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent).context("Failed to create output directory")?;
    }

    fs::write(output, sample)
        .with_context(|| format!("Failed to write configuration to {:?}", output))?;
    println!("Configuration written to {}", output.display());
    Ok(())
}

/// Handle showing the effective configuration
pub fn handle_config_show(config: &LbProbeConfig, format: &str) -> Result<()> {
    let rendered = match format.to_lowercase().as_str() {
        "yaml" => serde_yaml::to_string(config).context("Failed to serialize configuration")?,
        "json" => {
            serde_json::to_string_pretty(config).context("Failed to serialize configuration")?
        }
        other => {
            return Err(anyhow::anyhow!(
                "Unsupported format '{}'. Use yaml or json.",
                other
            ))
        }
    };
    println!("{}", rendered);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_then_validate() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("lbprobe.yaml");

        handle_config_generate(Some(&path), false).unwrap();
        assert!(handle_config_validate(&path).is_ok());

        // Refuses to clobber without --force
        assert!(handle_config_generate(Some(&path), false).is_err());
        assert!(handle_config_generate(Some(&path), true).is_ok());
    }

    #[test]
    fn test_validate_reports_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.yaml");
        fs::write(&path, "target:\n  expected_replicas: 0\n").unwrap();

        assert!(handle_config_validate(&path).is_err());
        assert!(handle_config_validate(&dir.path().join("missing.yaml")).is_err());
    }

    #[test]
    fn test_show_rejects_unknown_format() {
        let config = LbProbeConfig::default();
        assert!(handle_config_show(&config, "json").is_ok());
        assert!(handle_config_show(&config, "toml").is_err());
    }
}
