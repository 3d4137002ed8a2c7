use anyhow::{Context, Result};
use clap::Args;
use std::path::Path;

use crate::adapters::sqlite::initialize_database;
use crate::domain::models::Config;

#[derive(Args)]
pub struct InitArgs {
    /// Overwrite an existing config file
    #[arg(long)]
    pub force: bool,
}

/// Write the default config file (unless one exists) and create the
/// database with the schema applied, so the first real command starts
/// from a working setup.
pub async fn execute(args: &InitArgs, config: &Config, json: bool) -> Result<()> {
    let config_path = Path::new(".reelcache/config.yaml");

    let config_written = if config_path.exists() && !args.force {
        false
    } else {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let rendered = serde_yaml::to_string(&Config::default())?;
        std::fs::write(config_path, rendered)
            .with_context(|| format!("Failed to write {}", config_path.display()))?;
        true
    };

    let pool = initialize_database(&config.database.url(), None).await?;
    pool.close().await;

    if json {
        println!(
            "{}",
            serde_json::json!({
                "config": config_path.display().to_string(),
                "config_written": config_written,
                "database": config.database.path,
            })
        );
    } else {
        if config_written {
            println!("Wrote {}", config_path.display());
        } else {
            println!(
                "{} already exists, keeping it (use --force to overwrite)",
                config_path.display()
            );
        }
        println!("Database ready at {}", config.database.path);
        println!("Set REELCACHE_KINOPOISK__API_KEY and REELCACHE_SEARCHAPI__API_KEY to go online.");
    }
    Ok(())
}
