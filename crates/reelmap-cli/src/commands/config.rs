use anyhow::{Context, Result};
use reelmap_etl::{config, Config};

const KEYS: &[&str] = &[
    "dataset_path",
    "output_dir",
    "nearest_count",
    "nominatim_url",
    "user_agent",
    "geocode_requests_per_second",
    "geocode_max_retries",
    "logging_level",
];

/// Show the current effective configuration.
pub fn show_config() -> Result<()> {
    let config = Config::load()?;

    println!("Current Configuration");
    println!("=====================\n");

    let config_path = config::config_file_path();
    println!("Config file: {}", config_path.display());
    println!(
        "File exists: {}\n",
        if config_path.exists() {
            "yes"
        } else {
            "no (using defaults)"
        }
    );

    println!("Settings:");
    for key in KEYS {
        if let Some(value) = value_of(&config, key) {
            println!("  {key}: {value}");
        }
    }

    println!("\nPriority: CLI args > ENV vars (REEL_*) > Config file > Defaults");

    Ok(())
}

fn value_of(config: &Config, key: &str) -> Option<String> {
    let value = match key {
        "dataset_path" => config.dataset_path.display().to_string(),
        "output_dir" => config.output_dir.display().to_string(),
        "nearest_count" => config.nearest_count.to_string(),
        "nominatim_url" => config.nominatim_url.clone(),
        "user_agent" => config.user_agent.clone(),
        "geocode_requests_per_second" => config.geocode_requests_per_second.to_string(),
        "geocode_max_retries" => config.geocode_max_retries.to_string(),
        "logging_level" => config
            .logging_level
            .clone()
            .unwrap_or_else(|| String::from("<not set>")),
        _ => return None,
    };
    Some(value)
}

/// Get a specific config value.
///
/// Without a key the raw file is printed, so a file that no longer parses
/// can still be inspected.
pub fn get_config(key: Option<String>) -> Result<()> {
    if let Some(key) = key {
        let config = Config::load()?;
        match value_of(&config, &key) {
            Some(value) => println!("{value}"),
            None => anyhow::bail!(
                "Unknown config key: {}\n\nValid keys: {}",
                key,
                KEYS.join(", ")
            ),
        }
    } else {
        // No key provided, show entire config file contents
        let config_path = config::config_file_path();

        if config_path.exists() {
            let contents =
                std::fs::read_to_string(&config_path).context("Failed to read config file")?;
            print!("{}", contents);
        } else {
            println!("Config file does not exist: {}", config_path.display());
            println!("\nRun 'reelmap config init' to create it.");
        }
    }

    Ok(())
}

/// Show the config file path.
pub fn show_path() {
    println!("{}", config::config_file_path().display());
}

/// Show example configuration.
pub fn show_example() {
    print!("{}", config::example_config());
}

/// Initialize config file with defaults.
pub fn init_config() -> Result<()> {
    let created = config::ensure_config_file()?;
    let config_path = config::config_file_path();

    if created {
        println!("✓ Created config file: {}", config_path.display());
        println!("\nEdit this file to configure reelmap.");
    } else {
        println!("Config file already exists: {}", config_path.display());
    }

    Ok(())
}
