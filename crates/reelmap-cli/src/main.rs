use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use reelmap_etl::Config;

mod commands;
mod logging;

#[derive(Debug, Parser)]
#[command(name = "reelmap", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// Map a film's locations and the filming locations nearest to you
    ///
    /// Looks up every location recorded for the film in the given year and
    /// ranks all of that year's locations by great-circle distance from your
    /// position. The result is written as an HTML map with three layers:
    ///
    /// - Your location
    /// - Nearest film points (the N closest locations of that year)
    /// - The film's own locations
    ///
    /// Any of --year, --title and --location that is left out is asked for
    /// interactively. Use --place to geocode an address instead of typing
    /// coordinates.
    ///
    /// Output file: <output_dir>/<Title_With_Underscores>_<year>_film_map.html
    Map {
        /// Release year of the film
        #[arg(long)]
        year: Option<i32>,

        /// Film title (case-insensitive, exact match)
        #[arg(long)]
        title: Option<String>,

        /// Your position as "lat, lon"
        #[arg(long, conflicts_with = "place", allow_hyphen_values = true)]
        location: Option<String>,

        /// Your position as a place name, resolved through Nominatim
        #[arg(long)]
        place: Option<String>,

        /// Number of nearby locations to show
        #[arg(short = 'k', long)]
        nearest: Option<usize>,

        /// Path to the location dataset
        #[arg(long)]
        dataset: Option<PathBuf>,

        /// Directory the map is written to
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Fail on the first malformed dataset line instead of skipping it
        #[arg(long)]
        strict: bool,

        /// Print the result as JSON instead of writing a map
        #[arg(long)]
        json: bool,
    },
    /// Build the location dataset from an IMDb locations.list
    ///
    /// Runs the import pipeline:
    ///
    /// - extract: parse the list, drop duplicates, optionally keep one year
    /// - geocode: resolve each distinct place through Nominatim and write
    ///   the dataset
    ///
    /// Places that cannot be resolved are logged and left out. Geocoding
    /// respects geocode_requests_per_second; the public Nominatim instance
    /// allows one request per second, so a full list takes a long time.
    Import {
        /// Path to locations.list
        list: PathBuf,

        /// Where to write the dataset (default: dataset_path from config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Only import locations of this year
        #[arg(long)]
        year: Option<i32>,
    },
    /// Show what the location dataset contains
    Status {
        /// Path to the location dataset
        #[arg(long)]
        dataset: Option<PathBuf>,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, clap::Subcommand)]
enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Print one setting, or the whole config file without a key
    Get {
        key: Option<String>,
    },
    /// Print the config file path
    Path,
    /// Print an example config file
    Example,
    /// Create the config file if it does not exist
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Config commands must work even when the config file does not parse.
    if let Commands::Config { action } = cli.command {
        logging::setup(cli.verbose, None)?;
        return run_config(action);
    }

    let config = Config::load()?;

    logging::setup(cli.verbose, config.logging_level.as_deref())?;
    log::debug!("Loaded configuration: {:?}", config);

    match cli.command {
        Commands::Map {
            year,
            title,
            location,
            place,
            nearest,
            dataset,
            output,
            strict,
            json,
        } => {
            let config = config.with_overrides(dataset, output, nearest);
            let args = commands::map::MapArgs {
                year,
                title,
                location,
                place,
                strict,
                json,
            };
            commands::run_map(args, &config).await?;
        }
        Commands::Import { list, output, year } => {
            let config = config.with_overrides(output, None, None);
            commands::run_import(list, year, &config).await?;
        }
        Commands::Status { dataset } => {
            let config = config.with_overrides(dataset, None, None);
            commands::show_status(&config)?;
        }
        Commands::Config { action } => run_config(action)?,
    }

    Ok(())
}

fn run_config(action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => commands::config::show_config()?,
        ConfigAction::Get { key } => commands::config::get_config(key)?,
        ConfigAction::Path => commands::config::show_path(),
        ConfigAction::Example => commands::config::show_example(),
        ConfigAction::Init => commands::config::init_config()?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(target_os = "linux")]
    #[test]
    fn test_config_commands_survive_broken_config_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let config_dir = dir.path().join("reelmap");
        std::fs::create_dir_all(&config_dir).unwrap();
        std::fs::write(config_dir.join("config.toml"), "nearest_count = [unclosed\n").unwrap();
        std::env::set_var("XDG_CONFIG_HOME", dir.path());

        assert!(run_config(ConfigAction::Path).is_ok());
        assert!(run_config(ConfigAction::Example).is_ok());
        assert!(run_config(ConfigAction::Get { key: None }).is_ok());
        assert!(run_config(ConfigAction::Show).is_err());
    }
}
