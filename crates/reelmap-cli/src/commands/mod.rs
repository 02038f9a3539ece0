pub mod config;
pub mod import;
pub mod map;
pub mod status;

pub use import::run_import;
pub use map::run_map;
pub use status::show_status;

use anyhow::{Context, Result};
use reelmap_core::{LocationIndex, RecordParser};
use reelmap_etl::Config;

/// Load the dataset named by the configuration, reporting skipped lines.
pub fn load_index(config: &Config, strict: bool) -> Result<LocationIndex> {
    let parser = RecordParser::new();
    let (index, report) = LocationIndex::load(&config.dataset_path, &parser).with_context(|| {
        format!(
            "Could not load dataset {}\n\nRun 'reelmap import <locations.list>' to build one, or pass --dataset.",
            config.dataset_path.display()
        )
    })?;

    if strict {
        report.into_strict()?;
    } else if !report.is_clean() {
        println!(
            "  ⚠ Skipped {} malformed line(s) in {} (see --strict)",
            report.skipped.len(),
            config.dataset_path.display()
        );
    }

    Ok(index)
}
