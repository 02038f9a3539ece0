use anyhow::Result;

use reelmap_etl::{pipeline, Config};

/// Number of busiest years listed.
const TOP_YEARS: usize = 10;

pub fn show_status(config: &Config) -> Result<()> {
    println!("\n📊 Reelmap Status\n");
    println!("  Dataset: {}", config.dataset_path.display());

    if !config.dataset_path.exists() {
        println!("  Dataset does not exist yet.");
        println!("\n  Run `reelmap import <locations.list>` to build it");
        return Ok(());
    }

    let index = super::load_index(config, false)?;
    let counts = index.year_counts();

    println!("  Locations: {}", index.len());
    println!("  Years covered: {}", counts.len());
    if let (Some(first), Some(last)) = (counts.keys().next(), counts.keys().next_back()) {
        println!("  Range: {first}–{last}");
    }

    let mut busiest: Vec<(i32, usize)> = counts.into_iter().collect();
    busiest.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    if !busiest.is_empty() {
        println!("\n  Busiest years:");
        for (year, count) in busiest.into_iter().take(TOP_YEARS) {
            println!("    {year}: {count}");
        }
    }

    if pipeline::staging_path(&config.dataset_path).exists() {
        println!("\n  An import staging file is present; `reelmap import` may not have finished");
    }

    Ok(())
}
