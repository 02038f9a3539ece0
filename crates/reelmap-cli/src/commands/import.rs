use anyhow::{Context, Result};
use std::path::PathBuf;

use reelmap_etl::{build_import_pipeline, config, Config, ImportJob, NominatimGeocoder};

/// Run the extract → geocode pipeline over an IMDb locations list.
pub async fn run_import(list: PathBuf, year: Option<i32>, config: &Config) -> Result<()> {
    println!("\n🎬 Reelmap Import\n");
    println!("  Locations list: {}", list.display());
    println!("  Dataset: {}", config.dataset_path.display());
    if let Some(year) = year {
        println!("  Year: {year}");
    }
    println!(
        "  Geocoder: {} ({} request(s)/s)",
        config.nominatim_url, config.geocode_requests_per_second
    );
    println!();

    let geocoder = NominatimGeocoder::from_config(config).context("Failed to create geocoder")?;
    let workflow =
        build_import_pipeline(list.clone(), config.dataset_path.clone(), year, geocoder)
            .context("Failed to build pipeline")?;

    let state_dir = config::data_dir();
    std::fs::create_dir_all(&state_dir).context("Failed to create data directory")?;
    let state_path = state_dir.join("pipeline.db");
    let mut store = treadle::SqliteStateStore::open(&state_path)
        .await
        .context("Failed to open pipeline state store")?;

    let job = ImportJob::new(list);
    log::debug!("Starting {}", job);

    // Subscribe to events for progress display
    let mut events = workflow.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                treadle::WorkflowEvent::StageStarted { stage, .. } => {
                    println!("  ⏳ [{stage}] Starting...");
                }
                treadle::WorkflowEvent::StageCompleted { stage, .. } => {
                    println!("  ✓ [{stage}] Complete");
                }
                treadle::WorkflowEvent::StageFailed { stage, error, .. } => {
                    eprintln!("  ✗ [{stage}] FAILED: {error}");
                }
                _ => {}
            }
        }
    });

    workflow
        .advance(&job, &mut store)
        .await
        .context("Import pipeline failed")?;

    println!("\n✓ Import complete!");
    println!("\nNext steps:");
    println!("  - Run 'reelmap status' to see what the dataset contains");
    println!("  - Run 'reelmap map' to map a film");

    Ok(())
}
