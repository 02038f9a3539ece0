use std::path::{Path, PathBuf};
use treadle::Workflow;

use crate::geocode::Geocoder;
use crate::{ExtractStage, GeocodeStage};

/// Staging file sitting next to the dataset it feeds.
///
/// `/data/locations.tsv` stages into `/data/locations.tsv.staging.json`.
pub fn staging_path(dataset_path: &Path) -> PathBuf {
    let mut name = dataset_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "dataset".into());
    name.push(".staging.json");
    dataset_path.with_file_name(name)
}

/// Build the extract + geocode import pipeline.
///
/// # Errors
/// Returns an error if the workflow cannot be built.
pub fn build_import_pipeline<G: Geocoder + 'static>(
    list_path: PathBuf,
    dataset_path: PathBuf,
    year: Option<i32>,
    geocoder: G,
) -> treadle::Result<Workflow> {
    let staging = staging_path(&dataset_path);
    let extract_stage = ExtractStage::new(list_path, staging.clone(), year);
    let geocode_stage = GeocodeStage::new(geocoder, staging, dataset_path);

    Workflow::builder()
        .stage("extract", extract_stage)
        .stage("geocode", geocode_stage)
        .dependency("geocode", "extract")
        .build()
}
