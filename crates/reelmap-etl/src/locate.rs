//! Geocode stage: turn staged IMDb entries into dataset records.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use reelmap_core::{GeoPoint, LocationRecord};
use treadle::{Stage, StageContext, StageOutcome};

use crate::extract::read_staging;
use crate::geocode::Geocoder;

type StageResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Counts from one geocoding pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GeocodeSummary {
    /// Records written to the dataset.
    pub written: usize,
    /// Entries dropped because their place could not be resolved.
    pub unresolved: usize,
    /// Distinct place names sent to the geocoder.
    pub lookups: usize,
    /// Lookups that ended in an error rather than an answer.
    pub failed: usize,
}

/// The Geocode stage: resolve every staged place and write the dataset.
///
/// Each distinct place name is looked up once per run. Places the geocoder
/// does not know, or fails on, are dropped with a warning; the dataset only
/// ever holds records with valid coordinates.
///
/// When every lookup fails the stage fails and the existing dataset is left
/// alone. The dataset is replaced by rename, and the staging file is removed
/// once the new dataset is in place.
#[derive(Debug)]
pub struct GeocodeStage<G> {
    geocoder: G,
    staging_path: PathBuf,
    dataset_path: PathBuf,
}

impl<G: Geocoder> GeocodeStage<G> {
    #[must_use]
    pub fn new(geocoder: G, staging_path: PathBuf, dataset_path: PathBuf) -> Self {
        Self {
            geocoder,
            staging_path,
            dataset_path,
        }
    }

    /// `Err` carries nothing: the failure has already been logged.
    async fn resolve(&self, place: &str) -> Result<Option<GeoPoint>, ()> {
        match self.geocoder.locate(place).await {
            Ok(Some(point)) => Ok(Some(point)),
            Ok(None) => {
                log::warn!("No coordinates found for {:?}", place);
                Ok(None)
            }
            Err(e) => {
                log::warn!("Geocoding {:?} failed: {}", place, e);
                Err(())
            }
        }
    }

    async fn geocode_entries(&self) -> StageResult<GeocodeSummary> {
        let entries = read_staging(&self.staging_path)?;
        log::info!("Geocoding {} entries", entries.len());

        let mut positions: HashMap<String, Option<GeoPoint>> = HashMap::new();
        let mut records = Vec::with_capacity(entries.len());
        let mut summary = GeocodeSummary::default();

        for entry in entries {
            let position = match positions.get(&entry.place) {
                Some(known) => *known,
                None => {
                    summary.lookups += 1;
                    let found = self.resolve(&entry.place).await.unwrap_or_else(|()| {
                        summary.failed += 1;
                        None
                    });
                    positions.insert(entry.place.clone(), found);
                    found
                }
            };

            match position {
                Some(point) => {
                    records.push(LocationRecord::new(entry.title, entry.year, entry.place, point));
                }
                None => summary.unresolved += 1,
            }
        }

        if summary.lookups > 0 && summary.failed == summary.lookups {
            return Err(format!(
                "all {} geocoding lookups failed; {} left unchanged",
                summary.lookups,
                self.dataset_path.display()
            )
            .into());
        }

        write_dataset(&self.dataset_path, &records)?;
        summary.written = records.len();

        if let Err(e) = std::fs::remove_file(&self.staging_path) {
            log::warn!(
                "Could not remove staging file {}: {}",
                self.staging_path.display(),
                e
            );
        }
        Ok(summary)
    }
}

/// Write records in the dataset format, one per line.
///
/// The records go to a sibling `.tmp` file first, which then replaces `path`.
fn write_dataset(path: &Path, records: &[LocationRecord]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut tmp_name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "dataset".into());
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    let mut out = BufWriter::new(File::create(&tmp_path)?);
    for record in records {
        writeln!(out, "{record}")?;
    }
    out.flush()?;
    drop(out);

    std::fs::rename(&tmp_path, path)
}

#[async_trait::async_trait]
impl<G: Geocoder + 'static> Stage for GeocodeStage<G> {
    fn name(&self) -> &str {
        "geocode"
    }

    async fn execute(
        &self,
        _item: &dyn treadle::WorkItem,
        ctx: &mut StageContext,
    ) -> treadle::Result<StageOutcome> {
        match self.geocode_entries().await {
            Ok(summary) => {
                log::info!(
                    "Geocode complete: {} records written to {}, {} unresolved ({} lookups, {} failed)",
                    summary.written,
                    self.dataset_path.display(),
                    summary.unresolved,
                    summary.lookups,
                    summary.failed
                );
                ctx.metadata
                    .insert("written".to_string(), serde_json::json!(summary.written));
                ctx.metadata
                    .insert("unresolved".to_string(), serde_json::json!(summary.unresolved));
                Ok(StageOutcome::Complete)
            }
            Err(e) => Err(treadle::TreadleError::StageExecution(format!(
                "Geocode failed: {e}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{GeocodeError, GeocodeResult};
    use crate::imdb::ImdbEntry;
    use crate::work_item::ImportJob;
    use reelmap_core::{LocationIndex, RecordParser};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    #[derive(Debug, Default)]
    struct FakeGeocoder {
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl Geocoder for FakeGeocoder {
        async fn locate(&self, place: &str) -> GeocodeResult<Option<GeoPoint>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match place {
                "Paris, France" => Ok(Some(GeoPoint::new(48.8566, 2.3522)?)),
                "Berlin, Germany" => Ok(Some(GeoPoint::new(52.52, 13.405)?)),
                "Offline" => Err(GeocodeError::RateLimited {
                    source_name: "fake".to_string(),
                }),
                _ => Ok(None),
            }
        }
    }

    fn entry(title: &str, year: i32, place: &str) -> ImdbEntry {
        ImdbEntry {
            title: title.to_string(),
            year,
            place: place.to_string(),
        }
    }

    fn stage_with(entries: &[ImdbEntry], dir: &TempDir) -> GeocodeStage<FakeGeocoder> {
        let staging_path = dir.path().join("staging.json");
        std::fs::write(&staging_path, serde_json::to_string(entries).unwrap()).unwrap();
        GeocodeStage::new(
            FakeGeocoder::default(),
            staging_path,
            dir.path().join("out").join("locations.tsv"),
        )
    }

    #[tokio::test]
    async fn test_geocode_writes_parseable_dataset() {
        let dir = TempDir::new().unwrap();
        let stage = stage_with(
            &[
                entry("Hugo", 2011, "Paris, France"),
                entry("Hanna", 2011, "Berlin, Germany"),
                entry("Midnight in Paris", 2011, "Paris, France"),
            ],
            &dir,
        );

        let summary = stage.geocode_entries().await.unwrap();
        assert_eq!(
            summary,
            GeocodeSummary {
                written: 3,
                unresolved: 0,
                lookups: 2,
                failed: 0,
            }
        );
        assert_eq!(stage.geocoder.calls.load(Ordering::SeqCst), 2);

        let parser = RecordParser::with_year_range(1880..=2030);
        let (index, report) = LocationIndex::load(&stage.dataset_path, &parser).unwrap();
        assert!(report.is_clean());
        assert_eq!(index.by_year(2011).len(), 3);
        assert_eq!(index.by_title_and_year("hugo", 2011)[0].place_name, "Paris, France");
    }

    #[tokio::test]
    async fn test_geocode_drops_unresolved_places() {
        let dir = TempDir::new().unwrap();
        let stage = stage_with(
            &[
                entry("Hugo", 2011, "Paris, France"),
                entry("Lost", 2011, "Atlantis"),
                entry("Down", 2011, "Offline"),
                entry("Lost Again", 2011, "Atlantis"),
            ],
            &dir,
        );

        let summary = stage.geocode_entries().await.unwrap();
        assert_eq!(summary.written, 1);
        assert_eq!(summary.unresolved, 3);
        assert_eq!(summary.lookups, 3);
        assert_eq!(summary.failed, 1);
    }

    #[tokio::test]
    async fn test_geocode_removes_staging_file() {
        let dir = TempDir::new().unwrap();
        let stage = stage_with(&[entry("Hugo", 2011, "Paris, France")], &dir);

        stage.geocode_entries().await.unwrap();

        assert!(stage.dataset_path.exists());
        assert!(!stage.staging_path.exists());
        assert!(!dir.path().join("out").join("locations.tsv.tmp").exists());
    }

    #[tokio::test]
    async fn test_execute_keeps_dataset_when_every_lookup_fails() {
        let dir = TempDir::new().unwrap();
        let stage = stage_with(
            &[
                entry("Down", 2011, "Offline"),
                entry("Down Again", 2012, "Offline"),
            ],
            &dir,
        );
        let existing = "Hugo\t2011\tParis, France\t48.8566\t2.3522\n";
        std::fs::create_dir_all(stage.dataset_path.parent().unwrap()).unwrap();
        std::fs::write(&stage.dataset_path, existing).unwrap();

        let job = ImportJob::with_id("test-job", PathBuf::from("locations.list"));
        let mut ctx = StageContext::new("geocode".to_string());
        let result = stage.execute(&job, &mut ctx).await;

        assert!(matches!(
            result,
            Err(treadle::TreadleError::StageExecution(_))
        ));
        assert_eq!(std::fs::read_to_string(&stage.dataset_path).unwrap(), existing);
        assert!(stage.staging_path.exists());
    }

    #[tokio::test]
    async fn test_execute_records_counts() {
        let dir = TempDir::new().unwrap();
        let stage = stage_with(&[entry("Hugo", 2011, "Paris, France")], &dir);
        let job = ImportJob::with_id("test-job", PathBuf::from("locations.list"));
        let mut ctx = StageContext::new("geocode".to_string());

        let outcome = stage.execute(&job, &mut ctx).await.unwrap();
        assert!(matches!(outcome, StageOutcome::Complete));
        assert_eq!(ctx.metadata.get("written"), Some(&serde_json::json!(1)));
        assert_eq!(ctx.metadata.get("unresolved"), Some(&serde_json::json!(0)));
    }

    #[tokio::test]
    async fn test_execute_without_staging_fails() {
        let dir = TempDir::new().unwrap();
        let stage = GeocodeStage::new(
            FakeGeocoder::default(),
            dir.path().join("missing.json"),
            dir.path().join("locations.tsv"),
        );
        let job = ImportJob::with_id("test-job", PathBuf::from("locations.list"));
        let mut ctx = StageContext::new("geocode".to_string());

        assert!(stage.execute(&job, &mut ctx).await.is_err());
    }
}
