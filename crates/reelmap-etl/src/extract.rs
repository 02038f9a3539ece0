use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

use treadle::{Stage, StageContext, StageOutcome};

use crate::imdb::{read_entries, ImdbEntry};

type StageResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// The Extract stage: read an IMDb locations list into a staging file.
///
/// The staging file is a JSON array of [`ImdbEntry`] consumed by the
/// geocode stage.
#[derive(Debug)]
pub struct ExtractStage {
    list_path: PathBuf,
    staging_path: PathBuf,
    year: Option<i32>,
}

impl ExtractStage {
    #[must_use]
    pub fn new(list_path: PathBuf, staging_path: PathBuf, year: Option<i32>) -> Self {
        Self {
            list_path,
            staging_path,
            year,
        }
    }

    fn extract(&self) -> StageResult<usize> {
        let file = File::open(&self.list_path)?;
        let entries = read_entries(BufReader::new(file), self.year)?;

        if let Some(parent) = self.staging_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let out = BufWriter::new(File::create(&self.staging_path)?);
        serde_json::to_writer(out, &entries)?;

        Ok(entries.len())
    }
}

/// Read back what [`ExtractStage`] wrote.
///
/// # Errors
/// Returns an error if the file is missing or not a staging file.
pub fn read_staging(path: &std::path::Path) -> StageResult<Vec<ImdbEntry>> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

#[async_trait::async_trait]
impl Stage for ExtractStage {
    fn name(&self) -> &str {
        "extract"
    }

    async fn execute(
        &self,
        _item: &dyn treadle::WorkItem,
        ctx: &mut StageContext,
    ) -> treadle::Result<StageOutcome> {
        log::info!("Extracting locations from {}", self.list_path.display());

        match self.extract() {
            Ok(count) => {
                log::info!("Extract complete: {} distinct entries", count);
                ctx.metadata
                    .insert("extracted".to_string(), serde_json::json!(count));
                Ok(StageOutcome::Complete)
            }
            Err(e) => Err(treadle::TreadleError::StageExecution(format!(
                "Extract failed: {e}"
            ))),
        }
    }
}
