use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use treadle::WorkItem;
use uuid::Uuid;

/// One run of the import pipeline over an IMDb locations list.
///
/// This is the treadle `WorkItem` that flows through the extract → geocode
/// stages. Every run gets a fresh id so that a previous run recorded in the
/// state store never causes a new one to be skipped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportJob {
    id: String,
    /// Path to the `locations.list` being imported.
    pub source: PathBuf,
}

impl ImportJob {
    #[must_use]
    pub fn new(source: PathBuf) -> Self {
        Self::with_id(format!("import-{}", Uuid::new_v4()), source)
    }

    #[must_use]
    pub fn with_id(id: impl Into<String>, source: PathBuf) -> Self {
        Self {
            id: id.into(),
            source,
        }
    }
}

impl WorkItem for ImportJob {
    fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for ImportJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source.display())
    }
}
