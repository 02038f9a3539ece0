//! The in-memory location index.
//!
//! Built once from the dataset and read-only afterwards. Every lookup is a
//! linear scan in dataset order.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{Error, MalformedRecord, Result};
use crate::model::LocationRecord;
use crate::parse::RecordParser;

/// Outcome of loading a dataset: what was kept and what was skipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub skipped: Vec<MalformedRecord>,
}

impl LoadReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }

    /// Turn the first skipped line into an error.
    ///
    /// # Errors
    /// Returns [`Error::MalformedRecord`] when any line was skipped.
    pub fn into_strict(self) -> Result<()> {
        match self.skipped.into_iter().next() {
            Some(malformed) => Err(Error::MalformedRecord(malformed)),
            None => Ok(()),
        }
    }
}

/// Read-only collection of validated filming locations.
#[derive(Debug, Clone, Default)]
pub struct LocationIndex {
    records: Vec<LocationRecord>,
}

/// Lowercase and trim a title for comparison.
fn normalize_title(title: &str) -> String {
    title.trim().to_lowercase()
}

impl LocationIndex {
    /// Build an index from already-validated records.
    #[must_use]
    pub fn new(records: Vec<LocationRecord>) -> Self {
        Self { records }
    }

    /// Load the dataset at `path`.
    ///
    /// Malformed lines are skipped and listed in the returned
    /// [`LoadReport`]; they never abort the load.
    ///
    /// # Errors
    /// Returns [`Error::DatasetUnavailable`] if the file cannot be opened or
    /// read.
    pub fn load(path: impl AsRef<Path>, parser: &RecordParser) -> Result<(Self, LoadReport)> {
        let path = path.as_ref();
        let unavailable = |source| Error::DatasetUnavailable {
            path: path.to_path_buf(),
            source,
        };

        let file = File::open(path).map_err(unavailable)?;
        let (index, report) = Self::from_reader(BufReader::new(file), parser).map_err(unavailable)?;

        log::info!(
            "Loaded {} records from {} ({} skipped)",
            index.len(),
            path.display(),
            report.skipped.len()
        );
        Ok((index, report))
    }

    /// Build an index from any line source.
    ///
    /// # Errors
    /// Returns the underlying I/O error if reading fails.
    pub fn from_reader<R: BufRead>(
        reader: R,
        parser: &RecordParser,
    ) -> std::io::Result<(Self, LoadReport)> {
        let mut records = Vec::new();
        let mut report = LoadReport::default();

        for (number, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match parser.parse(&line) {
                Ok(record) => records.push(record),
                Err(reason) => {
                    let malformed = MalformedRecord {
                        line: number + 1,
                        reason,
                    };
                    log::warn!("Skipping {}", malformed);
                    report.skipped.push(malformed);
                }
            }
        }

        Ok((Self::new(records), report))
    }

    /// Every record, in dataset order.
    #[must_use]
    pub fn all(&self) -> &[LocationRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records produced in `year`, in dataset order.
    #[must_use]
    pub fn by_year(&self, year: i32) -> Vec<&LocationRecord> {
        self.records.iter().filter(|r| r.year == year).collect()
    }

    /// Records of `year` whose title equals `title`, ignoring case and
    /// surrounding whitespace.
    ///
    /// A title shot in several places yields several records.
    #[must_use]
    pub fn by_title_and_year(&self, title: &str, year: i32) -> Vec<&LocationRecord> {
        let wanted = normalize_title(title);
        self.records
            .iter()
            .filter(|r| r.year == year && normalize_title(&r.title) == wanted)
            .collect()
    }

    /// Number of records per year, in ascending year order.
    #[must_use]
    pub fn year_counts(&self) -> BTreeMap<i32, usize> {
        let mut counts = BTreeMap::new();
        for record in &self.records {
            *counts.entry(record.year).or_insert(0) += 1;
        }
        counts
    }
}
