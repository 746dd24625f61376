use crate::dex::{Pokedex, Submission, SubmitOutcome};
use crate::error::Result;
use crate::record::{UserId, parse_timestamp};
use crate::store::{PhotoStore, RecordStore, write_csv};
use crate::tier::{Stars, Tier};
use chrono::NaiveDateTime;
use csv::Reader;
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// One row of a bulk sighting file. Uses the record file's column names;
/// `Tier`, `Photo` and `Timestamp` may be left empty.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ImportRow {
    animal: String,
    score: u32,
    stars: Stars,
    tier: Option<Tier>,
    photo: Option<PathBuf>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    location: Option<String>,
    timestamp: Option<String>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub accepted: usize,
    pub rejected: usize,
    pub failed: usize,
}

impl ImportRow {
    /// Photo paths are relative to the directory of the import file.
    fn into_submission(self, base: &Path, now: NaiveDateTime) -> Result<Submission> {
        let timestamp = match self.timestamp.as_deref().map(str::trim) {
            Some(ts) if !ts.is_empty() => parse_timestamp(ts)?,
            _ => now,
        };
        let photo = self
            .photo
            .map(|p| if p.is_relative() { base.join(p) } else { p });

        Ok(Submission {
            animal: self.animal,
            score: self.score,
            stars: self.stars,
            tier: self.tier,
            photo,
            location: self.location,
            latitude: self.latitude,
            longitude: self.longitude,
            timestamp,
        })
    }
}

fn progress_bar(len: u64) -> ProgressBar {
    let progress_bar = ProgressBar::new(len);
    let style = ProgressStyle::default_bar()
        .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {percent:>3}% {msg}")
        .map(|s| s.progress_chars("##-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    progress_bar.set_style(style);
    progress_bar.set_message("Importing sightings");
    progress_bar
}

/// Run every row of `path` through the upsert rule, in file order.
///
/// A malformed or invalid row is logged and counted, not fatal.
pub fn import_csv<S: RecordStore, P: PhotoStore>(
    dex: &Pokedex<S, P>,
    user: &UserId,
    path: &Path,
    now: NaiveDateTime,
) -> Result<ImportSummary> {
    let base = path.parent().unwrap_or_else(|| Path::new("."));
    let mut reader = Reader::from_path(path)?;
    let rows: Vec<csv::Result<ImportRow>> = reader.deserialize().collect();

    let progress = progress_bar(rows.len() as u64);
    let mut summary = ImportSummary::default();

    for (idx, row) in rows.into_iter().enumerate() {
        // Header is line 1
        let line = idx + 2;
        let result = row
            .map_err(Into::into)
            .and_then(|row| row.into_submission(base, now))
            .and_then(|submission| dex.submit(user, submission));

        match result {
            Ok(SubmitOutcome::Accepted { .. }) => summary.accepted += 1,
            Ok(SubmitOutcome::Rejected { existing }) => {
                info!("Line {}: not higher than existing score {}", line, existing);
                summary.rejected += 1;
            }
            Err(e) => {
                warn!("Line {} of {} skipped: {}", line, path.display(), e);
                summary.failed += 1;
            }
        }
        progress.inc(1);
    }

    progress.finish_and_clear();
    info!(
        "Imported {}: {} accepted, {} rejected, {} failed",
        path.display(),
        summary.accepted,
        summary.rejected,
        summary.failed
    );
    Ok(summary)
}

/// Write a user's records as canonical CSV, whatever the store format.
pub fn export_csv<S: RecordStore, P: PhotoStore>(
    dex: &Pokedex<S, P>,
    user: &UserId,
    output: &Path,
) -> Result<usize> {
    let records = dex.records(user)?;
    if records.is_empty() {
        warn!("{} has no records, writing header only", user);
    }
    write_csv(records.iter(), output)?;
    info!("Exported {} records to {}", records.len(), output.display());
    Ok(records.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::config::Config;
    use crate::store::memory::{MemoryPhotoStore, MemoryStore};
    use std::fs;
    use tempfile::TempDir;

    const HEADER: &str = "Animal,Score,Stars,Tier,Photo,Latitude,Longitude,Location,Timestamp\n";

    fn dex() -> Pokedex<MemoryStore, MemoryPhotoStore> {
        Pokedex::new(
            MemoryStore::default(),
            MemoryPhotoStore::default(),
            Catalog::default(),
            Config::new().with_require_photo(false),
        )
    }

    fn now() -> NaiveDateTime {
        parse_timestamp("2024-08-01 12:00:00").unwrap()
    }

    #[test]
    fn test_import_applies_rows_in_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("trip.csv");
        fs::write(
            &path,
            format!(
                "{}\
                 Tiger,3000,2,,,,,,2024-05-01\n\
                 Tiger,2500,3,,,,,,2024-05-02\n\
                 Tiger,4200,4,,tiger.jpg,14.1,101.3,Khao Yai,\n\
                 Unicorn,100,1,,,,,,\n\
                 Owl,abc,1,,,,,,\n\
                 Owl,900,7,,,,,,\n",
                HEADER
            ),
        )
        .unwrap();

        let dex = dex();
        let user = UserId::try_from("Ash").unwrap();
        let summary = import_csv(&dex, &user, &path, now()).unwrap();

        assert_eq!(
            summary,
            ImportSummary {
                accepted: 2,
                rejected: 1,
                failed: 3,
            }
        );
        let tiger = dex.entry(&user, "Tiger").unwrap().unwrap();
        assert_eq!(tiger.score, 4200);
        assert_eq!(tiger.timestamp, now());
        assert_eq!(tiger.location.as_deref(), Some("Khao Yai"));
        assert!(dex.entry(&user, "Owl").unwrap().is_none());
    }

    #[test]
    fn test_export_writes_canonical_csv() {
        let dir = TempDir::new().unwrap();
        let dex = dex();
        let user = UserId::try_from("Ash").unwrap();
        let import = dir.path().join("in.csv");
        fs::write(&import, format!("{}Bee,120,1,,,,,,2024-04-04\n", HEADER)).unwrap();
        import_csv(&dex, &user, &import, now()).unwrap();

        let output = dir.path().join("out.csv");
        assert_eq!(export_csv(&dex, &user, &output).unwrap(), 1);
        let written = fs::read_to_string(&output).unwrap();
        assert_eq!(
            written,
            format!("{}Bee,120,1,Bronze,,,,,2024-04-04T00:00:00\n", HEADER)
        );
    }
}
