use crate::error::{Result, SnapError};
use crate::record::{RecordSet, SightingRecord, UserId};
use crate::tier::{Stars, Tier};
use chrono::NaiveDateTime;
use clap::ValueEnum;
use csv::{Reader, Writer};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

/// Loads and saves a user's full record set.
///
/// Every mutation is a whole-file rewrite; there is no locking, so two
/// writers for the same user race and the last one wins.
pub trait RecordStore {
    /// Records for `user`. A user without a file has an empty set.
    fn load(&self, user: &UserId) -> Result<RecordSet>;
    fn save(&self, user: &UserId, records: &RecordSet) -> Result<()>;
}

/// Persists an uploaded photo and returns the path it now lives at.
pub trait PhotoStore {
    fn store(
        &self,
        user: &UserId,
        animal: &str,
        source: &Path,
        taken_at: NaiveDateTime,
    ) -> Result<PathBuf>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum StoreFormat {
    #[default]
    Json,
    Csv,
}

impl StoreFormat {
    fn extension(&self) -> &'static str {
        match self {
            StoreFormat::Json => "json",
            StoreFormat::Csv => "csv",
        }
    }
}

fn user_file(dir: &Path, user: &UserId, format: StoreFormat) -> PathBuf {
    dir.join(format!("{}_pokedex.{}", user, format.extension()))
}

/// Read a file, mapping "not found" to `None`.
fn read_if_exists(path: &Path) -> Result<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// One entry of the JSON object keyed by animal name.
#[derive(Debug, Serialize, Deserialize)]
struct JsonEntry {
    score: u32,
    stars: Stars,
    tier: Tier,
    location: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    timestamp: NaiveDateTime,
    photo: Option<PathBuf>,
}

impl JsonEntry {
    fn into_record(self, animal: String) -> SightingRecord {
        SightingRecord {
            animal,
            score: self.score,
            stars: self.stars,
            tier: self.tier,
            photo: self.photo,
            latitude: self.latitude,
            longitude: self.longitude,
            location: self.location,
            timestamp: self.timestamp,
        }
    }
}

impl From<&SightingRecord> for JsonEntry {
    fn from(record: &SightingRecord) -> Self {
        Self {
            score: record.score,
            stars: record.stars,
            tier: record.tier,
            location: record.location.clone(),
            latitude: record.latitude,
            longitude: record.longitude,
            timestamp: record.timestamp,
            photo: record.photo.clone(),
        }
    }
}

/// `<dir>/<user>_pokedex.json`, a pretty-printed object keyed by animal.
#[derive(Debug, Clone)]
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, user: &UserId) -> PathBuf {
        user_file(&self.dir, user, StoreFormat::Json)
    }
}

impl RecordStore for JsonStore {
    fn load(&self, user: &UserId) -> Result<RecordSet> {
        let path = self.path_for(user);
        let Some(bytes) = read_if_exists(&path)? else {
            debug!("No record file at {}, starting empty", path.display());
            return Ok(RecordSet::new());
        };

        let entries: BTreeMap<String, JsonEntry> = serde_json::from_slice(&bytes)?;
        let records: RecordSet = entries
            .into_iter()
            .map(|(animal, entry)| entry.into_record(animal))
            .collect();
        debug!("Loaded {} records from {}", records.len(), path.display());
        Ok(records)
    }

    fn save(&self, user: &UserId, records: &RecordSet) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(user);
        let entries: BTreeMap<&str, JsonEntry> = records
            .iter()
            .map(|r| (r.animal.as_str(), JsonEntry::from(r)))
            .collect();

        let file = File::create(&path)?;
        serde_json::to_writer_pretty(file, &entries)?;
        info!("Saved {} records to {}", records.len(), path.display());
        Ok(())
    }
}

/// `<dir>/<user>_pokedex.csv`, one row per animal.
#[derive(Debug, Clone)]
pub struct CsvStore {
    dir: PathBuf,
}

impl CsvStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, user: &UserId) -> PathBuf {
        user_file(&self.dir, user, StoreFormat::Csv)
    }
}

impl RecordStore for CsvStore {
    fn load(&self, user: &UserId) -> Result<RecordSet> {
        let path = self.path_for(user);
        let Some(bytes) = read_if_exists(&path)? else {
            debug!("No record file at {}, starting empty", path.display());
            return Ok(RecordSet::new());
        };

        let mut records = RecordSet::new();
        let mut reader = Reader::from_reader(bytes.as_slice());
        for row in reader.deserialize() {
            let record: SightingRecord = row?;
            if let Some(existing) = records.get(&record.animal) {
                warn!(
                    "Duplicate rows for {} in {}, keeping the higher score",
                    record.animal,
                    path.display()
                );
                if existing.score >= record.score {
                    continue;
                }
            }
            records.insert(record);
        }
        debug!("Loaded {} records from {}", records.len(), path.display());
        Ok(records)
    }

    fn save(&self, user: &UserId, records: &RecordSet) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(user);
        write_csv(records.iter(), &path)?;
        info!("Saved {} records to {}", records.len(), path.display());
        Ok(())
    }
}

/// Write records as canonical CSV rows with a header line.
pub fn write_csv<'a>(
    records: impl IntoIterator<Item = &'a SightingRecord>,
    path: &Path,
) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = Writer::from_writer(file);

    for record in records {
        writer.serialize(record)?;
    }

    writer.flush()?;
    Ok(())
}

/// The file-backed store picked by [`StoreFormat`].
#[derive(Debug, Clone)]
pub enum FileStore {
    Json(JsonStore),
    Csv(CsvStore),
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>, format: StoreFormat) -> Self {
        match format {
            StoreFormat::Json => FileStore::Json(JsonStore::new(dir)),
            StoreFormat::Csv => FileStore::Csv(CsvStore::new(dir)),
        }
    }
}

impl RecordStore for FileStore {
    fn load(&self, user: &UserId) -> Result<RecordSet> {
        match self {
            FileStore::Json(store) => store.load(user),
            FileStore::Csv(store) => store.load(user),
        }
    }

    fn save(&self, user: &UserId, records: &RecordSet) -> Result<()> {
        match self {
            FileStore::Json(store) => store.save(user, records),
            FileStore::Csv(store) => store.save(user, records),
        }
    }
}

/// Copies photos to `<dir>/<user>_<animal>_<YYYYmmdd_HHMMSS>.<ext>`.
#[derive(Debug, Clone)]
pub struct FsPhotoStore {
    dir: PathBuf,
}

impl FsPhotoStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl PhotoStore for FsPhotoStore {
    /// Never opens an existing file for writing: a taken name gets a
    /// `_1`, `_2`, ... suffix. Resubmitting a photo that already lives at
    /// one of the candidate names reuses it as is.
    fn store(
        &self,
        user: &UserId,
        animal: &str,
        source: &Path,
        taken_at: NaiveDateTime,
    ) -> Result<PathBuf> {
        let ext = source
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .ok_or_else(|| SnapError::UnsupportedPhoto(source.display().to_string()))?;
        fs::create_dir_all(&self.dir)?;

        let mut input = File::open(source)?;
        let source_real = fs::canonicalize(source)?;
        let stem = format!("{}_{}_{}", user, animal, taken_at.format("%Y%m%d_%H%M%S"));

        let mut attempt = 0u32;
        loop {
            let name = match attempt {
                0 => format!("{}.{}", stem, ext),
                n => format!("{}_{}.{}", stem, n, ext),
            };
            let target = self.dir.join(name);

            match OpenOptions::new().write(true).create_new(true).open(&target) {
                Ok(mut output) => {
                    io::copy(&mut input, &mut output)?;
                    debug!("Copied photo {} to {}", source.display(), target.display());
                    return Ok(target);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    if fs::canonicalize(&target)? == source_real {
                        debug!("Photo {} is already stored", target.display());
                        return Ok(target);
                    }
                }
                Err(e) => return Err(e.into()),
            }
            attempt += 1;
        }
    }
}
