use crate::error::{Result, SnapError};
use crate::tier::{Stars, Tier};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Best-known sighting of one animal for one user.
///
/// Field names map to the tabular columns
/// `Animal, Score, Stars, Tier, Photo, Latitude, Longitude, Location, Timestamp`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SightingRecord {
    pub animal: String,
    pub score: u32,
    pub stars: Stars,
    pub tier: Tier,
    pub photo: Option<PathBuf>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub location: Option<String>,
    pub timestamp: NaiveDateTime,
}

impl SightingRecord {
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }
}

/// A user's records keyed by animal; one record per animal at most.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordSet {
    records: BTreeMap<String, SightingRecord>,
}

impl RecordSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, animal: &str) -> Option<&SightingRecord> {
        self.records.get(animal)
    }

    pub fn contains(&self, animal: &str) -> bool {
        self.records.contains_key(animal)
    }

    /// Store `record`, replacing any record for the same animal wholesale.
    pub fn insert(&mut self, record: SightingRecord) -> Option<SightingRecord> {
        self.records.insert(record.animal.clone(), record)
    }

    pub fn remove(&mut self, animal: &str) -> Option<SightingRecord> {
        self.records.remove(animal)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SightingRecord> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<SightingRecord> for RecordSet {
    fn from_iter<T: IntoIterator<Item = SightingRecord>>(iter: T) -> Self {
        let mut set = RecordSet::new();
        for record in iter {
            set.insert(record);
        }
        set
    }
}

/// Identifier of the user owning a record file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserId(String);

impl UserId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for UserId {
    type Error = SnapError;

    fn try_from(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(SnapError::MissingField("user"));
        }
        let valid = trimmed
            .chars()
            .all(|c| c.is_alphanumeric() || c == ' ' || c == '-' || c == '_');
        if !valid {
            return Err(SnapError::InvalidUser(value.to_string()));
        }
        Ok(UserId(trimmed.to_string()))
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parse `YYYY-MM-DD`, `YYYY-MM-DD HH:MM[:SS]` or the ISO `T` separated form.
pub fn parse_timestamp(input: &str) -> Result<NaiveDateTime> {
    let input = input.trim();
    for format in [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M:%S%.f",
    ] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(input, format) {
            return Ok(ts);
        }
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| SnapError::InvalidTimestamp(input.to_string()))
}

#[cfg(test)]
pub(crate) fn sample_record(animal: &str, score: u32) -> SightingRecord {
    SightingRecord {
        animal: animal.to_string(),
        score,
        stars: Stars::Two,
        tier: Tier::from_score(score),
        photo: None,
        latitude: None,
        longitude: None,
        location: None,
        timestamp: parse_timestamp("2024-05-01 09:30:00").unwrap(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_set_keeps_one_per_animal() {
        let mut set = RecordSet::new();
        assert!(set.insert(sample_record("Tiger", 3000)).is_none());
        let old = set.insert(sample_record("Tiger", 4200)).unwrap();
        assert_eq!(old.score, 3000);
        assert_eq!(set.len(), 1);
        assert_eq!(set.get("Tiger").unwrap().score, 4200);
    }

    #[test]
    fn test_user_id_validation() {
        assert_eq!(UserId::try_from(" Ash ").unwrap().as_str(), "Ash");
        assert_eq!(UserId::try_from("Player_1").unwrap().as_str(), "Player_1");
        assert!(matches!(
            UserId::try_from("   "),
            Err(SnapError::MissingField("user"))
        ));
        assert!(matches!(
            UserId::try_from("../etc"),
            Err(SnapError::InvalidUser(_))
        ));
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let date_only = parse_timestamp("2024-03-09").unwrap();
        assert_eq!(date_only.to_string(), "2024-03-09 00:00:00");
        let full = parse_timestamp("2024-03-09 17:45:10").unwrap();
        assert_eq!(full.to_string(), "2024-03-09 17:45:10");
        assert_eq!(parse_timestamp("2024-03-09T17:45:10").unwrap(), full);
        assert!(matches!(
            parse_timestamp("yesterday"),
            Err(SnapError::InvalidTimestamp(_))
        ));
    }

    #[test]
    fn test_coordinates_require_both() {
        let mut record = sample_record("Owl", 100);
        assert_eq!(record.coordinates(), None);
        record.latitude = Some(13.73);
        assert_eq!(record.coordinates(), None);
        record.longitude = Some(100.54);
        assert_eq!(record.coordinates(), Some((13.73, 100.54)));
    }
}
