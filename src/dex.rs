use crate::catalog::Catalog;
use crate::config::Config;
use crate::error::{Result, SnapError};
use crate::record::{RecordSet, SightingRecord, UserId};
use crate::store::{PhotoStore, RecordStore};
use crate::tier::{Stars, Tier, TierPolicy};
use chrono::NaiveDateTime;
use log::{debug, info, warn};
use serde_json::{Value, json};
use std::path::PathBuf;

const PHOTO_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// A sighting as entered by the user, before the upsert rule runs.
#[derive(Debug, Clone)]
pub struct Submission {
    pub animal: String,
    pub score: u32,
    pub stars: Stars,
    pub tier: Option<Tier>,
    pub photo: Option<PathBuf>,
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub timestamp: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Stored; `replaced` holds the score of the record it superseded.
    Accepted {
        record: SightingRecord,
        replaced: Option<u32>,
    },
    /// Not higher than the stored score; nothing was written.
    Rejected { existing: u32 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeleteOutcome {
    Deleted(SightingRecord),
    NotFound,
}

/// Per-user best-sighting leaderboard over a record and photo store.
pub struct Pokedex<S, P> {
    store: S,
    photos: P,
    catalog: Catalog,
    config: Config,
}

impl<S: RecordStore, P: PhotoStore> Pokedex<S, P> {
    pub fn new(store: S, photos: P, catalog: Catalog, config: Config) -> Self {
        Self {
            store,
            photos,
            catalog,
            config,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn records(&self, user: &UserId) -> Result<RecordSet> {
        self.store.load(user)
    }

    pub fn entry(&self, user: &UserId, animal: &str) -> Result<Option<SightingRecord>> {
        let animal = self.resolve(animal)?;
        Ok(self.store.load(user)?.get(&animal).cloned())
    }

    /// Insert the sighting, or replace the stored one iff the new score is
    /// strictly greater. Validation errors leave storage untouched.
    pub fn submit(&self, user: &UserId, submission: Submission) -> Result<SubmitOutcome> {
        let animal = self.resolve(&submission.animal)?;
        let tier = self.validate(&submission)?;

        let mut records = self.store.load(user)?;
        let replaced = records.get(&animal).map(|r| r.score);
        if let Some(existing) = replaced {
            if submission.score <= existing {
                info!(
                    "Rejected {} for {}: score {} does not beat {}",
                    animal, user, submission.score, existing
                );
                return Ok(SubmitOutcome::Rejected { existing });
            }
        }

        let photo = match &submission.photo {
            Some(source) => Some(
                self.photos
                    .store(user, &animal, source, submission.timestamp)?,
            ),
            None => None,
        };

        let record = SightingRecord {
            animal,
            score: submission.score,
            stars: submission.stars,
            tier,
            photo,
            latitude: submission.latitude,
            longitude: submission.longitude,
            location: submission
                .location
                .map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty()),
            timestamp: submission.timestamp,
        };
        records.insert(record.clone());
        self.store.save(user, &records)?;

        info!(
            "Accepted {} for {} with score {}",
            record.animal, user, record.score
        );
        Ok(SubmitOutcome::Accepted { record, replaced })
    }

    /// Remove the record for `animal`. Records whose animal has left the
    /// catalog are still reachable by their exact stored name.
    pub fn delete(&self, user: &UserId, animal: &str) -> Result<DeleteOutcome> {
        let mut records = self.store.load(user)?;
        let animal = match self.resolve(animal) {
            Ok(name) => name,
            Err(_) if records.contains(animal.trim()) => animal.trim().to_string(),
            Err(e) => return Err(e),
        };
        match records.remove(&animal) {
            Some(record) => {
                self.store.save(user, &records)?;
                info!("Deleted {} for {}", animal, user);
                Ok(DeleteOutcome::Deleted(record))
            }
            None => {
                debug!("Nothing to delete for {} / {}", user, animal);
                Ok(DeleteOutcome::NotFound)
            }
        }
    }

    fn resolve(&self, animal: &str) -> Result<String> {
        self.catalog
            .resolve(animal)
            .map(str::to_string)
            .ok_or_else(|| SnapError::UnknownAnimal(animal.trim().to_string()))
    }

    /// Check the submission and decide its tier.
    fn validate(&self, submission: &Submission) -> Result<Tier> {
        if submission.score > self.config.max_score {
            return Err(SnapError::ScoreOutOfRange {
                score: submission.score,
                max: self.config.max_score,
            });
        }

        match &submission.photo {
            Some(photo) => {
                let supported = photo
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| PHOTO_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()));
                if !supported {
                    return Err(SnapError::UnsupportedPhoto(photo.display().to_string()));
                }
            }
            None if self.config.require_photo => return Err(SnapError::MissingField("photo")),
            None => {}
        }

        match (submission.latitude, submission.longitude) {
            (Some(lat), Some(lon)) => {
                if !(-90.0..=90.0).contains(&lat) {
                    return Err(SnapError::InvalidCoordinates(format!(
                        "latitude {} is outside -90..=90",
                        lat
                    )));
                }
                if !(-180.0..=180.0).contains(&lon) {
                    return Err(SnapError::InvalidCoordinates(format!(
                        "longitude {} is outside -180..=180",
                        lon
                    )));
                }
            }
            (None, None) => {}
            _ => {
                return Err(SnapError::InvalidCoordinates(
                    "latitude and longitude must be given together".to_string(),
                ));
            }
        }

        match self.config.tier_policy {
            TierPolicy::Derived => {
                if let Some(given) = submission.tier {
                    debug!("Ignoring chosen tier {}, tiers are derived from score", given);
                }
                Ok(Tier::from_score(submission.score))
            }
            TierPolicy::Chosen => submission.tier.ok_or(SnapError::MissingField("tier")),
        }
    }
}

/// Short form of a record shown next to a filled checklist entry.
#[derive(Debug, Clone, PartialEq)]
pub struct EntrySummary {
    pub score: u32,
    pub tier: Tier,
    pub stars: Stars,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DexEntry {
    pub animal: String,
    pub summary: Option<EntrySummary>,
}

impl DexEntry {
    pub fn is_filled(&self) -> bool {
        self.summary.is_some()
    }
}

/// Checklist in catalog order, filled where the user has a record.
pub fn render(catalog: &Catalog, records: &RecordSet) -> Vec<DexEntry> {
    for record in records.iter().filter(|r| !catalog.contains(&r.animal)) {
        warn!("Record for {} is not in the catalog and is hidden", record.animal);
    }

    catalog
        .iter()
        .map(|animal| DexEntry {
            animal: animal.to_string(),
            summary: records.get(animal).map(|r| EntrySummary {
                score: r.score,
                tier: r.tier,
                stars: r.stars,
            }),
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub caught: usize,
    pub total: usize,
}

/// Completion over a rendered checklist.
pub fn progress(entries: &[DexEntry]) -> Progress {
    Progress {
        caught: entries.iter().filter(|e| e.is_filled()).count(),
        total: entries.len(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapPoint {
    pub animal: String,
    pub latitude: f64,
    pub longitude: f64,
    pub location: Option<String>,
    pub score: u32,
    pub tier: Tier,
}

/// Records that can be plotted; those without both coordinates are skipped.
pub fn map_points(records: &RecordSet) -> Vec<MapPoint> {
    records
        .iter()
        .filter_map(|r| {
            let (latitude, longitude) = r.coordinates()?;
            Some(MapPoint {
                animal: r.animal.clone(),
                latitude,
                longitude,
                location: r.location.clone(),
                score: r.score,
                tier: r.tier,
            })
        })
        .collect()
}

/// GeoJSON `FeatureCollection`; positions are `[longitude, latitude]`.
pub fn to_geojson(points: &[MapPoint]) -> Value {
    let features: Vec<Value> = points
        .iter()
        .map(|p| {
            json!({
                "type": "Feature",
                "geometry": {
                    "type": "Point",
                    "coordinates": [p.longitude, p.latitude],
                },
                "properties": {
                    "animal": p.animal,
                    "location": p.location,
                    "score": p.score,
                    "tier": p.tier.name(),
                },
            })
        })
        .collect();

    json!({ "type": "FeatureCollection", "features": features })
}
