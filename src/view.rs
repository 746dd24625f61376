use crate::dex::{DexEntry, Progress};
use crate::record::SightingRecord;
use std::fmt::Write;

/// Checklist lines: `✅ Tiger - 💎 Diamond ⭐⭐ (4200)` or `🔲 Tiger`.
pub fn format_dex(user: &str, entries: &[DexEntry], progress: Progress) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Pokédex for {}", user);
    let _ = writeln!(out, "Caught {}/{}", progress.caught, progress.total);
    for entry in entries {
        match &entry.summary {
            Some(s) => {
                let _ = writeln!(
                    out,
                    "✅ {} - {} {} ({})",
                    entry.animal,
                    s.tier.label(),
                    s.stars,
                    s.score
                );
            }
            None => {
                let _ = writeln!(out, "🔲 {}", entry.animal);
            }
        }
    }
    out
}

pub fn format_record(record: &SightingRecord) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} - {} {}",
        record.animal,
        record.tier.label(),
        record.stars
    );
    let _ = writeln!(out, "Score: {}", record.score);
    let _ = writeln!(
        out,
        "Location: {}",
        record.location.as_deref().unwrap_or("-")
    );
    if let Some((lat, lon)) = record.coordinates() {
        let _ = writeln!(out, "Coordinates: {:.5}, {:.5}", lat, lon);
    }
    let _ = writeln!(out, "Date: {}", record.timestamp.format("%Y-%m-%d %H:%M"));
    if let Some(photo) = &record.photo {
        let _ = writeln!(out, "Photo: {}", photo.display());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::dex::{progress, render};
    use crate::record::{RecordSet, sample_record};
    use std::path::PathBuf;

    #[test]
    fn test_format_dex_marks_filled_entries() {
        let catalog = Catalog::from_names(["Tiger", "Bear"]);
        let records: RecordSet = [sample_record("Tiger", 4200)].into_iter().collect();
        let entries = render(&catalog, &records);
        let text = format_dex("Ash", &entries, progress(&entries));

        assert_eq!(
            text,
            "Pokédex for Ash\nCaught 1/2\n🔲 Bear\n✅ Tiger - 💎 Diamond ⭐⭐ (4200)\n"
        );
    }

    #[test]
    fn test_format_record_details() {
        let mut record = sample_record("Hornbill", 3700);
        record.location = Some("Khao Yai".to_string());
        record.latitude = Some(14.439);
        record.longitude = Some(101.372);
        record.photo = Some(PathBuf::from("snap_data/photos/Ash_Hornbill_20240501_093000.jpg"));

        let text = format_record(&record);
        assert!(text.starts_with("Hornbill - 🥇 Gold ⭐⭐\n"));
        assert!(text.contains("Score: 3700\n"));
        assert!(text.contains("Location: Khao Yai\n"));
        assert!(text.contains("Coordinates: 14.43900, 101.37200\n"));
        assert!(text.contains("Date: 2024-05-01 09:30\n"));
        assert!(text.contains("Photo: snap_data/photos/Ash_Hornbill_20240501_093000.jpg"));
    }

    #[test]
    fn test_format_record_without_optional_fields() {
        let text = format_record(&sample_record("Cat", 10));
        assert!(text.contains("Location: -\n"));
        assert!(!text.contains("Coordinates"));
        assert!(!text.contains("Photo"));
    }
}
