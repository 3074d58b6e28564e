use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde_json::{json, Map, Value as JsonValue};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::{Dataset, HandleCoverage};

/// Write the dataset to `<output_dir>/<basename>_<timestamp>.json`
pub fn write_dataset_json(dataset: &Dataset, config: &Config) -> AppResult<PathBuf> {
    let now = Local::now();
    let dir = Path::new(&config.output_dir);
    fs::create_dir_all(dir).map_err(|e| AppError::io(dir.display().to_string(), e))?;

    let path = dir.join(format!(
        "{}_{}.json",
        config.output_basename,
        now.format("%Y%m%d_%H%M%S")
    ));
    let content = serde_json::to_string_pretty(&dataset_to_json(dataset, &config.base_url, now))?;
    fs::write(&path, content).map_err(|e| AppError::io(path.display().to_string(), e))?;

    Ok(path)
}

/// Records plus run metadata; tracks keep the dataset order
pub fn dataset_to_json(dataset: &Dataset, base_url: &str, scraped_at: DateTime<Local>) -> JsonValue {
    let coverage = dataset.coverage();

    let mut tracks = Map::new();
    for section in &dataset.sections {
        let speakers: Vec<JsonValue> = section
            .records
            .iter()
            .map(|r| {
                json!({
                    "name": r.name,
                    "tag": r.title,
                    "image_url": r.image_url,
                    "x_handle": r.x_handle,
                    "instagram": r.instagram_handle,
                    "linkedin": r.linkedin_handle,
                    "order": r.original_index,
                })
            })
            .collect();

        tracks.insert(
            section.track.id.clone(),
            json!({
                "label": section.track.label(),
                "source_url": section.track.url(base_url),
                "speaker_count": section.records.len(),
                "stats": section.stats,
                "coverage": HandleCoverage::of(&section.records),
                "speakers": speakers,
            }),
        );
    }

    let unavailable: Vec<JsonValue> = dataset
        .unavailable
        .iter()
        .map(|u| {
            json!({
                "track": u.track.id,
                "source_url": u.track.url(base_url),
                "reason": u.reason,
            })
        })
        .collect();

    json!({
        "metadata": {
            "scraped_at": scraped_at.to_rfc3339(),
            "base_url": base_url,
            "total_tracks": dataset.sections.len(),
            "total_speakers": dataset.total_records(),
            "with_x": coverage.with_x,
            "with_instagram": coverage.with_instagram,
            "with_linkedin": coverage.with_linkedin,
        },
        "tracks": tracks,
        "unavailable_tracks": unavailable,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SpeakerRecord, Track, TrackSection, TrackStats, UnavailableTrack};

    fn dataset() -> Dataset {
        let record = SpeakerRecord {
            name: "Jane Doe".to_string(),
            title: "Founder".to_string(),
            image_url: None,
            x_handle: Some("https://x.com/janedoe".to_string()),
            instagram_handle: None,
            linkedin_handle: None,
            source_track: "FEATURED".to_string(),
            original_index: 0,
        };
        Dataset {
            sections: vec![TrackSection {
                track: Track::new("FEATURED", "Featured", "/speakers"),
                records: vec![record],
                stats: TrackStats {
                    seen: 2,
                    kept: 1,
                    failed: 1,
                    ..Default::default()
                },
            }],
            unavailable: vec![UnavailableTrack {
                track: Track::new("ART", "Art", "/speakers/art"),
                reason: "card list did not render within 10000ms".to_string(),
            }],
        }
    }

    #[test]
    fn test_json_layout() {
        let value = dataset_to_json(&dataset(), "https://www.nft.nyc", Local::now());

        assert_eq!(value["metadata"]["total_speakers"], 1);
        assert_eq!(value["metadata"]["with_x"], 1);
        assert_eq!(value["metadata"]["with_linkedin"], 0);

        let featured = &value["tracks"]["FEATURED"];
        assert_eq!(featured["source_url"], "https://www.nft.nyc/speakers");
        assert_eq!(featured["stats"]["seen"], 2);
        assert_eq!(featured["stats"]["failed"], 1);
        assert_eq!(featured["speakers"][0]["name"], "Jane Doe");
        assert_eq!(featured["speakers"][0]["x_handle"], "https://x.com/janedoe");
        assert!(featured["speakers"][0]["instagram"].is_null());

        assert_eq!(value["unavailable_tracks"][0]["track"], "ART");
    }

    #[test]
    fn test_write_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            output_dir: dir.path().join("out").display().to_string(),
            ..Config::default()
        };

        let path = write_dataset_json(&dataset(), &config).unwrap();
        assert!(path.starts_with(dir.path()));

        let written: JsonValue = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["metadata"]["base_url"], "https://www.nft.nyc");
    }
}
