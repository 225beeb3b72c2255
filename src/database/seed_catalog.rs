use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::models::{Activity, Catalog};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("cannot read seed catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid seed catalog {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("activity '{0}' appears more than once")]
    DuplicateName(String),

    #[error("activity '{0}' has no capacity")]
    ZeroCapacity(String),

    #[error("activity '{activity}' lists '{email}' more than once")]
    DuplicateParticipant { activity: String, email: String },

    #[error("activity '{activity}' has {participants} participants but room for {max}")]
    OverCapacity {
        activity: String,
        participants: usize,
        max: u32,
    },
}

/// One entry of a seed file. Seed files are JSON arrays so a repeated name
/// is visible instead of silently overwriting the earlier entry.
#[derive(Debug, Deserialize)]
struct SeedEntry {
    name: String,
    description: String,
    schedule: String,
    max_participants: u32,
    #[serde(default)]
    participants: Vec<String>,
}

/// The catalog the server starts with when no seed file is configured.
pub fn default_catalog() -> Catalog {
    [
        (
            "Chess Club",
            Activity::new(
                "Learn strategies and compete in chess tournaments",
                "Fridays, 3:30 PM - 5:00 PM",
                12,
            )
            .with_participants(&["michael@mergington.edu", "daniel@mergington.edu"]),
        ),
        (
            "Programming Class",
            Activity::new(
                "Learn programming fundamentals and build software projects",
                "Tuesdays and Thursdays, 3:30 PM - 4:30 PM",
                20,
            )
            .with_participants(&["emma@mergington.edu", "sophia@mergington.edu"]),
        ),
        (
            "Gym Class",
            Activity::new(
                "Physical education and sports activities",
                "Mondays, Wednesdays, Fridays, 2:00 PM - 3:00 PM",
                30,
            )
            .with_participants(&["john@mergington.edu", "olivia@mergington.edu"]),
        ),
        (
            "Basketball Team",
            Activity::new(
                "Practice and compete in inter-school basketball games",
                "Wednesdays and Saturdays, 4:00 PM - 6:00 PM",
                15,
            ),
        ),
        (
            "Soccer Club",
            Activity::new(
                "Train in soccer skills and play friendly matches",
                "Tuesdays and Thursdays, 4:00 PM - 5:30 PM",
                22,
            )
            .with_participants(&["lucas@mergington.edu"]),
        ),
        (
            "Art Club",
            Activity::new(
                "Explore painting, drawing and sculpture",
                "Mondays, 3:30 PM - 5:00 PM",
                18,
            )
            .with_participants(&["ava@mergington.edu"]),
        ),
        (
            "Drama Club",
            Activity::new(
                "Act, direct and stage school theatre productions",
                "Thursdays, 3:30 PM - 5:30 PM",
                25,
            )
            .with_participants(&["mia@mergington.edu", "noah@mergington.edu"]),
        ),
        (
            "Debate Team",
            Activity::new(
                "Build argumentation skills and compete in debate tournaments",
                "Wednesdays, 3:30 PM - 5:00 PM",
                16,
            )
            .with_participants(&["liam@mergington.edu"]),
        ),
        (
            "Math Club",
            Activity::new(
                "Solve challenging problems and prepare for math competitions",
                "Tuesdays, 3:30 PM - 4:30 PM",
                10,
            )
            .with_participants(&["isabella@mergington.edu"]),
        ),
    ]
    .into_iter()
    .map(|(name, activity)| (name.to_string(), activity))
    .collect()
}

/// Load a catalog from a JSON seed file and validate it.
pub fn load_catalog_file(path: &Path) -> Result<Catalog, SeedError> {
    let raw = fs::read_to_string(path).map_err(|source| SeedError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let entries: Vec<SeedEntry> =
        serde_json::from_str(&raw).map_err(|source| SeedError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    let mut catalog = Catalog::new();
    for entry in entries {
        if catalog.contains_key(&entry.name) {
            return Err(SeedError::DuplicateName(entry.name));
        }
        catalog.insert(
            entry.name,
            Activity {
                description: entry.description,
                schedule: entry.schedule,
                max_participants: entry.max_participants,
                participants: entry.participants,
            },
        );
    }
    validate_catalog(&catalog)?;

    info!(path = %path.display(), activities = catalog.len(), "seed catalog loaded");
    Ok(catalog)
}

/// Check the invariants every catalog must hold before it is served.
pub fn validate_catalog(catalog: &Catalog) -> Result<(), SeedError> {
    for (name, activity) in catalog {
        if activity.max_participants == 0 {
            return Err(SeedError::ZeroCapacity(name.clone()));
        }

        let mut seen = HashSet::new();
        for email in &activity.participants {
            if !seen.insert(email.as_str()) {
                return Err(SeedError::DuplicateParticipant {
                    activity: name.clone(),
                    email: email.clone(),
                });
            }
        }

        if activity.participants.len() > activity.max_participants as usize {
            return Err(SeedError::OverCapacity {
                activity: name.clone(),
                participants: activity.participants.len(),
                max: activity.max_participants,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_seed(dir: &TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("catalog.json");
        fs::write(&path, body).expect("write seed");
        path
    }

    #[test]
    fn default_catalog_is_valid() {
        let catalog = default_catalog();
        validate_catalog(&catalog).expect("built-in catalog must be valid");
        assert_eq!(catalog.len(), 9);
        for name in [
            "Basketball Team",
            "Soccer Club",
            "Art Club",
            "Drama Club",
            "Debate Team",
            "Math Club",
            "Chess Club",
            "Programming Class",
            "Gym Class",
        ] {
            assert!(catalog.contains_key(name), "missing {name}");
        }
        assert!(catalog["Basketball Team"].participants.is_empty());
    }

    #[test]
    fn loads_seed_file() {
        let dir = TempDir::new().expect("tempdir");
        let path = write_seed(
            &dir,
            r#"[
                {"name": "Robotics", "description": "Build robots", "schedule": "Mondays",
                 "max_participants": 4, "participants": ["a@mergington.edu"]},
                {"name": "Choir", "description": "Sing", "schedule": "Fridays",
                 "max_participants": 30}
            ]"#,
        );

        let catalog = load_catalog_file(&path).expect("load");
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog["Robotics"].participants, vec!["a@mergington.edu"]);
        assert!(catalog["Choir"].participants.is_empty());
    }

    #[test]
    fn missing_file_reports_path() {
        let dir = TempDir::new().expect("tempdir");
        let err = load_catalog_file(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, SeedError::Io { .. }), "got: {err}");
        assert!(err.to_string().contains("nope.json"));
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let dir = TempDir::new().expect("tempdir");
        let path = write_seed(&dir, r#"{"Chess Club": {"description": "x"}}"#);
        let err = load_catalog_file(&path).unwrap_err();
        assert!(matches!(err, SeedError::Parse { .. }), "got: {err}");
        assert!(err.to_string().contains("catalog.json"));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let dir = TempDir::new().expect("tempdir");
        let path = write_seed(
            &dir,
            r#"[
                {"name": "Choir", "description": "a", "schedule": "b", "max_participants": 3},
                {"name": "Choir", "description": "c", "schedule": "d", "max_participants": 5}
            ]"#,
        );
        let err = load_catalog_file(&path).unwrap_err();
        assert!(matches!(err, SeedError::DuplicateName(ref n) if n == "Choir"), "got: {err}");
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let mut catalog = Catalog::new();
        catalog.insert("Empty".to_string(), Activity::new("x", "y", 0));
        let err = validate_catalog(&catalog).unwrap_err();
        assert!(matches!(err, SeedError::ZeroCapacity(_)), "got: {err}");
    }

    #[test]
    fn duplicate_participants_are_rejected() {
        let mut catalog = Catalog::new();
        catalog.insert(
            "Choir".to_string(),
            Activity::new("x", "y", 5).with_participants(&["a@x.edu", "a@x.edu"]),
        );
        let err = validate_catalog(&catalog).unwrap_err();
        assert!(
            matches!(err, SeedError::DuplicateParticipant { ref email, .. } if email == "a@x.edu"),
            "got: {err}"
        );
    }

    #[test]
    fn over_capacity_is_rejected() {
        let mut catalog = Catalog::new();
        catalog.insert(
            "Duo".to_string(),
            Activity::new("x", "y", 1).with_participants(&["a@x.edu", "b@x.edu"]),
        );
        let err = validate_catalog(&catalog).unwrap_err();
        assert!(matches!(err, SeedError::OverCapacity { participants: 2, max: 1, .. }));
    }
}
