//! On-disk project file format
//!
//! A project file is a snapshot of the fixture table, keyed by fixture id
//! as a string, wrapped with format-version and timestamp metadata. It is
//! serialized to RON or JSON depending on the file extension. Unknown
//! fields are ignored on load and missing fields take the fixture defaults.

use crate::error::{IoError, Result};
use chrono::{DateTime, Utc};
use lumapanel_core::{FixtureRecord, FixtureShape};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// The current version of the project file format.
pub const PROJECT_FILE_VERSION: &str = "1.0.0";

/// Maximum allowed project file size (4 MB).
///
/// Prevents unbounded resource consumption when loading project files.
pub const MAX_PROJECT_FILE_SIZE: u64 = 4 * 1024 * 1024;

/// One fixture, serialized as a flat field-to-value record.
///
/// Every field defaults independently so files written by older builds
/// load cleanly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FixtureSnapshot {
    /// Red channel
    #[serde(default)]
    pub red: f32,
    /// Green channel
    #[serde(default)]
    pub green: f32,
    /// Blue channel
    #[serde(default)]
    pub blue: f32,
    /// Amber channel
    #[serde(default)]
    pub amber: f32,
    /// White channel
    #[serde(default)]
    pub white: f32,
    /// Master dimmer
    #[serde(default)]
    pub dimmer: f32,
    /// Strobe rate
    #[serde(default)]
    pub strobe: f32,
    /// Normalized horizontal position
    #[serde(default = "default_position")]
    pub x: f32,
    /// Normalized vertical position
    #[serde(default = "default_position")]
    pub y: f32,
    /// Preview shape
    #[serde(default)]
    pub shape: FixtureShape,
    /// Circle radius, relative
    #[serde(default = "default_circle_size")]
    pub circle_size: f32,
    /// Beam length, relative
    #[serde(default = "default_beam_length")]
    pub beam_length: f32,
    /// Beam width, relative
    #[serde(default = "default_beam_width")]
    pub beam_width: f32,
    /// Beam angle in degrees
    #[serde(default)]
    pub beam_angle_deg: f32,
    /// Operator-facing label
    #[serde(default)]
    pub label: String,
}

fn default_position() -> f32 {
    0.5
}

fn default_circle_size() -> f32 {
    0.08
}

fn default_beam_length() -> f32 {
    0.15
}

fn default_beam_width() -> f32 {
    0.10
}

impl From<&FixtureRecord> for FixtureSnapshot {
    fn from(record: &FixtureRecord) -> Self {
        Self {
            red: record.red,
            green: record.green,
            blue: record.blue,
            amber: record.amber,
            white: record.white,
            dimmer: record.dimmer,
            strobe: record.strobe,
            x: record.x,
            y: record.y,
            shape: record.shape,
            circle_size: record.circle_size,
            beam_length: record.beam_length,
            beam_width: record.beam_width,
            beam_angle_deg: record.beam_angle_deg,
            label: record.label.clone(),
        }
    }
}

impl FixtureSnapshot {
    /// Rebuild a fixture record from this snapshot.
    ///
    /// Value channels go through the normal setters so out-of-range data in
    /// a hand-edited file is clamped on the way in.
    pub fn into_record(self) -> FixtureRecord {
        let mut record = FixtureRecord {
            x: self.x,
            y: self.y,
            shape: self.shape,
            circle_size: self.circle_size,
            beam_length: self.beam_length,
            beam_width: self.beam_width,
            beam_angle_deg: self.beam_angle_deg,
            label: self.label,
            ..FixtureRecord::default()
        };
        record.set_color(self.red, self.green, self.blue, self.amber, self.white);
        record.set_dimmer(self.dimmer);
        record.set_strobe(self.strobe);
        record
    }
}

/// Metadata stamped on every saved project
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectMetadata {
    /// When the project was first saved
    pub created_at: DateTime<Utc>,
    /// When the project was last saved
    pub modified_at: DateTime<Utc>,
}

/// Top-level structure of a saved project file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectFile {
    /// Format version
    pub version: String,
    /// Project metadata
    pub metadata: ProjectMetadata,
    /// Fixture snapshots keyed by fixture id as string
    pub fixtures: BTreeMap<String, FixtureSnapshot>,
}

impl ProjectFile {
    /// Create a project file from fixture snapshots, stamping creation and
    /// modification times to now
    pub fn new(fixtures: BTreeMap<String, FixtureSnapshot>) -> Self {
        let now = Utc::now();
        Self {
            version: PROJECT_FILE_VERSION.to_string(),
            metadata: ProjectMetadata {
                created_at: now,
                modified_at: now,
            },
            fixtures,
        }
    }

    /// Load a project file from the given path, RON or JSON by extension
    pub fn load(path: &Path) -> Result<Self> {
        Self::load_with_limit(path, MAX_PROJECT_FILE_SIZE)
    }

    fn load_with_limit(path: &Path, limit: u64) -> Result<Self> {
        let metadata = std::fs::metadata(path)?;
        let size = metadata.len();
        if size > limit {
            return Err(IoError::FileTooLarge { size, limit });
        }

        let mut content = String::new();
        File::open(path)?.read_to_string(&mut content)?;

        match extension(path)? {
            Format::Json => Ok(serde_json::from_str(&content)?),
            Format::Ron => ron::from_str(&content).map_err(|e| IoError::Ron(e.to_string())),
        }
    }

    /// Save the project file to the given path, RON or JSON by extension
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = match extension(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Ron => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| IoError::Ron(e.to_string()))?,
        };
        let mut file = File::create(path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }
}

enum Format {
    Ron,
    Json,
}

fn extension(path: &Path) -> Result<Format> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("ron") => Ok(Format::Ron),
        Some("json") => Ok(Format::Json),
        other => Err(IoError::UnsupportedFormat(
            other.unwrap_or("<none>").to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_defaults_on_missing_fields() {
        // Only the dimmer present: everything else takes its default
        let snapshot: FixtureSnapshot = serde_json::from_str(r#"{"dimmer": 0.5}"#).unwrap();
        let record = snapshot.into_record();
        assert_eq!(record.dimmer, 0.5);
        assert_eq!(record.red, 0.0);
        assert_eq!(record.x, 0.5);
        assert_eq!(record.circle_size, 0.08);
        assert_eq!(record.shape, FixtureShape::Circle);
    }

    #[test]
    fn test_snapshot_ignores_unknown_fields() {
        let snapshot: FixtureSnapshot =
            serde_json::from_str(r#"{"dimmer": 0.5, "gobo": 3, "pan": 0.1}"#).unwrap();
        assert_eq!(snapshot.dimmer, 0.5);
    }

    #[test]
    fn test_snapshot_clamps_on_rebuild() {
        let snapshot: FixtureSnapshot =
            serde_json::from_str(r#"{"red": 9.0, "dimmer": -1.0}"#).unwrap();
        let record = snapshot.into_record();
        assert_eq!(record.red, 1.0);
        assert_eq!(record.dimmer, 0.0);
    }

    #[test]
    fn test_snapshot_round_trip_preserves_layout() {
        let mut record = FixtureRecord::default();
        record.set_color(0.1, 0.2, 0.3, 0.4, 0.5);
        record.x = 0.25;
        record.shape = FixtureShape::Beam;
        record.beam_angle_deg = 45.0;
        record.label = "front left".to_string();

        let snapshot = FixtureSnapshot::from(&record);
        assert_eq!(snapshot.into_record(), record);
    }

    #[test]
    fn test_unsupported_extension() {
        let result = ProjectFile::new(BTreeMap::new()).save(Path::new("/tmp/project.txt"));
        assert!(matches!(result, Err(IoError::UnsupportedFormat(_))));
    }
}
