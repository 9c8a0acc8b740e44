//! Project I/O - High-level API
//!
//! Saves and loads a snapshot of the fixture table. Load failures leave the
//! caller's in-memory state untouched: the table is only returned once the
//! whole file has parsed and every fixture key validated.

use crate::error::{IoError, Result};
use crate::project_format::{FixtureSnapshot, ProjectFile, PROJECT_FILE_VERSION};
use lumapanel_core::{FixtureId, FixtureTable};
use std::collections::BTreeMap;
use std::path::Path;

/// Save the fixture table to a project file
pub fn save_project(fixtures: &FixtureTable, path: &Path) -> Result<()> {
    let snapshots: BTreeMap<String, FixtureSnapshot> = fixtures
        .iter()
        .map(|(id, record)| (id.to_string(), FixtureSnapshot::from(record)))
        .collect();
    let project_file = ProjectFile::new(snapshots);
    project_file.save(path)?;
    tracing::info!("saved {} fixtures to {:?}", fixtures.len(), path);
    Ok(())
}

/// Load a fixture table from a project file
pub fn load_project(path: &Path) -> Result<FixtureTable> {
    let project_file = ProjectFile::load(path)?;

    if project_file.version != PROJECT_FILE_VERSION {
        return Err(IoError::VersionMismatch {
            expected: PROJECT_FILE_VERSION.to_string(),
            found: project_file.version,
        });
    }

    let mut fixtures = FixtureTable::new();
    for (key, snapshot) in project_file.fixtures {
        let id: FixtureId = key
            .parse()
            .ok()
            .filter(|id| *id > 0)
            .ok_or_else(|| IoError::InvalidFixtureKey(key.clone()))?;
        *fixtures.ensure(id) = snapshot.into_record();
    }
    tracing::info!("loaded {} fixtures from {:?}", fixtures.len(), path);
    Ok(fixtures)
}
