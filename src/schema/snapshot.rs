//! Grid snapshots: the configuration plus every cell's committed state.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::config::{PopulationConfig, SimulationConfig};

/// Point-in-time copy of a grid that can rebuild it exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub config: SimulationConfig,
    /// Number of completed ticks.
    pub tick: u64,
    /// Row-major cell states.
    pub states: Vec<usize>,
}

impl Snapshot {
    /// Configuration that pins every cell to its recorded state.
    pub fn to_config(&self) -> SimulationConfig {
        let mut config = self.config.clone();
        config.population = PopulationConfig::explicit(&self.states, config.state_count());
        config
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), SnapshotError> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SnapshotError> {
        let reader = BufReader::new(File::open(path)?);
        let snapshot: Snapshot = serde_json::from_reader(reader)?;
        let expected = snapshot.config.grid_size();
        if snapshot.states.len() != expected {
            return Err(SnapshotError::SizeMismatch {
                expected,
                found: snapshot.states.len(),
            });
        }
        Ok(snapshot)
    }
}

/// Snapshot persistence errors.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("Snapshot I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Snapshot JSON is malformed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Snapshot holds {found} states for a {expected}-cell grid")]
    SizeMismatch { expected: usize, found: usize },
}
