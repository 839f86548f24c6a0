//! Cellgrid - Discrete cellular automata on square, hexagonal and triangular grids.
//!
//! Five automata share one synchronous update protocol: forest fire, Life,
//! Wa-Tor predator-prey, Schelling segregation and rock-paper-scissors.
//!
//! # Architecture
//!
//! - `schema`: Configuration, positional record codec and snapshots
//! - `engine`: Cells, transition rules, topology and the tick driver
//!
//! # Example
//!
//! ```rust,no_run
//! use cellgrid::{
//!     engine::CellGroup,
//!     schema::{Automaton, AutomatonKind, PopulationConfig, SimulationConfig},
//! };
//!
//! let config = SimulationConfig {
//!     width: 32,
//!     height: 32,
//!     automaton: Automaton::default_for(AutomatonKind::WaTor),
//!     population: PopulationConfig::random(vec![724, 250, 50]),
//!     random_seed: Some(7),
//!     ..Default::default()
//! };
//!
//! let mut group = CellGroup::build(config)?;
//! group.run(100)?;
//!
//! println!("Counts after 100 ticks: {:?}", group.state_counts());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod engine;
pub mod schema;

// Re-export commonly used types
pub use engine::{CellGroup, PopulationStats, SimulationError};
pub use schema::{Automaton, AutomatonKind, SimulationConfig, Snapshot};
