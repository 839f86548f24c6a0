//! Engine module - Cells, transition rules, topology and the tick driver.

mod cell;
mod group;

pub mod rules;
pub mod topology;

pub use cell::*;
pub use group::*;
pub use topology::Topology;

/// Errors raised while driving a grid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SimulationError {
    #[error("No vacant cell is reachable from unhappy cell {index}")]
    NoVacancy { index: usize },
    #[error("Cell index {index} is outside the {size}-cell grid")]
    IndexOutOfRange { index: usize, size: usize },
    #[error("State {state} is not valid for an automaton with {states} states")]
    StateOutOfRange { state: usize, states: usize },
}
