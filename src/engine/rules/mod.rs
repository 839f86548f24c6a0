//! Transition rules for the five automaton families.
//!
//! Every rule follows the same two-phase protocol. During the update phase a
//! cell decides from its neighbor reports and stages its next state (movers
//! also stage arrivals into destination cells). During the reset phase every
//! cell commits and reports the change to the cells that list it.

mod fire;
mod life;
mod rps;
mod segregation;
mod wator;

pub use fire::*;
pub use life::*;
pub use rps::*;
pub use segregation::*;
pub use wator::*;

use rand::rngs::StdRng;

use super::SimulationError;
use super::cell::{Cell, State, Undo, push_update_to_neighbors};
use crate::schema::{Automaton, AutomatonKind};

/// Rule-specific cell data.
#[derive(Debug, Clone, PartialEq)]
pub enum Behavior {
    Fire(FireCell),
    Life(LifeCell),
    WaTor(WaTorCell),
    Segregation(SegregationCell),
    Rps(RpsCell),
}

impl Behavior {
    pub fn new(automaton: &Automaton) -> Self {
        match automaton {
            Automaton::Fire(p) => Behavior::Fire(FireCell::new(p)),
            Automaton::Life(p) => Behavior::Life(LifeCell::new(p)),
            Automaton::WaTor(p) => Behavior::WaTor(WaTorCell::new(p)),
            Automaton::Segregation(p) => Behavior::Segregation(SegregationCell::new(p)),
            Automaton::Rps(p) => Behavior::Rps(RpsCell::new(p)),
        }
    }

    pub fn kind(&self) -> AutomatonKind {
        match self {
            Behavior::Fire(_) => AutomatonKind::Fire,
            Behavior::Life(_) => AutomatonKind::Life,
            Behavior::WaTor(_) => AutomatonKind::WaTor,
            Behavior::Segregation(_) => AutomatonKind::Segregation,
            Behavior::Rps(_) => AutomatonKind::Rps,
        }
    }

    /// Data for a newly placed occupant, keeping the parameters.
    pub fn respawn(&self) -> Self {
        match self {
            Behavior::Fire(_) | Behavior::Life(_) => self.clone(),
            Behavior::WaTor(animal) => Behavior::WaTor(animal.newborn()),
            Behavior::Segregation(resident) => Behavior::Segregation(resident.fresh()),
            Behavior::Rps(creature) => Behavior::Rps(creature.fresh()),
        }
    }
}

/// Decide whether `cell` transitions this tick.
pub(crate) fn check_update(cell: &mut Cell, rng: &mut StdRng) -> bool {
    match cell.kind() {
        AutomatonKind::Fire => fire::check_update(cell, rng),
        AutomatonKind::Life => life::check_update(cell),
        AutomatonKind::WaTor => wator::check_update(cell),
        AutomatonKind::Segregation => segregation::check_update(cell),
        AutomatonKind::Rps => rps::check_update(cell),
    }
}

/// Update phase for one cell. Returns whether anything was staged.
///
/// When a `journal` is given, every staged change is recorded in it first.
pub(crate) fn update(
    cells: &mut [Cell],
    index: usize,
    rng: &mut StdRng,
    mut journal: Option<&mut Vec<Undo>>,
) -> Result<bool, SimulationError> {
    let should_update = cells[index].should_update();
    let decided = check_update(&mut cells[index], rng);
    if let Some(journal) = journal.as_deref_mut()
        && decided != should_update
    {
        journal.push(Undo::Decision {
            index,
            should_update,
        });
    }
    if !decided {
        return Ok(false);
    }
    match cells[index].kind() {
        AutomatonKind::Fire => Ok(fire::update(&mut cells[index])),
        AutomatonKind::Life => Ok(life::update(&mut cells[index])),
        AutomatonKind::WaTor => Ok(wator::update(cells, index)),
        AutomatonKind::Segregation => segregation::update(cells, index, journal),
        AutomatonKind::Rps => Ok(rps::update(cells, index, rng)),
    }
}

/// Reset phase for one cell: commit and report the change to listeners.
pub(crate) fn reset(cells: &mut [Cell], index: usize) {
    let cell = &mut cells[index];
    let old: State = match cell.kind() {
        AutomatonKind::WaTor => wator::reset(cell),
        AutomatonKind::Rps => rps::reset(cell),
        _ => cell.commit(),
    };
    let new = cell.state();
    push_update_to_neighbors(cells, index, old, new);
}
