//! Wa-Tor predator-prey: minnows and sharks move, breed and starve.

use super::Behavior;
use crate::engine::cell::{Cell, EMPTY, State};
use crate::schema::WaTorParams;

pub const MINNOW: State = 1;
pub const SHARK: State = 2;

/// Per-animal counters plus the shared parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaTorCell {
    params: WaTorParams,
    energy: i32,
    rounds_survived: u32,
}

impl WaTorCell {
    pub fn new(params: &WaTorParams) -> Self {
        Self {
            params: *params,
            energy: params.starting_energy,
            rounds_survived: 0,
        }
    }

    pub fn energy(&self) -> i32 {
        self.energy
    }

    pub fn rounds_survived(&self) -> u32 {
        self.rounds_survived
    }

    pub(crate) fn newborn(&self) -> Self {
        Self::new(&self.params)
    }

    fn ready_to_breed(&self) -> bool {
        self.rounds_survived >= self.params.reproduction_threshold
    }
}

pub(super) fn check_update(cell: &mut Cell) -> bool {
    let moves = !cell.is_empty() && !cell.has_moved();
    cell.decide(moves)
}

/// Whether an animal of `species` may move into `destination` this tick.
fn accepts(destination: &Cell, species: State) -> bool {
    let open = destination.state() == EMPTY && destination.next_state() == EMPTY;
    let prey = species == SHARK
        && destination.state() == MINNOW
        && destination.next_state() == MINNOW;
    open || prey
}

pub(super) fn update(cells: &mut [Cell], index: usize) -> bool {
    let species = cells[index].state();
    let Behavior::WaTor(mut animal) = *cells[index].behavior() else {
        return false;
    };
    if species == SHARK {
        animal.energy -= animal.params.energy_loss;
    }

    let destination = cells[index]
        .neighbors()
        .iter()
        .copied()
        .find(|&n| accepts(&cells[n], species));
    let Some(destination) = destination else {
        animal.rounds_survived += 1;
        *cells[index].behavior_mut() = Behavior::WaTor(animal);
        return false;
    };

    if cells[destination].state() == MINNOW {
        animal.energy += animal.params.energy_gain;
    }
    let breeds = animal.ready_to_breed();
    let mover = WaTorCell {
        rounds_survived: if breeds {
            0
        } else {
            animal.rounds_survived + 1
        },
        ..animal
    };
    log::trace!(
        "{} at {index} moves to {destination}{}",
        if species == SHARK { "shark" } else { "minnow" },
        if breeds { ", leaving a newborn" } else { "" }
    );

    cells[destination].listen_for_arrival(species, Behavior::WaTor(mover));
    *cells[index].behavior_mut() = Behavior::WaTor(animal.newborn());
    if !breeds {
        cells[index].stage(EMPTY);
    }
    true
}

/// Commit, then remove sharks that ran out of energy.
pub(super) fn reset(cell: &mut Cell) -> State {
    let old = cell.commit();
    let starved = cell.state() == SHARK
        && matches!(cell.behavior(), Behavior::WaTor(shark) if shark.energy <= 0);
    if starved {
        cell.force(EMPTY);
    }
    old
}
