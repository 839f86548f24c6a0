//! Rock-paper-scissors: creatures spread into empty space and convert the
//! species they beat once their fade budget is exhausted.

use rand::Rng;
use rand::rngs::StdRng;

use super::Behavior;
use crate::engine::cell::{Cell, EMPTY, State};
use crate::schema::RpsParams;

pub const ROCK: State = 1;
pub const PAPER: State = 2;
pub const SCISSORS: State = 3;

/// The species `state` defeats, if any.
pub fn beats(state: State) -> Option<State> {
    match state {
        ROCK => Some(SCISSORS),
        PAPER => Some(ROCK),
        SCISSORS => Some(PAPER),
        _ => None,
    }
}

/// The species that defeats `state`, if any.
pub fn loses_to(state: State) -> Option<State> {
    match state {
        ROCK => Some(PAPER),
        PAPER => Some(SCISSORS),
        SCISSORS => Some(ROCK),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RpsCell {
    fade_distance: i32,
    fade: i32,
    /// Fade change staged this tick.
    fade_delta: i32,
    /// Last species to defeat this cell this tick.
    conqueror: Option<State>,
}

impl RpsCell {
    pub fn new(params: &RpsParams) -> Self {
        Self {
            fade_distance: params.fade_distance,
            fade: params.fade_distance,
            fade_delta: 0,
            conqueror: None,
        }
    }

    pub fn fade(&self) -> i32 {
        self.fade
    }

    pub(crate) fn fresh(&self) -> Self {
        Self {
            fade: self.fade_distance,
            fade_delta: 0,
            conqueror: None,
            ..*self
        }
    }

    fn offspring(&self) -> Self {
        Self {
            fade: self.fade - 1,
            fade_delta: 0,
            conqueror: None,
            ..*self
        }
    }

    pub(crate) fn defeated_by(&mut self, conqueror: State) {
        self.fade_delta -= 1;
        self.conqueror = Some(conqueror);
    }

    pub(crate) fn victorious(&mut self) {
        self.fade_delta += 1;
    }
}

pub(super) fn check_update(cell: &mut Cell) -> bool {
    let active = !cell.is_empty() && !cell.neighbors().is_empty();
    cell.decide(active)
}

pub(super) fn update(cells: &mut [Cell], index: usize, rng: &mut StdRng) -> bool {
    let Behavior::Rps(creature) = *cells[index].behavior() else {
        return false;
    };
    let target = {
        let neighbors = cells[index].neighbors();
        neighbors[rng.gen_range(0..neighbors.len())]
    };
    let own = cells[index].state();
    let other = cells[target].state();

    if other == EMPTY {
        if creature.fade > 0 && cells[target].is_vacant() {
            cells[target].listen_for_arrival(own, Behavior::Rps(creature.offspring()));
            return true;
        }
        return false;
    }
    if beats(own) == Some(other) {
        cells[index].listen_for_victory();
        cells[target].listen_for_defeat(own);
        true
    } else if loses_to(own) == Some(other) {
        cells[target].listen_for_victory();
        cells[index].listen_for_defeat(other);
        true
    } else {
        false
    }
}

/// Apply staged fade changes, convert exhausted losers, then commit.
pub(super) fn reset(cell: &mut Cell) -> State {
    let converted = match cell.behavior_mut() {
        Behavior::Rps(creature) => {
            creature.fade += creature.fade_delta;
            creature.fade_delta = 0;
            match creature.conqueror.take() {
                Some(conqueror) if creature.fade <= 0 => {
                    creature.fade = 0;
                    Some(conqueror)
                }
                _ => None,
            }
        }
        _ => None,
    };
    if let Some(conqueror) = converted {
        cell.stage(conqueror);
    }
    cell.commit()
}
