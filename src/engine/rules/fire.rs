//! Fire spread: burning cells burn out, unburned cells catch from burning neighbors.

use rand::Rng;
use rand::rngs::StdRng;

use super::Behavior;
use crate::engine::cell::{Cell, EMPTY, State};
use crate::schema::FireParams;

pub const ON_FIRE: State = 1;
pub const UNBURNED: State = 2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FireCell {
    catch_probability: f64,
}

impl FireCell {
    pub fn new(params: &FireParams) -> Self {
        Self {
            catch_probability: params.catch_probability,
        }
    }

    pub fn catch_probability(&self) -> f64 {
        self.catch_probability
    }
}

pub(super) fn check_update(cell: &mut Cell, rng: &mut StdRng) -> bool {
    let Behavior::Fire(fire) = *cell.behavior() else {
        return cell.decide(false);
    };
    // The draw happens only next to a fire.
    let transitions = match cell.state() {
        ON_FIRE => true,
        UNBURNED => {
            cell.neighbor_state().contains(&ON_FIRE) && rng.gen_bool(fire.catch_probability)
        }
        _ => false,
    };
    cell.decide(transitions)
}

pub(super) fn update(cell: &mut Cell) -> bool {
    let next = if cell.state() == UNBURNED {
        ON_FIRE
    } else {
        EMPTY
    };
    cell.stage(next);
    true
}
