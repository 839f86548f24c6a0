//! Life: birth and death by counting living neighbors.

use super::Behavior;
use crate::engine::cell::{Cell, State};
use crate::schema::LifeParams;

pub const DEAD: State = 0;
pub const ALIVE: State = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifeCell {
    underpopulation: usize,
    overpopulation: usize,
    reproduction: usize,
}

impl LifeCell {
    pub fn new(params: &LifeParams) -> Self {
        Self {
            underpopulation: params.underpopulation,
            overpopulation: params.overpopulation,
            reproduction: params.reproduction,
        }
    }

    fn is_dying(&self, state: State, living: usize) -> bool {
        state == ALIVE && (living < self.underpopulation || living > self.overpopulation)
    }

    fn is_born(&self, state: State, living: usize) -> bool {
        state == DEAD && living == self.reproduction
    }
}

pub(super) fn check_update(cell: &mut Cell) -> bool {
    let Behavior::Life(life) = *cell.behavior() else {
        return cell.decide(false);
    };
    let living = cell.count_neighbors(ALIVE);
    let state = cell.state();
    cell.decide(life.is_dying(state, living) ^ life.is_born(state, living))
}

pub(super) fn update(cell: &mut Cell) -> bool {
    let next = if cell.state() == ALIVE { DEAD } else { ALIVE };
    cell.stage(next);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::CellGroup;
    use crate::schema::{Adjacency, Automaton, EdgeMode, PopulationConfig, SimulationConfig};

    fn life_grid(width: usize, height: usize, states: &[State], edges: EdgeMode) -> CellGroup {
        CellGroup::build(SimulationConfig {
            width,
            height,
            adjacency: Adjacency::All,
            edges,
            automaton: Automaton::Life(LifeParams::default()),
            population: PopulationConfig::explicit(states, 2),
            random_seed: Some(1),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_overpopulated_center_dies() {
        let mut group = life_grid(3, 3, &[ALIVE; 9], EdgeMode::Clip);
        group.advance().unwrap();
        assert_eq!(group.cell(4).unwrap().state(), DEAD);
        // Corners have exactly three living neighbors and survive.
        assert_eq!(group.cell(0).unwrap().state(), ALIVE);
        assert_eq!(group.cell(1).unwrap().state(), DEAD);
    }

    #[test]
    fn test_birth_with_exactly_three() {
        #[rustfmt::skip]
        let states = [
            1, 1, 1,
            0, 0, 0,
            0, 0, 0,
        ];
        let mut group = life_grid(3, 3, &states, EdgeMode::Clip);
        group.advance().unwrap();
        assert_eq!(group.cell(4).unwrap().state(), ALIVE);
    }

    #[test]
    fn test_blinker_oscillates() {
        let mut states = vec![DEAD; 25];
        for index in [11, 12, 13] {
            states[index] = ALIVE;
        }
        let mut group = life_grid(5, 5, &states, EdgeMode::Clip);

        group.advance().unwrap();
        let vertical: Vec<usize> = (0..25)
            .filter(|&i| group.cell(i).unwrap().state() == ALIVE)
            .collect();
        assert_eq!(vertical, vec![7, 12, 17]);

        group.advance().unwrap();
        assert_eq!(group.states(), states);
    }

    #[test]
    fn test_block_is_still_on_torus() {
        #[rustfmt::skip]
        let states = [
            1, 1, 0, 0,
            1, 1, 0, 0,
            0, 0, 0, 0,
            0, 0, 0, 0,
        ];
        let mut group = life_grid(4, 4, &states, EdgeMode::Wrap);
        group.run(3).unwrap();
        assert_eq!(group.states(), states.to_vec());
    }
}
