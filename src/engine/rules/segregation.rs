//! Schelling segregation: unhappy residents relocate to a reachable vacancy.

use std::collections::VecDeque;

use super::Behavior;
use crate::engine::SimulationError;
use crate::engine::cell::{Cell, EMPTY, State, Undo};
use crate::schema::SegregationParams;

pub const GROUP_ONE: State = 1;
pub const GROUP_TWO: State = 2;

/// Resident preferences plus the destinations it recently moved to.
#[derive(Debug, Clone, PartialEq)]
pub struct SegregationCell {
    happiness_ratio: f64,
    history_length: usize,
    history: VecDeque<usize>,
}

impl SegregationCell {
    pub fn new(params: &SegregationParams) -> Self {
        Self {
            happiness_ratio: params.happiness_ratio,
            history_length: params.history_length,
            history: VecDeque::new(),
        }
    }

    pub fn happiness_ratio(&self) -> f64 {
        self.happiness_ratio
    }

    /// Recent destinations, oldest first.
    pub fn history(&self) -> &VecDeque<usize> {
        &self.history
    }

    pub(crate) fn fresh(&self) -> Self {
        Self {
            history: VecDeque::new(),
            ..self.clone()
        }
    }

    fn remember(&mut self, destination: usize) {
        if self.history_length == 0 {
            return;
        }
        if self.history.len() == self.history_length {
            self.history.pop_front();
        }
        self.history.push_back(destination);
    }
}

/// Share of occupied neighbors in the cell's own group.
///
/// `None` when no neighbor is occupied.
pub fn similarity(cell: &Cell) -> Option<f64> {
    let occupied = cell.neighbor_state().len() - cell.count_neighbors(EMPTY);
    if occupied == 0 {
        return None;
    }
    Some(cell.count_neighbors(cell.state()) as f64 / occupied as f64)
}

pub(super) fn check_update(cell: &mut Cell) -> bool {
    let ratio = match cell.behavior() {
        Behavior::Segregation(resident) => resident.happiness_ratio,
        _ => return cell.decide(false),
    };
    let unhappy = !cell.is_empty() && similarity(cell).is_some_and(|s| s < ratio);
    cell.decide(unhappy)
}

/// Depth-first search from `origin` for a cell that is vacant after staged moves.
///
/// Neighbors are scanned in order; the first vacancy outside `history` wins.
/// The first vacancy inside it is kept as a fallback.
fn find_vacancy(cells: &[Cell], origin: usize, history: &VecDeque<usize>) -> Option<usize> {
    let mut visited = vec![false; cells.len()];
    let mut stack = vec![origin];
    let mut fallback = None;
    visited[origin] = true;

    while let Some(node) = stack.pop() {
        let mut descend = Vec::new();
        for &next in cells[node].neighbors() {
            if visited[next] {
                continue;
            }
            visited[next] = true;
            if cells[next].is_vacant() {
                if !history.contains(&next) {
                    return Some(next);
                }
                fallback.get_or_insert(next);
            }
            descend.push(next);
        }
        // Reverse so the first listed neighbor is explored first.
        stack.extend(descend.into_iter().rev());
    }
    fallback
}

pub(super) fn update(
    cells: &mut [Cell],
    index: usize,
    journal: Option<&mut Vec<Undo>>,
) -> Result<bool, SimulationError> {
    let mut resident = match cells[index].behavior() {
        Behavior::Segregation(resident) => resident.clone(),
        _ => return Ok(false),
    };
    let destination =
        find_vacancy(cells, index, &resident.history).ok_or(SimulationError::NoVacancy { index })?;

    if let Some(journal) = journal {
        journal.push(cells[destination].checkpoint(destination));
        journal.push(cells[index].checkpoint(index));
    }

    let group = cells[index].state();
    log::trace!("group {group} resident at {index} relocates to {destination}");

    let vacated = Behavior::Segregation(resident.fresh());
    resident.remember(destination);
    cells[destination].listen_for_arrival(group, Behavior::Segregation(resident));
    cells[index].stage(EMPTY);
    *cells[index].behavior_mut() = vacated;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::CellGroup;
    use crate::schema::{Adjacency, Automaton, ConfigError, PopulationConfig, SimulationConfig};

    fn segregation_grid(
        width: usize,
        height: usize,
        states: &[State],
        params: SegregationParams,
    ) -> CellGroup {
        CellGroup::build(SimulationConfig {
            width,
            height,
            automaton: Automaton::Segregation(params),
            population: PopulationConfig::explicit(states, 3),
            random_seed: Some(9),
            ..Default::default()
        })
        .unwrap()
    }

    fn short_history() -> SegregationParams {
        SegregationParams {
            history_length: 2,
            ..Default::default()
        }
    }

    fn occupied(group: &CellGroup) -> usize {
        group.state_counts()[GROUP_ONE] + group.state_counts()[GROUP_TWO]
    }

    #[test]
    fn test_similarity() {
        #[rustfmt::skip]
        let states = [
            0, 1, 0,
            2, 1, 2,
            0, 0, 0,
        ];
        let group = segregation_grid(3, 3, &states, SegregationParams::default());
        assert_eq!(similarity(group.cell(4).unwrap()), Some(1.0 / 3.0));
        assert_eq!(similarity(group.cell(3).unwrap()), Some(0.0));

        let lonely = segregation_grid(3, 1, &[1, 0, 0], short_history());
        assert_eq!(similarity(lonely.cell(0).unwrap()), None);
    }

    #[test]
    fn test_isolated_resident_is_happy() {
        let mut group = segregation_grid(3, 1, &[1, 0, 2], short_history());
        group.run(3).unwrap();
        assert_eq!(group.states(), vec![1, 0, 2]);
    }

    #[test]
    fn test_unhappy_resident_moves() {
        let params = SegregationParams {
            happiness_ratio: 0.5,
            history_length: 2,
        };
        let mut group = segregation_grid(4, 1, &[1, 2, 0, 0], params);
        group.advance().unwrap();
        // Both residents are unhappy and each takes the first vacancy it reaches.
        assert_eq!(group.states(), vec![2, 0, 1, 0]);
        match group.cell(2).unwrap().behavior() {
            Behavior::Segregation(resident) => {
                assert_eq!(resident.history().iter().copied().collect::<Vec<_>>(), vec![2]);
            }
            other => panic!("unexpected behavior {other:?}"),
        }
    }

    #[test]
    fn test_history_is_avoided_when_possible() {
        let mut cells = segregation_grid(4, 1, &[1, 0, 0, 0], short_history())
            .cells()
            .to_vec();
        let history = VecDeque::from([1]);
        assert_eq!(find_vacancy(&cells, 0, &history), Some(2));

        // Only a remembered cell is reachable.
        cells[2].stage(GROUP_TWO);
        cells[3].stage(GROUP_TWO);
        assert_eq!(find_vacancy(&cells, 0, &history), Some(1));
    }

    #[test]
    fn test_full_grid_has_no_vacancy() {
        #[rustfmt::skip]
        let states = [
            2, 2, 2,
            2, 1, 2,
            2, 2, 2,
        ];
        let mut group = segregation_grid(3, 3, &states, SegregationParams::default());
        let err = group.advance().unwrap_err();
        assert!(matches!(err, SimulationError::NoVacancy { .. }));
        assert_eq!(group.states(), states.to_vec());
        assert_eq!(group.tick(), 0);
    }

    #[test]
    fn test_aborted_tick_undoes_earlier_moves() {
        // Diagonal adjacency splits the grid into two checkerboard components.
        // Cell 0 relocates to 8, then cell 1 finds its component full.
        #[rustfmt::skip]
        let states = [
            1, 1, 2,
            2, 2, 2,
            2, 2, 0,
        ];
        let mut group = CellGroup::build(SimulationConfig {
            width: 3,
            height: 3,
            adjacency: Adjacency::Diagonal,
            automaton: Automaton::Segregation(SegregationParams::default()),
            population: PopulationConfig::explicit(&states, 3),
            random_seed: Some(9),
            ..Default::default()
        })
        .unwrap();
        let before: Vec<Cell> = group.cells().to_vec();

        assert_eq!(
            group.advance(),
            Err(SimulationError::NoVacancy { index: 1 })
        );
        assert_eq!(group.tick(), 0);
        assert!(group.is_synchronized());
        for (cell, old) in group.cells().iter().zip(&before) {
            assert_eq!(cell.state(), old.state());
            assert_eq!(cell.next_state(), old.next_state());
            assert_eq!(cell.should_update(), old.should_update());
            assert_eq!(cell.has_moved(), old.has_moved());
            assert_eq!(cell.behavior(), old.behavior());
            assert_eq!(cell.neighbor_state(), old.neighbor_state());
        }
    }

    #[test]
    fn test_oversized_history_is_rejected_at_build() {
        let config = SimulationConfig {
            width: 2,
            height: 1,
            automaton: Automaton::Segregation(SegregationParams {
                history_length: usize::MAX,
                ..Default::default()
            }),
            population: PopulationConfig::explicit(&[1, 0], 3),
            ..Default::default()
        };
        assert!(matches!(
            CellGroup::build(config),
            Err(ConfigError::InvalidParameter {
                name: "history_length",
                ..
            })
        ));
    }

    #[test]
    fn test_history_grows_only_with_moves() {
        let resident = SegregationCell::new(&SegregationParams {
            history_length: 1000,
            ..Default::default()
        });
        assert_eq!(resident.history().capacity(), 0);
        assert_eq!(resident.fresh().history().capacity(), 0);
    }

    #[test]
    fn test_occupants_are_conserved() {
        #[rustfmt::skip]
        let states = [
            1, 2, 2, 1, 1,
            0, 2, 1, 1, 2,
            0, 1, 0, 2, 1,
            2, 0, 1, 2, 1,
            1, 2, 2, 2, 1,
        ];
        let params = SegregationParams {
            happiness_ratio: 0.3,
            history_length: 5,
        };
        let mut group = segregation_grid(5, 5, &states, params);
        let before = group.state_counts();
        for _ in 0..20 {
            group.advance().unwrap();
            assert_eq!(group.state_counts(), before);
            assert_eq!(occupied(&group), 21);
            assert!(group.is_synchronized());
        }
    }
}
