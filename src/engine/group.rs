//! Cell group - Builds the population and drives the two-phase tick.

use rand::prelude::*;
use serde::{Deserialize, Serialize};

use super::SimulationError;
use super::cell::{
    Cell, EMPTY, State, Undo, push_state_to_neighbors, push_update_to_neighbors, rollback,
};
use super::rules::{self, Behavior};
use super::topology::Topology;
use crate::schema::{AutomatonKind, ConfigError, SimulationConfig, Snapshot};

/// A grid of cells running one automaton.
pub struct CellGroup {
    config: SimulationConfig,
    topology: Topology,
    /// Row-major cell arena.
    cells: Vec<Cell>,
    rng: StdRng,
    tick: u64,
}

impl CellGroup {
    /// Validate `config` and build the grid.
    ///
    /// Overrides are pinned first; the remaining cells are drawn from the
    /// configured counts. Nothing is allocated when validation fails.
    pub fn build(config: SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let topology = Topology::from_config(&config)?;

        let seed = config.random_seed.unwrap_or_else(rand::random);
        let mut rng = StdRng::seed_from_u64(seed);

        let behavior = Behavior::new(&config.automaton);
        let mut cells: Vec<Cell> = initial_states(&config, &mut rng)
            .into_iter()
            .map(|state| Cell::new(state, behavior.clone()))
            .collect();

        let neighbors = topology.neighbor_table();
        let listeners = Topology::listener_table(&neighbors);
        for ((cell, n), l) in cells.iter_mut().zip(neighbors).zip(listeners) {
            cell.set_neighbors(n);
            cell.set_listeners(l);
        }
        for index in 0..cells.len() {
            push_state_to_neighbors(&mut cells, index);
        }

        log::debug!(
            "Built {}x{} {:?} grid ({:?} adjacency, {:?} edges) for {:?}, seed {}",
            config.width,
            config.height,
            config.shape,
            topology.adjacency(),
            topology.edges(),
            config.automaton.kind(),
            seed
        );

        Ok(Self {
            config,
            topology,
            cells,
            rng,
            tick: 0,
        })
    }

    /// Run one synchronous tick: every cell updates, then every cell resets.
    ///
    /// On error the grid is left exactly as it was before the tick.
    pub fn advance(&mut self) -> Result<(), SimulationError> {
        // Only relocation searches can fail mid-tick, so only they keep a journal.
        let mut journal = (self.kind() == AutomatonKind::Segregation).then(Vec::new);

        if let Err(err) = self.update_phase(journal.as_mut()) {
            if let Some(journal) = journal {
                rollback(&mut self.cells, journal);
            }
            log::warn!("Tick {} aborted: {}", self.tick + 1, err);
            return Err(err);
        }
        self.reset_phase();

        self.tick += 1;
        log::trace!("Tick {} complete", self.tick);
        Ok(())
    }

    /// Run multiple ticks, stopping at the first error.
    pub fn run(&mut self, steps: u64) -> Result<(), SimulationError> {
        for _ in 0..steps {
            self.advance()?;
        }
        Ok(())
    }

    fn update_phase(
        &mut self,
        mut journal: Option<&mut Vec<Undo>>,
    ) -> Result<(), SimulationError> {
        for index in 0..self.cells.len() {
            rules::update(&mut self.cells, index, &mut self.rng, journal.as_deref_mut())?;
        }
        Ok(())
    }

    fn reset_phase(&mut self) {
        for index in 0..self.cells.len() {
            rules::reset(&mut self.cells, index);
        }
    }

    /// Number of cells in each state, indexed by state.
    pub fn state_counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.config.state_count()];
        for cell in &self.cells {
            if let Some(count) = counts.get_mut(cell.state()) {
                *count += 1;
            }
        }
        counts
    }

    /// Force the cell at `index` into `state` and notify its listeners.
    ///
    /// A new occupant starts with fresh rule data.
    pub fn set_cell(&mut self, index: usize, state: State) -> Result<(), SimulationError> {
        let size = self.cells.len();
        if index >= size {
            return Err(SimulationError::IndexOutOfRange { index, size });
        }
        let states = self.config.state_count();
        if state >= states {
            return Err(SimulationError::StateOutOfRange { state, states });
        }

        let cell = &mut self.cells[index];
        let old = cell.state();
        let fresh = cell.behavior().respawn();
        cell.force(state);
        *cell.behavior_mut() = fresh;
        push_update_to_neighbors(&mut self.cells, index, old, state);
        Ok(())
    }

    /// Current configuration, states and tick.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            config: self.config.clone(),
            tick: self.tick,
            states: self.states(),
        }
    }

    pub fn stats(&self) -> PopulationStats {
        PopulationStats::from_group(self)
    }

    /// Whether every cell's neighbor reports match its neighbors' states.
    pub fn is_synchronized(&self) -> bool {
        self.cells.iter().all(|cell| {
            let mut reported = cell.neighbor_state().to_vec();
            let mut actual: Vec<State> = cell
                .neighbors()
                .iter()
                .map(|&n| self.cells[n].state())
                .collect();
            reported.sort_unstable();
            actual.sort_unstable();
            reported == actual
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn kind(&self) -> AutomatonKind {
        self.config.automaton.kind()
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn cell(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Row-major committed states.
    pub fn states(&self) -> Vec<State> {
        self.cells.iter().map(Cell::state).collect()
    }

    /// Number of completed ticks.
    pub fn tick(&self) -> u64 {
        self.tick
    }
}

/// Pins overrides, then fills every other cell by rejection sampling.
fn initial_states(config: &SimulationConfig, rng: &mut StdRng) -> Vec<State> {
    let size = config.grid_size();
    let mut pinned: Vec<Option<State>> = vec![None; size];
    for o in &config.population.overrides {
        pinned[o.index] = Some(o.state);
    }

    let bounds = cumulative_ratios(&config.population.counts, size);
    let mut remaining = config.population.counts.clone();
    pinned
        .into_iter()
        .map(|state| state.unwrap_or_else(|| draw_state(&bounds, &mut remaining, rng)))
        .collect()
}

/// Bucket boundaries `0, c0/n, (c0+c1)/n, ...` over `(0, 1]`.
fn cumulative_ratios(counts: &[usize], size: usize) -> Vec<f64> {
    let mut bounds = Vec::with_capacity(counts.len() + 1);
    let mut total = 0.0;
    bounds.push(total);
    for &count in counts {
        total += count as f64 / size as f64;
        bounds.push(total);
    }
    bounds
}

/// Draw until the sample lands in a bucket that still has cells to place.
fn draw_state(bounds: &[f64], remaining: &mut [usize], rng: &mut StdRng) -> State {
    loop {
        let sample: f64 = rng.r#gen();
        for (state, bucket) in bounds.windows(2).enumerate() {
            if sample > bucket[0] && sample <= bucket[1] && remaining[state] > 0 {
                remaining[state] -= 1;
                return state;
            }
        }
    }
}

/// Per-tick population summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationStats {
    pub tick: u64,
    /// Cells per state, indexed by state.
    pub counts: Vec<usize>,
    /// Cells not in the empty state.
    pub occupied: usize,
}

impl PopulationStats {
    /// Compute statistics from a group.
    pub fn from_group(group: &CellGroup) -> Self {
        let counts = group.state_counts();
        let occupied = group.cells().len() - counts.get(EMPTY).copied().unwrap_or(0);
        Self {
            tick: group.tick(),
            counts,
            occupied,
        }
    }
}
