//! Cell storage and the neighbor-report side of the update protocol.
//!
//! Cells live in a flat row-major arena owned by the group and refer to each
//! other by index. Each cell keeps a multiset of the states its neighbors
//! last reported; after every tick it equals the neighbors' committed states.

use super::rules::Behavior;
use crate::schema::AutomatonKind;

/// Discrete cell state. Its meaning depends on the automaton.
pub type State = usize;

/// Vacant cell, shared by every automaton (dead for Life, burned for Fire).
pub const EMPTY: State = 0;

/// One grid position.
#[derive(Debug, Clone)]
pub struct Cell {
    state: State,
    /// Staged state, committed at reset.
    next_state: State,
    should_update: bool,
    has_moved: bool,
    neighbors: Vec<usize>,
    /// Cells that list this one as a neighbor.
    listeners: Vec<usize>,
    neighbor_state: Vec<State>,
    behavior: Behavior,
}

impl Cell {
    pub fn new(state: State, behavior: Behavior) -> Self {
        Self {
            state,
            next_state: state,
            should_update: false,
            has_moved: false,
            neighbors: Vec::new(),
            listeners: Vec::new(),
            neighbor_state: Vec::new(),
            behavior,
        }
    }

    #[inline]
    pub fn state(&self) -> State {
        self.state
    }

    #[inline]
    pub fn next_state(&self) -> State {
        self.next_state
    }

    /// Whether the committed state is [`EMPTY`].
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.state == EMPTY
    }

    /// Whether the cell will be empty once this tick's staged moves commit.
    #[inline]
    pub fn is_vacant(&self) -> bool {
        self.next_state == EMPTY
    }

    /// Outcome of the most recent update decision.
    pub fn should_update(&self) -> bool {
        self.should_update
    }

    /// Whether an occupant arrived here during the current tick.
    pub fn has_moved(&self) -> bool {
        self.has_moved
    }

    pub fn neighbors(&self) -> &[usize] {
        &self.neighbors
    }

    pub fn listeners(&self) -> &[usize] {
        &self.listeners
    }

    /// States reported by neighbors, in no particular order.
    pub fn neighbor_state(&self) -> &[State] {
        &self.neighbor_state
    }

    /// Number of neighbors reporting `state`.
    pub fn count_neighbors(&self, state: State) -> usize {
        self.neighbor_state.iter().filter(|&&s| s == state).count()
    }

    pub fn behavior(&self) -> &Behavior {
        &self.behavior
    }

    pub fn kind(&self) -> AutomatonKind {
        self.behavior.kind()
    }

    pub(crate) fn behavior_mut(&mut self) -> &mut Behavior {
        &mut self.behavior
    }

    pub(crate) fn set_neighbors(&mut self, neighbors: Vec<usize>) {
        debug_assert!(self.neighbors.is_empty(), "neighbors are assigned once");
        self.neighbor_state = Vec::with_capacity(neighbors.len());
        self.neighbors = neighbors;
    }

    pub(crate) fn set_listeners(&mut self, listeners: Vec<usize>) {
        self.listeners = listeners;
    }

    /// Record a neighbor's full state report.
    pub(crate) fn listen_for_state(&mut self, state: State) {
        self.neighbor_state.push(state);
    }

    /// Replace one reported `old` with `new`.
    pub(crate) fn listen_for_update(&mut self, old: State, new: State) {
        if let Some(slot) = self.neighbor_state.iter_mut().find(|s| **s == old) {
            *slot = new;
        } else {
            log::warn!("Neighbor update {old} -> {new} with no matching report");
        }
    }

    /// Accept an occupant moving in this tick.
    pub(crate) fn listen_for_arrival(&mut self, state: State, behavior: Behavior) {
        self.next_state = state;
        self.behavior = behavior;
        self.has_moved = true;
    }

    /// Lose an encounter against `conqueror`.
    pub(crate) fn listen_for_defeat(&mut self, conqueror: State) {
        if let Behavior::Rps(rps) = &mut self.behavior {
            rps.defeated_by(conqueror);
        }
    }

    /// Win an encounter.
    pub(crate) fn listen_for_victory(&mut self) {
        if let Behavior::Rps(rps) = &mut self.behavior {
            rps.victorious();
        }
    }

    pub(crate) fn decide(&mut self, should_update: bool) -> bool {
        self.should_update = should_update;
        should_update
    }

    pub(crate) fn stage(&mut self, next: State) {
        self.next_state = next;
    }

    /// Commit the staged state and clear per-tick marks, returning the old state.
    pub(crate) fn commit(&mut self) -> State {
        let old = self.state;
        self.state = self.next_state;
        self.has_moved = false;
        old
    }

    /// Overwrite both committed and staged state.
    pub(crate) fn force(&mut self, state: State) {
        self.state = state;
        self.next_state = state;
        self.has_moved = false;
    }
}

/// Staged change recorded during the update phase, undone if the tick aborts.
#[derive(Debug, Clone)]
pub(crate) enum Undo {
    Decision {
        index: usize,
        should_update: bool,
    },
    Staging {
        index: usize,
        next_state: State,
        has_moved: bool,
        behavior: Behavior,
    },
}

impl Cell {
    /// Record the staged part of this cell before it is modified.
    pub(crate) fn checkpoint(&self, index: usize) -> Undo {
        Undo::Staging {
            index,
            next_state: self.next_state,
            has_moved: self.has_moved,
            behavior: self.behavior.clone(),
        }
    }
}

/// Replay `journal` newest first, restoring every recorded cell.
pub(crate) fn rollback(cells: &mut [Cell], journal: Vec<Undo>) {
    for entry in journal.into_iter().rev() {
        match entry {
            Undo::Decision {
                index,
                should_update,
            } => cells[index].should_update = should_update,
            Undo::Staging {
                index,
                next_state,
                has_moved,
                behavior,
            } => {
                let cell = &mut cells[index];
                cell.next_state = next_state;
                cell.has_moved = has_moved;
                cell.behavior = behavior;
            }
        }
    }
}

/// Report `index`'s full state to every cell that lists it as a neighbor.
pub(crate) fn push_state_to_neighbors(cells: &mut [Cell], index: usize) {
    let state = cells[index].state;
    for k in 0..cells[index].listeners.len() {
        let listener = cells[index].listeners[k];
        cells[listener].listen_for_state(state);
    }
}

/// Report a state change of `index` to every cell that lists it as a neighbor.
pub(crate) fn push_update_to_neighbors(cells: &mut [Cell], index: usize, old: State, new: State) {
    if old == new {
        return;
    }
    for k in 0..cells[index].listeners.len() {
        let listener = cells[index].listeners[k];
        cells[listener].listen_for_update(old, new);
    }
}
