//! Configuration types for grid automaton simulations.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Tiling used to lay out the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    #[default]
    Square,
    Hex,
    Tri,
}

impl Shape {
    pub fn code(self) -> usize {
        match self {
            Shape::Square => 0,
            Shape::Hex => 1,
            Shape::Tri => 2,
        }
    }

    pub fn from_code(code: usize) -> Option<Self> {
        match code {
            0 => Some(Shape::Square),
            1 => Some(Shape::Hex),
            2 => Some(Shape::Tri),
            _ => None,
        }
    }
}

/// Which kinds of contact count as adjacency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Adjacency {
    /// Cells sharing a side.
    Orthogonal,
    /// Cells sharing only a corner.
    Diagonal,
    /// Both of the above.
    #[default]
    All,
}

impl Adjacency {
    #[inline]
    pub fn includes_sides(self) -> bool {
        self != Adjacency::Diagonal
    }

    #[inline]
    pub fn includes_diagonals(self) -> bool {
        self != Adjacency::Orthogonal
    }

    pub fn code(self) -> usize {
        match self {
            Adjacency::Orthogonal => 0,
            Adjacency::Diagonal => 1,
            Adjacency::All => 2,
        }
    }

    pub fn from_code(code: usize) -> Option<Self> {
        match code {
            0 => Some(Adjacency::Orthogonal),
            1 => Some(Adjacency::Diagonal),
            2 => Some(Adjacency::All),
            _ => None,
        }
    }
}

/// Behavior of neighbor lookups at the grid boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeMode {
    /// Neighbors past the boundary do not exist.
    #[default]
    Clip,
    /// The grid is a torus: each edge is joined to the opposite one.
    Wrap,
}

/// The five supported automaton families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AutomatonKind {
    Fire,
    Life,
    WaTor,
    Segregation,
    Rps,
}

impl AutomatonKind {
    pub const ALL: [AutomatonKind; 5] = [
        AutomatonKind::Fire,
        AutomatonKind::Life,
        AutomatonKind::WaTor,
        AutomatonKind::Segregation,
        AutomatonKind::Rps,
    ];

    /// Number of distinct cell states, `0..state_count()`.
    pub fn state_count(self) -> usize {
        match self {
            AutomatonKind::Fire => 3,
            AutomatonKind::Life => 2,
            AutomatonKind::WaTor => 3,
            AutomatonKind::Segregation => 3,
            AutomatonKind::Rps => 4,
        }
    }

    /// Predator-prey grids have no meaningful boundary and always wrap.
    pub fn always_wraps(self) -> bool {
        self == AutomatonKind::WaTor
    }

    pub fn code(self) -> usize {
        match self {
            AutomatonKind::Fire => 1,
            AutomatonKind::Life => 2,
            AutomatonKind::WaTor => 3,
            AutomatonKind::Segregation => 4,
            AutomatonKind::Rps => 5,
        }
    }

    pub fn from_code(code: usize) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.code() == code)
    }
}

/// Fire spread parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FireParams {
    /// Chance that an unburned cell next to a fire ignites each tick.
    pub catch_probability: f64,
}

impl Default for FireParams {
    fn default() -> Self {
        Self {
            catch_probability: 0.5,
        }
    }
}

/// Life thresholds, counted in living neighbors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifeParams {
    /// Living cells with fewer living neighbors die.
    pub underpopulation: usize,
    /// Living cells with more living neighbors die.
    pub overpopulation: usize,
    /// Dead cells with exactly this many living neighbors are born.
    pub reproduction: usize,
}

impl Default for LifeParams {
    fn default() -> Self {
        Self {
            underpopulation: 2,
            overpopulation: 3,
            reproduction: 3,
        }
    }
}

/// Predator-prey parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaTorParams {
    /// Energy of a newly placed animal.
    pub starting_energy: i32,
    /// Energy a shark gains by eating a minnow.
    pub energy_gain: i32,
    /// Energy a shark loses every tick.
    pub energy_loss: i32,
    /// Ticks an animal must survive before it breeds on its next move.
    pub reproduction_threshold: u32,
}

impl Default for WaTorParams {
    fn default() -> Self {
        Self {
            starting_energy: 2,
            energy_gain: 2,
            energy_loss: 1,
            reproduction_threshold: 3,
        }
    }
}

/// Schelling segregation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegregationParams {
    /// Minimum share of same-group occupied neighbors for a cell to stay put.
    pub happiness_ratio: f64,
    /// Number of recent destinations a mover avoids revisiting.
    pub history_length: usize,
}

impl Default for SegregationParams {
    fn default() -> Self {
        Self {
            happiness_ratio: 0.4,
            history_length: 5,
        }
    }
}

/// Rock-paper-scissors parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RpsParams {
    /// Initial fade budget: how far a creature spreads and how much it can absorb.
    pub fade_distance: i32,
}

impl Default for RpsParams {
    fn default() -> Self {
        Self { fade_distance: 3 }
    }
}

/// Automaton selection together with its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Automaton {
    Fire(FireParams),
    Life(LifeParams),
    WaTor(WaTorParams),
    Segregation(SegregationParams),
    Rps(RpsParams),
}

impl Default for Automaton {
    fn default() -> Self {
        Automaton::Life(LifeParams::default())
    }
}

impl Automaton {
    /// Automaton of the given kind with default parameters.
    pub fn default_for(kind: AutomatonKind) -> Self {
        match kind {
            AutomatonKind::Fire => Automaton::Fire(FireParams::default()),
            AutomatonKind::Life => Automaton::Life(LifeParams::default()),
            AutomatonKind::WaTor => Automaton::WaTor(WaTorParams::default()),
            AutomatonKind::Segregation => Automaton::Segregation(SegregationParams::default()),
            AutomatonKind::Rps => Automaton::Rps(RpsParams::default()),
        }
    }

    pub fn kind(&self) -> AutomatonKind {
        match self {
            Automaton::Fire(_) => AutomatonKind::Fire,
            Automaton::Life(_) => AutomatonKind::Life,
            Automaton::WaTor(_) => AutomatonKind::WaTor,
            Automaton::Segregation(_) => AutomatonKind::Segregation,
            Automaton::Rps(_) => AutomatonKind::Rps,
        }
    }

    /// Validate parameter ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            Automaton::Fire(p) => {
                if !(0.0..=1.0).contains(&p.catch_probability) {
                    return Err(invalid(
                        "catch_probability",
                        format!("{} is not within [0, 1]", p.catch_probability),
                    ));
                }
            }
            Automaton::Life(_) => {}
            Automaton::WaTor(p) => {
                if p.starting_energy <= 0 {
                    return Err(invalid("starting_energy", "must be positive".into()));
                }
                if p.energy_gain < 0 {
                    return Err(invalid("energy_gain", "must not be negative".into()));
                }
                if p.energy_loss < 0 {
                    return Err(invalid("energy_loss", "must not be negative".into()));
                }
            }
            Automaton::Segregation(p) => {
                if !(0.0..=1.0).contains(&p.happiness_ratio) {
                    return Err(invalid(
                        "happiness_ratio",
                        format!("{} is not within [0, 1]", p.happiness_ratio),
                    ));
                }
            }
            Automaton::Rps(p) => {
                if p.fade_distance < 0 {
                    return Err(invalid("fade_distance", "must not be negative".into()));
                }
            }
        }
        Ok(())
    }

    /// Parameters in their fixed positional order.
    pub fn param_values(&self) -> Vec<f64> {
        match self {
            Automaton::Fire(p) => vec![p.catch_probability],
            Automaton::Life(p) => vec![
                p.underpopulation as f64,
                p.overpopulation as f64,
                p.reproduction as f64,
            ],
            Automaton::WaTor(p) => vec![
                p.starting_energy as f64,
                p.energy_gain as f64,
                p.energy_loss as f64,
                p.reproduction_threshold as f64,
            ],
            Automaton::Segregation(p) => vec![p.happiness_ratio, p.history_length as f64],
            Automaton::Rps(p) => vec![p.fade_distance as f64],
        }
    }

    fn read_params(kind: AutomatonKind, record: &mut Record<'_>) -> Result<Self, ConfigError> {
        Ok(match kind {
            AutomatonKind::Fire => Automaton::Fire(FireParams {
                catch_probability: record.real("catch_probability")?,
            }),
            AutomatonKind::Life => Automaton::Life(LifeParams {
                underpopulation: record.count("underpopulation")?,
                overpopulation: record.count("overpopulation")?,
                reproduction: record.count("reproduction")?,
            }),
            AutomatonKind::WaTor => Automaton::WaTor(WaTorParams {
                starting_energy: record.signed("starting_energy")?,
                energy_gain: record.signed("energy_gain")?,
                energy_loss: record.signed("energy_loss")?,
                reproduction_threshold: record.code("reproduction_threshold", |v| {
                    u32::try_from(v).ok()
                })?,
            }),
            AutomatonKind::Segregation => Automaton::Segregation(SegregationParams {
                happiness_ratio: record.real("happiness_ratio")?,
                history_length: record.count("history_length")?,
            }),
            AutomatonKind::Rps => Automaton::Rps(RpsParams {
                fade_distance: record.signed("fade_distance")?,
            }),
        })
    }
}

/// A cell pinned to a state before random placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellOverride {
    pub state: usize,
    /// Row-major cell index.
    pub index: usize,
}

impl CellOverride {
    /// Override addressed by column `x` and row `y`.
    pub fn at(x: usize, y: usize, width: usize, state: usize) -> Self {
        Self {
            state,
            index: y * width + x,
        }
    }
}

/// Initial population: pinned cells plus per-state counts placed at random.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PopulationConfig {
    #[serde(default)]
    pub overrides: Vec<CellOverride>,
    /// Number of randomly placed cells per state, indexed by state.
    pub counts: Vec<usize>,
}

impl PopulationConfig {
    /// Population with only randomly placed cells.
    pub fn random(counts: Vec<usize>) -> Self {
        Self {
            overrides: Vec::new(),
            counts,
        }
    }

    /// Population pinning every cell to the given row-major states.
    pub fn explicit(states: &[usize], state_count: usize) -> Self {
        Self {
            overrides: states
                .iter()
                .enumerate()
                .map(|(index, &state)| CellOverride { state, index })
                .collect(),
            counts: vec![0; state_count],
        }
    }

    /// Check the population against the automaton's states and the grid size.
    pub fn validate(&self, kind: AutomatonKind, size: usize) -> Result<(), ConfigError> {
        let states = kind.state_count();
        if self.counts.len() != states {
            return Err(ConfigError::StateCountMismatch {
                kind,
                expected: states,
                found: self.counts.len(),
            });
        }

        let mut pinned = HashSet::with_capacity(self.overrides.len());
        for o in &self.overrides {
            if o.index >= size {
                return Err(ConfigError::OverrideIndexOutOfRange {
                    index: o.index,
                    size,
                });
            }
            if o.state >= states {
                return Err(ConfigError::OverrideStateOutOfRange {
                    index: o.index,
                    state: o.state,
                    states,
                });
            }
            if !pinned.insert(o.index) {
                return Err(ConfigError::DuplicateOverride { index: o.index });
            }
        }

        let found = self
            .counts
            .iter()
            .try_fold(self.overrides.len(), |acc, &c| acc.checked_add(c));
        match found {
            Some(found) if found == size => Ok(()),
            Some(found) => Err(ConfigError::PopulationMismatch {
                expected: size,
                found,
            }),
            None => Err(ConfigError::PopulationMismatch {
                expected: size,
                found: usize::MAX,
            }),
        }
    }
}

/// Top-level simulation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Grid width in cells.
    pub width: usize,
    /// Grid height in cells.
    pub height: usize,
    #[serde(default)]
    pub shape: Shape,
    #[serde(default)]
    pub adjacency: Adjacency,
    #[serde(default)]
    pub edges: EdgeMode,
    /// Renderer hint to outline each cell. Carried through snapshots untouched.
    #[serde(default)]
    pub outline: bool,
    pub automaton: Automaton,
    pub population: PopulationConfig,
    /// Seed for random placement and stochastic rules (random if absent).
    #[serde(default)]
    pub random_seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            width: 20,
            height: 20,
            shape: Shape::Square,
            adjacency: Adjacency::default(),
            edges: EdgeMode::Clip,
            outline: false,
            automaton: Automaton::default(),
            population: PopulationConfig::random(vec![300, 100]),
            random_seed: None,
        }
    }
}

impl SimulationConfig {
    /// Get total grid size (width * height).
    #[inline]
    pub fn grid_size(&self) -> usize {
        self.width * self.height
    }

    /// Number of states of the configured automaton.
    #[inline]
    pub fn state_count(&self) -> usize {
        self.automaton.kind().state_count()
    }

    /// Edge mode actually used for neighbor lookups.
    pub fn effective_edges(&self) -> EdgeMode {
        if self.automaton.kind().always_wraps() {
            EdgeMode::Wrap
        } else {
            self.edges
        }
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidDimensions);
        }
        let size = self
            .width
            .checked_mul(self.height)
            .ok_or(ConfigError::InvalidDimensions)?;
        if self.shape == Shape::Hex && self.adjacency == Adjacency::Diagonal {
            return Err(ConfigError::UnsupportedAdjacency {
                shape: self.shape,
                adjacency: self.adjacency,
            });
        }
        self.automaton.validate()?;
        if let Automaton::Segregation(p) = &self.automaton
            && p.history_length > size
        {
            return Err(invalid(
                "history_length",
                format!("{} exceeds the {size}-cell grid", p.history_length),
            ));
        }
        self.population.validate(self.automaton.kind(), size)
    }

    /// Decode a flat numeric record.
    ///
    /// Layout: `shape, outline, adjacency, edges, kind, width, height,
    /// num_states, num_overrides, (state, index) * num_overrides,
    /// counts * num_states, params...` where params follow
    /// [`Automaton::param_values`] order. The decoded configuration is
    /// validated before it is returned.
    pub fn from_values(values: &[f64]) -> Result<Self, ConfigError> {
        let mut record = Record::new(values);

        let shape = record.code("shape", Shape::from_code)?;
        let outline = record.flag("outline")?;
        let adjacency = record.code("adjacency", Adjacency::from_code)?;
        let edges = if record.flag("edges")? {
            EdgeMode::Wrap
        } else {
            EdgeMode::Clip
        };
        let kind = record.code("kind", AutomatonKind::from_code)?;
        let width = record.count("width")?;
        let height = record.count("height")?;

        let num_states = record.count("num_states")?;
        if num_states != kind.state_count() {
            return Err(ConfigError::StateCountMismatch {
                kind,
                expected: kind.state_count(),
                found: num_states,
            });
        }

        let num_overrides = record.count("num_overrides")?;
        let mut overrides = Vec::with_capacity(num_overrides.min(values.len()));
        for _ in 0..num_overrides {
            let state = record.count("override state")?;
            let index = record.count("override index")?;
            overrides.push(CellOverride { state, index });
        }

        let counts = (0..num_states)
            .map(|_| record.count("population count"))
            .collect::<Result<Vec<_>, _>>()?;

        let automaton = Automaton::read_params(kind, &mut record)?;
        record.finish()?;

        let config = Self {
            width,
            height,
            shape,
            adjacency,
            edges,
            outline,
            automaton,
            population: PopulationConfig { overrides, counts },
            random_seed: None,
        };
        config.validate()?;
        Ok(config)
    }

    /// Encode as a flat numeric record, the inverse of [`Self::from_values`].
    pub fn to_values(&self) -> Vec<f64> {
        let kind = self.automaton.kind();
        let mut values = vec![
            self.shape.code() as f64,
            if self.outline { 1.0 } else { 0.0 },
            self.adjacency.code() as f64,
            if self.edges == EdgeMode::Wrap { 1.0 } else { 0.0 },
            kind.code() as f64,
            self.width as f64,
            self.height as f64,
            kind.state_count() as f64,
            self.population.overrides.len() as f64,
        ];
        for o in &self.population.overrides {
            values.push(o.state as f64);
            values.push(o.index as f64);
        }
        values.extend(self.population.counts.iter().map(|&c| c as f64));
        values.extend(self.automaton.param_values());
        values
    }
}

/// Cursor over a positional configuration record.
struct Record<'a> {
    values: &'a [f64],
    pos: usize,
}

impl<'a> Record<'a> {
    fn new(values: &'a [f64]) -> Self {
        Self { values, pos: 0 }
    }

    fn next(&mut self) -> Result<f64, ConfigError> {
        let value = self
            .values
            .get(self.pos)
            .copied()
            .ok_or(ConfigError::MissingValues {
                expected: self.pos + 1,
                found: self.values.len(),
            })?;
        self.pos += 1;
        Ok(value)
    }

    fn code<T>(
        &mut self,
        field: &'static str,
        decode: impl FnOnce(usize) -> Option<T>,
    ) -> Result<T, ConfigError> {
        let value = self.next()?;
        as_count(value)
            .and_then(decode)
            .ok_or(ConfigError::InvalidCode { field, value })
    }

    fn count(&mut self, field: &'static str) -> Result<usize, ConfigError> {
        self.code(field, Some)
    }

    fn flag(&mut self, field: &'static str) -> Result<bool, ConfigError> {
        self.code(field, |v| match v {
            0 => Some(false),
            1 => Some(true),
            _ => None,
        })
    }

    fn signed(&mut self, field: &'static str) -> Result<i32, ConfigError> {
        let value = self.next()?;
        if value.is_finite()
            && value.fract() == 0.0
            && value >= i32::MIN as f64
            && value <= i32::MAX as f64
        {
            Ok(value as i32)
        } else {
            Err(ConfigError::InvalidCode { field, value })
        }
    }

    fn real(&mut self, field: &'static str) -> Result<f64, ConfigError> {
        let value = self.next()?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(ConfigError::InvalidCode { field, value })
        }
    }

    fn finish(&self) -> Result<(), ConfigError> {
        match self.values.len() - self.pos {
            0 => Ok(()),
            count => Err(ConfigError::TrailingValues { count }),
        }
    }
}

fn as_count(value: f64) -> Option<usize> {
    (value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= usize::MAX as f64)
        .then_some(value as usize)
}

fn invalid(name: &'static str, reason: String) -> ConfigError {
    ConfigError::InvalidParameter { name, reason }
}

/// Configuration validation errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Grid dimensions (width, height) must be non-zero")]
    InvalidDimensions,
    #[error("{kind:?} automaton has {expected} states but {found} were configured")]
    StateCountMismatch {
        kind: AutomatonKind,
        expected: usize,
        found: usize,
    },
    #[error("Override of cell {index} uses state {state}, only {states} states exist")]
    OverrideStateOutOfRange {
        index: usize,
        state: usize,
        states: usize,
    },
    #[error("Override index {index} is outside the {size}-cell grid")]
    OverrideIndexOutOfRange { index: usize, size: usize },
    #[error("Cell {index} is overridden more than once")]
    DuplicateOverride { index: usize },
    #[error("Population describes {found} cells but the grid holds {expected}")]
    PopulationMismatch { expected: usize, found: usize },
    #[error("{shape:?} grids do not support {adjacency:?} adjacency")]
    UnsupportedAdjacency { shape: Shape, adjacency: Adjacency },
    #[error("Invalid value {value} for {field}")]
    InvalidCode { field: &'static str, value: f64 },
    #[error("Configuration record ended early: needed value {expected}, record has {found}")]
    MissingValues { expected: usize, found: usize },
    #[error("Configuration record has {count} unused trailing values")]
    TrailingValues { count: usize },
    #[error("Parameter {name} is invalid: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}
