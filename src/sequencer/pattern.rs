// Pattern - the instrument x step activation grid for one loop cycle
// Pure data; the scheduler reads it, the UI/persistence layer mutates it

/// Steps in one pattern: 16 steps of 4 subdivisions, one bar of 16th notes.
pub const DEFAULT_STEPS_PER_PATTERN: usize = 64;

/// Boolean activation grid, rows indexed by instrument and columns by step.
///
/// Every row has the same length; out-of-range reads are inactive rather
/// than panics so a stale UI index can never take playback down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    rows: Vec<Vec<bool>>,
    steps: usize,
}

impl Pattern {
    /// Create an all-inactive grid.
    pub fn new(instruments: usize, steps: usize) -> Self {
        Self {
            rows: vec![vec![false; steps]; instruments],
            steps,
        }
    }

    /// Rebuild a grid from persisted rows, keeping whatever fits.
    ///
    /// Saved data may come from a session with a different instrument count
    /// or step count; cells outside the current shape are dropped and
    /// missing cells stay inactive, mirroring how a malformed save loads as
    /// an empty grid instead of an error.
    pub fn from_saved(saved: &[Vec<bool>], instruments: usize, steps: usize) -> Self {
        let mut pattern = Self::new(instruments, steps);
        for (row, saved_row) in pattern.rows.iter_mut().zip(saved) {
            for (cell, value) in row.iter_mut().zip(saved_row) {
                *cell = *value;
            }
        }
        pattern
    }

    pub fn instruments(&self) -> usize {
        self.rows.len()
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn get(&self, instrument: usize, step: usize) -> bool {
        self.rows
            .get(instrument)
            .and_then(|row| row.get(step))
            .copied()
            .unwrap_or(false)
    }

    pub fn set(&mut self, instrument: usize, step: usize, active: bool) {
        if let Some(cell) = self
            .rows
            .get_mut(instrument)
            .and_then(|row| row.get_mut(step))
        {
            *cell = active;
        }
    }

    /// Toggle a cell and return its new state.
    pub fn toggle(&mut self, instrument: usize, step: usize) -> bool {
        let next = !self.get(instrument, step);
        self.set(instrument, step, next);
        next
    }

    /// Deactivate every cell.
    pub fn clear(&mut self) {
        for row in &mut self.rows {
            row.fill(false);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(|row| row.iter().all(|c| !c))
    }

    /// Instruments whose cell is active in the given step column, in row
    /// order. This is the scan the scheduler runs once per step.
    pub fn active_in_step(&self, step: usize) -> impl Iterator<Item = usize> + '_ {
        self.rows
            .iter()
            .enumerate()
            .filter(move |(_, row)| row.get(step).copied().unwrap_or(false))
            .map(|(instrument, _)| instrument)
    }

    /// The raw rows, in the persisted `Array<Array<bool>>` shape.
    pub fn rows(&self) -> &[Vec<bool>] {
        &self.rows
    }
}

impl Default for Pattern {
    fn default() -> Self {
        Self::new(3, DEFAULT_STEPS_PER_PATTERN)
    }
}
