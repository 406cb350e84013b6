//! Search configuration.

/// Default log2 of the coverage map size (64 KiB map).
pub const DEFAULT_MAP_SIZE_BITS: u32 = 16;
/// Default absolute unsolved-count stop threshold.
pub const DEFAULT_DELTA: usize = 10;
/// Default unsolved-fraction stop threshold.
pub const DEFAULT_SIGMA: f64 = 0.001;
/// Default budget on `(x, z)` candidate probes across all rounds.
pub const DEFAULT_PROBE_BUDGET: u64 = 1 << 28;

/// Parameter-search configuration.
#[derive(Clone, Debug)]
pub struct SearchConfig {
    /// log2 of the coverage map size. Shift parameters range over
    /// `[1, map_size_bits)`.
    pub map_size_bits: u32,
    /// Stop searching further rounds once the unsolved count drops below
    /// this.
    pub delta: usize,
    /// Stop searching further rounds once the unsolved fraction drops
    /// below this.
    pub sigma: f64,
    /// Budget on `(x, z)` candidate probes across all rounds. Exhaustion
    /// is not an error; the search keeps the best partition found so far.
    pub probe_budget: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            map_size_bits: DEFAULT_MAP_SIZE_BITS,
            delta: DEFAULT_DELTA,
            sigma: DEFAULT_SIGMA,
            probe_budget: DEFAULT_PROBE_BUDGET,
        }
    }
}

impl SearchConfig {
    /// Create a config for a `1 << map_size_bits` entry map.
    pub fn new(map_size_bits: u32) -> Self {
        assert!(
            (2..=31).contains(&map_size_bits),
            "map_size_bits must be in [2, 31]"
        );
        Self {
            map_size_bits,
            ..Default::default()
        }
    }

    /// Number of slots in the coverage map.
    pub const fn map_size(&self) -> u32 {
        1 << self.map_size_bits
    }

    /// Mask folding a hash into the map index space.
    pub const fn slot_mask(&self) -> u32 {
        self.map_size() - 1
    }

    /// Set the unsolved-count stop threshold.
    pub fn with_delta(mut self, delta: usize) -> Self {
        self.delta = delta;
        self
    }

    /// Set the unsolved-fraction stop threshold.
    pub fn with_sigma(mut self, sigma: f64) -> Self {
        self.sigma = sigma;
        self
    }

    /// Set the probe budget.
    pub fn with_probe_budget(mut self, probe_budget: u64) -> Self {
        self.probe_budget = probe_budget;
        self
    }
}
