//! Heap configuration.

/// Tuning knobs for a [`ScalarHeap`](crate::ScalarHeap).
///
/// # Examples
///
/// ```
/// use scalar_heap::HeapConfig;
///
/// let config = HeapConfig::default().with_hash_seed(7).with_initial_capacity(16);
/// assert_eq!(config.hash_seed, 7);
/// assert_eq!(config.initial_capacity, 16);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeapConfig {
    /// Seed mixed into every content hash
    pub hash_seed: u32,
    /// Number of scalar slots reserved up front
    pub initial_capacity: usize,
}

/// Default content hash seed
const DEFAULT_HASH_SEED: u32 = 0;
/// Default slot reservation
const DEFAULT_INITIAL_CAPACITY: usize = 64;

impl HeapConfig {
    /// Replaces the hash seed.
    pub fn with_hash_seed(mut self, seed: u32) -> Self {
        self.hash_seed = seed;
        self
    }

    /// Replaces the initial slot reservation.
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }
}

impl Default for HeapConfig {
    fn default() -> Self {
        HeapConfig {
            hash_seed: DEFAULT_HASH_SEED,
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
        }
    }
}
