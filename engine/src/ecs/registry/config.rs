/// Initial capacity of a store created on first use.
pub const DEFAULT_CAPACITY: usize = 32;

/// Registry configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Capacity reserved by a component store created on first use.
    pub default_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// Create the default configuration.
    pub const fn new() -> Self {
        Self {
            default_capacity: DEFAULT_CAPACITY,
        }
    }

    /// Set the capacity reserved by lazily created stores.
    pub const fn with_default_capacity(mut self, capacity: usize) -> Self {
        self.default_capacity = capacity;
        self
    }
}
