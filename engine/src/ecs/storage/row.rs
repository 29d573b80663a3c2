/// A dense slot in a component store. Indexes the packed component and entity vecs.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Row(usize);

impl From<usize> for Row {
    /// Get a row From a usize index.
    fn from(value: usize) -> Self {
        Self::new(value)
    }
}

impl Row {
    /// Construct a new row from an index.
    #[inline]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Get the index used in the storage vecs.
    #[inline]
    pub fn index(&self) -> usize {
        self.0
    }
}
