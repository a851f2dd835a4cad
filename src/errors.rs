use thiserror::Error;

/// Reduction failure. The tree is left untouched when one of these is returned.
#[derive(Debug, Error, Eq, PartialEq, Clone)]
pub enum ReductionError<T> {
    /// Leaf not found in the tree.
    #[error("leaf {0:?} not found in the tree")]
    LeafNotFound(T),
    /// Leaf named more than once in the same constraint.
    #[error("leaf {0:?} appears more than once in the constraint")]
    DuplicateLeaf(T),
}

/// Construction failure
#[derive(Debug, Error, Eq, PartialEq, Clone)]
pub enum ConstructionError<T> {
    /// Leaf is already present in the tree.
    #[error("leaf {0:?} is already present in the tree")]
    DuplicateLeaf(T),
}
