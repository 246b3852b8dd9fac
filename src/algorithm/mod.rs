/// Fixed-size bitset used for cell domains and rule sets
pub mod bitset;
/// Top-level collapse/propagate driver
pub mod executor;
/// Constraint propagation with visited-once and fixpoint traversals
pub mod propagation;
/// Adjacency rules learned from a sample layout
pub mod rules;
/// Cell collapse and seeded random selection
pub mod selection;
