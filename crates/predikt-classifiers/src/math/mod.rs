//! Dense row-major feature matrix used as model input.
//!
//! Kept dependency-free: the service only ever builds single-row matrices,
//! and the tree models read rows as plain slices.
pub mod matrix;

pub use matrix::{Array2, ShapeError};
