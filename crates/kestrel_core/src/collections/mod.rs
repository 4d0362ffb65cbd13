//! # Collections
//!
//! Low-level containers shared by the entity and component layers.
//!
//! ## Design Philosophy
//!
//! - Index-addressed storage with O(1) amortized access
//! - Order is never promised; removal swaps in the last element
//! - Capacity only grows for the lifetime of a container

mod bag;
mod bits;

pub use bag::{Bag, Identity, DEFAULT_CAPACITY};
pub use bits::{BitSet, Ones};
