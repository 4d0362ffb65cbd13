//! # Memory Management
//!
//! Identifier recycling for entity slots.
//!
//! ## Design Philosophy
//!
//! Ids index directly into storage containers. Reusing freed ids first keeps
//! those containers no larger than the peak live population.

mod pool;

pub use pool::IdentifierPool;
