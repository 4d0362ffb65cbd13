//! # Identifier Pool
//!
//! Hands out small integer ids and recycles released ones.

use crate::collections::Bag;

/// LIFO free list of integer identifiers.
///
/// Released ids are reissued most-recently-freed first, so the live id range
/// stays packed near its high-water mark. Memory is bounded by the peak
/// number of ids out at once, not by the number ever issued.
///
/// # Thread Safety
///
/// This pool is NOT thread-safe. Use one pool per world.
///
/// # Example
///
/// ```rust
/// use kestrel_core::memory::IdentifierPool;
///
/// let mut pool = IdentifierPool::new();
/// let a = pool.check_out();
/// let b = pool.check_out();
/// pool.check_in(a);
/// assert_eq!(pool.check_out(), a);
/// assert_eq!(pool.check_out(), b + 1);
/// ```
#[derive(Clone, Debug, Default)]
pub struct IdentifierPool {
    /// Released ids awaiting reuse.
    ids: Bag<u32>,
    /// Next never-issued id.
    next_available_id: u32,
}

impl IdentifierPool {
    /// Creates an empty pool. The first id issued is 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes an id: the most recently released one, else a fresh one.
    ///
    /// This is a **O(1)** operation.
    pub fn check_out(&mut self) -> u32 {
        if let Some(id) = self.ids.remove_last() {
            tracing::trace!("Recycled entity id {}", id);
            return id;
        }
        let id = self.next_available_id;
        self.next_available_id += 1;
        id
    }

    /// Returns `id` to the pool for reuse.
    ///
    /// The caller must not check in an id that is still in use.
    pub fn check_in(&mut self, id: u32) {
        self.ids.add(id);
    }

    /// Number of released ids waiting to be reissued.
    #[inline]
    #[must_use]
    pub const fn available(&self) -> usize {
        self.ids.size()
    }

    /// Number of distinct ids ever issued.
    #[inline]
    #[must_use]
    pub const fn high_water_mark(&self) -> u32 {
        self.next_available_id
    }
}
