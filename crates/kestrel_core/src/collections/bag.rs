//! # Bag
//!
//! A growable, index-addressable container that does not preserve order.
//!
//! The bag behaves like a sparse high-water-mark array:
//! - `set(i, v)` grows the backing storage on demand and moves `size` to `i + 1`
//! - removal moves the last live element into the vacated slot (O(1), unordered)
//! - the backing storage only ever grows until the bag is dropped
//!
//! Lookups come in two flavours. [`Bag::get`] indexes straight into the
//! backing storage and panics past its capacity, while [`Bag::get_safe`]
//! returns `None` instead.

use std::rc::Rc;
use std::sync::Arc;

use crate::error::{EcsError, EcsResult};

/// Initial capacity of a bag created with [`Bag::new`].
pub const DEFAULT_CAPACITY: usize = 64;

/// Identity comparison for values stored in a [`Bag`].
///
/// Membership tests and removal by value compare identity, not equality:
/// two distinct allocations with equal contents are different elements.
/// Plain integer handles are their own identity.
pub trait Identity {
    /// Returns `true` if `self` and `other` are the same instance.
    fn is_same(&self, other: &Self) -> bool;
}

impl<T: ?Sized> Identity for Rc<T> {
    #[inline]
    fn is_same(&self, other: &Self) -> bool {
        Rc::ptr_eq(self, other)
    }
}

impl<T: ?Sized> Identity for Arc<T> {
    #[inline]
    fn is_same(&self, other: &Self) -> bool {
        Arc::ptr_eq(self, other)
    }
}

impl<T: ?Sized> Identity for &T {
    #[inline]
    fn is_same(&self, other: &Self) -> bool {
        std::ptr::eq(*self, *other)
    }
}

macro_rules! value_identity {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Identity for $ty {
                #[inline]
                fn is_same(&self, other: &Self) -> bool {
                    self == other
                }
            }
        )*
    };
}

value_identity!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

/// Unordered, auto-growing indexed container.
///
/// # Example
///
/// ```rust
/// use kestrel_core::collections::Bag;
///
/// let mut bag: Bag<u32> = Bag::new();
/// bag.add(7);
/// bag.set(10, 3);
/// assert_eq!(bag.size(), 11);
/// assert_eq!(bag.get(10), Some(&3));
/// assert_eq!(bag.get(5), None);
/// ```
#[derive(Clone, Debug)]
pub struct Bag<T> {
    /// Backing slots. The length of this vector is the capacity.
    data: Vec<Option<T>>,
    /// High-water mark: one past the last slot written by `set`/`add`.
    size: usize,
}

impl<T> Bag<T> {
    /// Creates an empty bag with [`DEFAULT_CAPACITY`] slots.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates an empty bag with the specified number of slots.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let mut data = Vec::with_capacity(capacity);
        data.resize_with(capacity, || None);
        Self { data, size: 0 }
    }

    /// Returns the element at `index`, or `None` if the slot is vacant.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not below [`Bag::capacity`].
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.data[index].as_ref()
    }

    /// Mutable variant of [`Bag::get`].
    ///
    /// # Panics
    ///
    /// Panics if `index` is not below [`Bag::capacity`].
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.data[index].as_mut()
    }

    /// Returns the element at `index`, or `None` if the slot is vacant or
    /// lies past the backing storage.
    #[inline]
    #[must_use]
    pub fn get_safe(&self, index: usize) -> Option<&T> {
        self.data.get(index).and_then(Option::as_ref)
    }

    /// Mutable variant of [`Bag::get_safe`].
    #[inline]
    pub fn get_safe_mut(&mut self, index: usize) -> Option<&mut T> {
        self.data.get_mut(index).and_then(Option::as_mut)
    }

    /// Stores `value` at `index`, growing if needed, and sets `size` to `index + 1`.
    ///
    /// `size` follows the last write even when it moves backwards.
    pub fn set(&mut self, index: usize, value: T) {
        if index >= self.data.len() {
            self.grow(index.saturating_mul(2));
        }
        self.size = index + 1;
        self.data[index] = Some(value);
    }

    /// Returns the element at `index`, storing `f()` there first if the slot is vacant.
    ///
    /// Filling a vacant slot moves `size` exactly like [`Bag::set`].
    pub fn get_or_insert_with<F: FnOnce() -> T>(&mut self, index: usize, f: F) -> &mut T {
        if index >= self.data.len() {
            self.grow(index.saturating_mul(2));
        }
        if self.data[index].is_none() {
            self.size = index + 1;
        }
        self.data[index].get_or_insert_with(f)
    }

    /// Vacates the slot at `index` and returns what it held. `size` is untouched.
    ///
    /// Indices past the backing storage are treated as already vacant.
    pub fn take(&mut self, index: usize) -> Option<T> {
        self.data.get_mut(index).and_then(Option::take)
    }

    /// Appends `value` at `size`, growing if the bag is full.
    pub fn add(&mut self, value: T) {
        if self.size == self.data.len() {
            self.grow(self.size + 1);
        }
        self.data[self.size] = Some(value);
        self.size += 1;
    }

    /// Removes and returns the last element, or `None` if the bag is empty.
    ///
    /// A vacant last slot still shrinks the bag by one and yields `None`.
    pub fn remove_last(&mut self) -> Option<T> {
        if self.size == 0 {
            return None;
        }
        self.size -= 1;
        self.data[self.size].take()
    }

    /// Removes the element at `index` by overwriting it with the last element.
    ///
    /// Order is not preserved.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not below [`Bag::size`].
    pub fn remove(&mut self, index: usize) -> Option<T> {
        assert!(
            index < self.size,
            "index {index} out of range for bag of size {}",
            self.size
        );
        self.swap_remove(index)
    }

    /// Checked variant of [`Bag::remove`].
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::IndexOutOfRange`] if `index` is not below [`Bag::size`].
    pub fn try_remove(&mut self, index: usize) -> EcsResult<Option<T>> {
        if index >= self.size {
            return Err(EcsError::IndexOutOfRange {
                index,
                size: self.size,
            });
        }
        Ok(self.swap_remove(index))
    }

    /// Number of slots up to the high-water mark.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Returns `true` if the bag holds no slots below its high-water mark.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Number of slots the bag can address without growing.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the backing storage has a slot at `index`.
    ///
    /// This says nothing about whether the slot is occupied.
    #[inline]
    #[must_use]
    pub fn is_index_within_bounds(&self, index: usize) -> bool {
        index < self.data.len()
    }

    /// Grows the backing storage so that `index` is addressable. `size` is untouched.
    pub fn ensure_capacity(&mut self, index: usize) {
        if index >= self.data.len() {
            self.grow(index + 1);
        }
    }

    /// Vacates every slot below `size` and resets `size` to zero.
    ///
    /// Capacity is retained.
    pub fn clear(&mut self) {
        for slot in &mut self.data[..self.size] {
            *slot = None;
        }
        self.size = 0;
    }

    /// Iterates over the occupied slots below `size`.
    ///
    /// Because [`Bag::set`] may move `size` backwards, slots written at higher
    /// indices earlier are not visited. Use [`Bag::iter_slots`] to walk every
    /// occupied slot.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.data[..self.size].iter().filter_map(Option::as_ref)
    }

    /// Iterates over every occupied slot of the backing storage, with its index.
    pub fn iter_slots(&self) -> impl Iterator<Item = (usize, &T)> {
        self.data
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|value| (index, value)))
    }

    /// Iterates mutably over the occupied slots below `size`.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.data[..self.size].iter_mut().filter_map(Option::as_mut)
    }

    fn swap_remove(&mut self, index: usize) -> Option<T> {
        self.size -= 1;
        self.data.swap(index, self.size);
        self.data[self.size].take()
    }

    fn grow(&mut self, requested: usize) {
        let capacity = self.data.len();
        let new_capacity = requested.max(capacity * 3 / 2 + 1);
        self.data.resize_with(new_capacity, || None);
    }
}

impl<T: Identity> Bag<T> {
    /// Returns `true` if the very instance `value` is stored below `size`.
    #[must_use]
    pub fn contains(&self, value: &T) -> bool {
        self.position_of(value).is_some()
    }

    /// Removes the first slot holding the instance `value`, moving the last
    /// element into its place.
    ///
    /// Returns `true` if the instance was found.
    pub fn remove_item(&mut self, value: &T) -> bool {
        match self.position_of(value) {
            Some(index) => {
                self.swap_remove(index);
                true
            }
            None => false,
        }
    }

    /// Removes every instance of `other` found in this bag.
    ///
    /// Returns `true` if this bag changed. A bag cannot be passed to its own
    /// `remove_all`:
    ///
    /// ```compile_fail
    /// use kestrel_core::collections::Bag;
    ///
    /// let mut bag: Bag<u32> = Bag::new();
    /// bag.add(1);
    /// bag.remove_all(&bag);
    /// ```
    pub fn remove_all(&mut self, other: &Bag<T>) -> bool {
        let mut modified = false;
        for value in other.iter() {
            modified |= self.remove_item(value);
        }
        modified
    }

    fn position_of(&self, value: &T) -> Option<usize> {
        self.data[..self.size]
            .iter()
            .position(|slot| slot.as_ref().is_some_and(|held| held.is_same(value)))
    }
}

impl<T: Clone> Bag<T> {
    /// Appends every slot of `other` below its size, vacant slots included.
    ///
    /// A bag cannot be passed to its own `add_all`:
    ///
    /// ```compile_fail
    /// use kestrel_core::collections::Bag;
    ///
    /// let mut bag: Bag<u32> = Bag::new();
    /// bag.add(1);
    /// bag.add_all(&bag);
    /// ```
    pub fn add_all(&mut self, other: &Bag<T>) {
        let required = self.size + other.size;
        if required > self.data.len() {
            self.grow(required);
        }
        for slot in &other.data[..other.size] {
            self.data[self.size] = slot.clone();
            self.size += 1;
        }
    }
}

impl<T> Default for Bag<T> {
    fn default() -> Self {
        Self::new()
    }
}
