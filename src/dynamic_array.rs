//! A growable array with checked indexing.
//!
//! Out-of-range access is reported as [`ArrayError::OutOfBounds`] instead of panicking.

use thiserror::Error;

/// Failure signal of [`DynamicArray`] accessors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ArrayError {
    /// The index is past the end of the array.
    #[error("index {index} is out of bounds for an array of length {length}")]
    OutOfBounds {
        /// The requested index
        index: usize,
        /// The array length at the time of the access
        length: usize,
    },
}

/// Growable array supporting `append`, indexed `get`/`set` and `length`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DynamicArray<T> {
    /// The stored elements
    data: Vec<T>,
}

impl<T> Default for DynamicArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> DynamicArray<T> {
    /// Creates an empty array
    #[must_use]
    pub const fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Creates an array of `length` elements, each produced by `fill`
    pub fn filled(length: usize, fill: impl FnMut() -> T) -> Self {
        let mut data = Vec::with_capacity(length);
        data.resize_with(length, fill);
        Self { data }
    }

    /// Appends `value` to the end of the array
    pub fn append(&mut self, value: T) {
        self.data.push(value);
    }

    /// Returns a reference to the element at `index`
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::OutOfBounds`] if `index >= self.length()`.
    pub fn get(&self, index: usize) -> Result<&T, ArrayError> {
        let length = self.data.len();
        self.data.get(index).ok_or(ArrayError::OutOfBounds { index, length })
    }

    /// Returns a mutable reference to the element at `index`
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::OutOfBounds`] if `index >= self.length()`.
    pub fn get_mut(&mut self, index: usize) -> Result<&mut T, ArrayError> {
        let length = self.data.len();
        self.data.get_mut(index).ok_or(ArrayError::OutOfBounds { index, length })
    }

    /// Stores `value` at `index` and returns the element it replaced
    ///
    /// # Errors
    ///
    /// Returns [`ArrayError::OutOfBounds`] if `index >= self.length()`; `value` is dropped.
    pub fn set(&mut self, index: usize, value: T) -> Result<T, ArrayError> {
        self.get_mut(index).map(|slot| std::mem::replace(slot, value))
    }

    /// Returns the number of elements
    #[must_use]
    pub fn length(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the array holds no elements
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns an iterator over the elements in index order
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// Returns the elements as a slice
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }
}

impl<T> FromIterator<T> for DynamicArray<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self { data: iter.into_iter().collect() }
    }
}

impl<T> IntoIterator for DynamicArray<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a DynamicArray<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_and_get() {
        let mut array = DynamicArray::new();
        assert!(array.is_empty());

        array.append("a");
        array.append("b");

        assert_eq!(array.length(), 2);
        assert_eq!(array.get(0), Ok(&"a"));
        assert_eq!(array.get(1), Ok(&"b"));
    }

    #[test]
    fn test_out_of_bounds() {
        let mut array: DynamicArray<u8> = DynamicArray::filled(3, || 0);

        assert_eq!(array.get(3), Err(ArrayError::OutOfBounds { index: 3, length: 3 }));
        assert_eq!(array.set(7, 1), Err(ArrayError::OutOfBounds { index: 7, length: 3 }));
        assert!(array.get_mut(3).is_err());
        assert_eq!(
            ArrayError::OutOfBounds { index: 3, length: 3 }.to_string(),
            "index 3 is out of bounds for an array of length 3"
        );
    }

    #[test]
    fn test_set_returns_previous() {
        let mut array = DynamicArray::filled(2, || 0);

        assert_eq!(array.set(1, 5), Ok(0));
        assert_eq!(array.set(1, 6), Ok(5));
        assert_eq!(array.as_slice(), &[0, 6]);
    }

    #[test]
    fn test_iteration() {
        let array: DynamicArray<u32> = (1..=4).collect();

        assert_eq!(array.iter().sum::<u32>(), 10);
        assert_eq!((&array).into_iter().count(), 4);
        assert_eq!(array.into_iter().collect::<Vec<_>>(), vec![1, 2, 3, 4]);
    }
}
