//! Shared flat storage.

use std::cell::Cell;
use std::rc::Rc;

use num_traits::{FromPrimitive, Zero};

use crate::{IndexError, Result, StridedError};

/// Fixed-length, reference-counted storage backing one or more views.
///
/// Cloning a `Buffer` clones the handle, not the elements: both handles see the
/// same cells, and writes through either are visible through the other. The
/// storage lives as long as its longest holder.
pub struct Buffer<T> {
    cells: Rc<[Cell<T>]>,
}

impl<T> Clone for Buffer<T> {
    fn clone(&self) -> Self {
        Self {
            cells: Rc::clone(&self.cells),
        }
    }
}

impl<T: Copy + std::fmt::Debug> std::fmt::Debug for Buffer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.cells.iter().map(Cell::get))
            .finish()
    }
}

impl<T> Buffer<T> {
    /// Take ownership of `data` as shared storage.
    pub fn from_vec(data: Vec<T>) -> Self {
        Self {
            cells: data.into_iter().map(Cell::new).collect(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// True if both handles refer to the same storage.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.cells, &other.cells)
    }

    #[inline]
    pub(crate) fn cells(&self) -> &[Cell<T>] {
        &self.cells
    }
}

impl<T: Copy> Buffer<T> {
    /// Buffer of `len` copies of `value`.
    pub fn filled(len: usize, value: T) -> Self {
        Self {
            cells: (0..len).map(|_| Cell::new(value)).collect(),
        }
    }

    /// Element at flat index `i`, or `None` past the end.
    #[inline]
    pub fn get(&self, i: usize) -> Option<T> {
        self.cells.get(i).map(Cell::get)
    }

    /// Overwrite flat index `i`.
    #[inline]
    pub fn set(&self, i: usize, value: T) -> std::result::Result<(), IndexError> {
        let cell = self.cells.get(i).ok_or(IndexError::OutOfRange {
            axis: 0,
            index: i,
            extent: self.cells.len(),
        })?;
        cell.set(value);
        Ok(())
    }

    /// Copy the storage out in flat order.
    pub fn to_vec(&self) -> Vec<T> {
        self.cells.iter().map(Cell::get).collect()
    }
}

impl<T: Copy + Zero> Buffer<T> {
    /// Zero-initialized buffer.
    pub fn zeros(len: usize) -> Self {
        Self::filled(len, T::zero())
    }
}

impl<T: Copy + FromPrimitive> Buffer<T> {
    /// Buffer holding `0, 1, ..., len - 1`.
    ///
    /// Fails with [`StridedError::Unrepresentable`] at the first value `T`
    /// cannot hold exactly.
    pub fn iota(len: usize) -> Result<Self> {
        let cells = (0..len)
            .map(|i| {
                T::from_usize(i)
                    .map(Cell::new)
                    .ok_or(StridedError::Unrepresentable(i))
            })
            .collect::<Result<Rc<[Cell<T>]>>>()?;
        Ok(Self { cells })
    }
}

impl<T> From<Vec<T>> for Buffer<T> {
    fn from(data: Vec<T>) -> Self {
        Self::from_vec(data)
    }
}
