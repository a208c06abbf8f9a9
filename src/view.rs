//! Dynamic-rank strided views over shared storage.
//!
//! A [`StridedView`] is an immutable descriptor: every transformation returns a
//! new view over the same [`Buffer`] and leaves `self` untouched. Element writes
//! go through `&self` and are visible to every view sharing the buffer.

use std::rc::Rc;

use crate::buffer::Buffer;
use crate::layout::{row_major_strides, total_len, validate, Layout};
use crate::{IndexError, Result, ShapeError, StridedError, TransformError};

// ============================================================================
// StridedView
// ============================================================================

/// Dynamic-rank strided view.
///
/// Element `idx` is stored at `offset + Σ idx[i] * strides[i]` in the buffer.
pub struct StridedView<T> {
    buffer: Buffer<T>,
    dims: Rc<[usize]>,
    strides: Rc<[isize]>,
    offset: isize,
}

impl<T> Clone for StridedView<T> {
    fn clone(&self) -> Self {
        Self {
            buffer: self.buffer.clone(),
            dims: self.dims.clone(),
            strides: self.strides.clone(),
            offset: self.offset,
        }
    }
}

impl<T> std::fmt::Debug for StridedView<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StridedView")
            .field("dims", &self.dims)
            .field("strides", &self.strides)
            .field("offset", &self.offset)
            .field("buffer_len", &self.buffer.len())
            .finish()
    }
}

impl<T> StridedView<T> {
    /// Create a view with explicit strides and offset.
    ///
    /// Fails if the lengths of `dims` and `strides` differ or if any reachable
    /// element falls outside `buffer`.
    pub fn new(buffer: Buffer<T>, dims: &[usize], strides: &[isize], offset: isize) -> Result<Self> {
        validate(dims, strides, offset, buffer.len())?;
        Ok(Self::from_parts(buffer, dims, strides, offset))
    }

    /// Create a row-major view starting at buffer index 0.
    pub fn row_major(buffer: Buffer<T>, dims: &[usize]) -> Result<Self> {
        Self::with_layout(buffer, dims, Layout::RowMajor)
    }

    /// Create a view starting at buffer index 0 with the given layout.
    pub fn with_layout(buffer: Buffer<T>, dims: &[usize], layout: Layout) -> Result<Self> {
        let strides = layout.strides(dims);
        Self::new(buffer, dims, &strides, 0)
    }

    /// Take ownership of `data` and view it row-major as `dims`.
    pub fn from_vec(data: Vec<T>, dims: &[usize]) -> Result<Self> {
        Self::row_major(Buffer::from_vec(data), dims)
    }

    /// Build a view without validation. Callers guarantee the bounds invariant.
    fn from_parts(buffer: Buffer<T>, dims: &[usize], strides: &[isize], offset: isize) -> Self {
        Self {
            buffer,
            dims: Rc::from(dims),
            strides: Rc::from(strides),
            offset,
        }
    }

    /// Derived view sharing this view's buffer.
    fn derive(&self, dims: &[usize], strides: &[isize], offset: isize) -> Self {
        Self::from_parts(self.buffer.clone(), dims, strides, offset)
    }

    #[inline]
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Extent of `axis`, or `None` past the rank.
    #[inline]
    pub fn dim(&self, axis: usize) -> Option<usize> {
        self.dims.get(axis).copied()
    }

    #[inline]
    pub fn strides(&self) -> &[isize] {
        &self.strides
    }

    #[inline]
    pub fn offset(&self) -> isize {
        self.offset
    }

    #[inline]
    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    /// Number of elements (product of extents).
    #[inline]
    pub fn len(&self) -> usize {
        total_len(&self.dims)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.dims.iter().any(|&d| d == 0)
    }

    #[inline]
    pub fn buffer(&self) -> &Buffer<T> {
        &self.buffer
    }

    /// True if the strides are the row-major strides of the dims.
    pub fn is_contiguous(&self) -> bool {
        *self.strides == *row_major_strides(&self.dims)
    }

    /// Buffer index of `indices`, checking rank and per-axis bounds.
    pub fn index_of(&self, indices: &[usize]) -> Result<usize> {
        if indices.len() != self.dims.len() {
            return Err(IndexError::RankMismatch {
                expected: self.dims.len(),
                got: indices.len(),
            }
            .into());
        }
        let mut idx = self.offset;
        for (axis, (&index, &extent)) in indices.iter().zip(self.dims.iter()).enumerate() {
            if index >= extent {
                return Err(IndexError::OutOfRange {
                    axis,
                    index,
                    extent,
                }
                .into());
            }
            idx += index as isize * self.strides[axis];
        }
        // In range by the construction invariant.
        Ok(idx as usize)
    }

    fn overflow(&self) -> StridedError {
        ShapeError::OutOfBounds {
            len: self.buffer.len(),
        }
        .into()
    }

    fn check_axis_args(&self, given: usize) -> Result<()> {
        if given > self.dims.len() {
            return Err(TransformError::TooManyAxes {
                given,
                rank: self.dims.len(),
            }
            .into());
        }
        Ok(())
    }

    // ========================================================================
    // Metadata transformations
    // ========================================================================

    /// Multiply the stride of each axis by its step.
    ///
    /// A negative step reverses the axis. A step of magnitude `k` keeps every
    /// `k`-th element, so the extent becomes `ceil(extent / k)`. `None` and
    /// missing trailing entries leave the axis unchanged.
    pub fn step(&self, steps: &[Option<isize>]) -> Result<Self> {
        self.check_axis_args(steps.len())?;
        let mut dims = self.dims.to_vec();
        let mut strides = self.strides.to_vec();
        let mut offset = self.offset;

        for (axis, &step) in steps.iter().enumerate() {
            let Some(step) = step else { continue };
            if step == 0 {
                return Err(TransformError::ZeroStep { axis }.into());
            }
            let extent = dims[axis];
            if step < 0 && extent > 0 {
                offset = isize::try_from(extent - 1)
                    .ok()
                    .and_then(|last| last.checked_mul(strides[axis]))
                    .and_then(|shift| offset.checked_add(shift))
                    .ok_or_else(|| self.overflow())?;
            }
            let k = step.unsigned_abs();
            dims[axis] = extent / k + usize::from(extent % k != 0);
            strides[axis] = strides[axis]
                .checked_mul(step)
                .ok_or_else(|| self.overflow())?;
        }

        Ok(self.derive(&dims, &strides, offset))
    }

    /// Keep the first `b` elements of each axis given a bound.
    pub fn hi(&self, bounds: &[Option<usize>]) -> Result<Self> {
        self.check_axis_args(bounds.len())?;
        let mut dims = self.dims.to_vec();

        for (axis, &bound) in bounds.iter().enumerate() {
            let Some(bound) = bound else { continue };
            if bound > dims[axis] {
                return Err(TransformError::BoundOutOfRange {
                    axis,
                    bound,
                    extent: dims[axis],
                }
                .into());
            }
            dims[axis] = bound;
        }

        Ok(self.derive(&dims, &self.strides, self.offset))
    }

    /// Skip the first `b` elements of each axis given a bound.
    pub fn lo(&self, bounds: &[Option<usize>]) -> Result<Self> {
        self.check_axis_args(bounds.len())?;
        let mut dims = self.dims.to_vec();
        let mut offset = self.offset;

        for (axis, &bound) in bounds.iter().enumerate() {
            let Some(bound) = bound else { continue };
            if bound > dims[axis] {
                return Err(TransformError::BoundOutOfRange {
                    axis,
                    bound,
                    extent: dims[axis],
                }
                .into());
            }
            offset = (bound as isize)
                .checked_mul(self.strides[axis])
                .and_then(|shift| offset.checked_add(shift))
                .ok_or_else(|| self.overflow())?;
            dims[axis] -= bound;
        }

        Ok(self.derive(&dims, &self.strides, offset))
    }

    /// Permute dimensions: axis `i` of the result is axis `perm[i]` of `self`.
    pub fn permute(&self, perm: &[usize]) -> Result<Self> {
        let rank = self.dims.len();
        let invalid = || TransformError::InvalidPermutation(perm.to_vec());
        if perm.len() != rank {
            return Err(invalid().into());
        }
        let mut seen = vec![false; rank];
        for &p in perm {
            if p >= rank || seen[p] {
                return Err(invalid().into());
            }
            seen[p] = true;
        }
        let new_dims: Vec<usize> = perm.iter().map(|&p| self.dims[p]).collect();
        let new_strides: Vec<isize> = perm.iter().map(|&p| self.strides[p]).collect();
        Ok(self.derive(&new_dims, &new_strides, self.offset))
    }

    /// Reverse all axes (the default transpose).
    pub fn t(&self) -> Self {
        let new_dims: Vec<usize> = self.dims.iter().rev().copied().collect();
        let new_strides: Vec<isize> = self.strides.iter().rev().copied().collect();
        self.derive(&new_dims, &new_strides, self.offset)
    }

    /// Diagonal over the first two axes.
    ///
    /// `A[i, i, rest..]` with extent `min(dims[0], dims[1])` and stride
    /// `strides[0] + strides[1]`; the remaining axes pass through.
    pub fn diagonal(&self) -> Result<Self> {
        if self.ndim() < 2 {
            return Err(TransformError::InsufficientRank {
                required: 2,
                actual: self.ndim(),
            }
            .into());
        }
        self.diagonal_axes(&[(0, 1)])
    }

    /// Create a diagonal view by fusing repeated axis pairs via stride trick (zero-copy).
    ///
    /// For each pair `(a, b)`:
    /// - New stride = `strides[a] + strides[b]`
    /// - New dim = `min(dims[a], dims[b])`
    /// - The higher-numbered axis is removed
    /// - Pairs use **original** axis numbering
    ///
    /// # Example
    /// `A[i,i,j]` shape=`[n,n,m]` strides=`[s0,s1,s2]` -> shape=`[n,m]` strides=`[s0+s1, s2]`
    pub fn diagonal_axes(&self, axis_pairs: &[(usize, usize)]) -> Result<Self> {
        let ndim = self.ndim();
        let mut dims: Vec<usize> = self.dims.to_vec();
        let mut strides: Vec<isize> = self.strides.to_vec();
        let mut removed = vec![false; ndim];

        for &(a, b) in axis_pairs {
            let (lo, hi) = if a < b { (a, b) } else { (b, a) };
            if hi >= ndim {
                return Err(TransformError::InvalidAxis {
                    axis: hi,
                    rank: ndim,
                }
                .into());
            }
            if lo == hi || removed[lo] || removed[hi] {
                return Err(TransformError::InvalidAxis {
                    axis: if removed[lo] { lo } else { hi },
                    rank: ndim,
                }
                .into());
            }
            strides[lo] = strides[lo]
                .checked_add(strides[hi])
                .ok_or_else(|| self.overflow())?;
            dims[lo] = dims[lo].min(dims[hi]);
            removed[hi] = true;
        }

        let (dims, strides): (Vec<usize>, Vec<isize>) = dims
            .into_iter()
            .zip(strides)
            .zip(&removed)
            .filter(|&(_, &gone)| !gone)
            .map(|(pair, _)| pair)
            .unzip();

        Ok(self.derive(&dims, &strides, self.offset))
    }

    /// Fix each axis given an index and drop it from the view.
    pub fn pick(&self, indices: &[Option<usize>]) -> Result<Self> {
        self.check_axis_args(indices.len())?;
        let mut offset = self.offset;
        let mut dims = Vec::with_capacity(self.ndim());
        let mut strides = Vec::with_capacity(self.ndim());

        for axis in 0..self.ndim() {
            match indices.get(axis).copied().flatten() {
                Some(index) => {
                    let extent = self.dims[axis];
                    if index >= extent {
                        return Err(IndexError::OutOfRange {
                            axis,
                            index,
                            extent,
                        }
                        .into());
                    }
                    offset += index as isize * self.strides[axis];
                }
                None => {
                    dims.push(self.dims[axis]);
                    strides.push(self.strides[axis]);
                }
            }
        }

        Ok(self.derive(&dims, &strides, offset))
    }
}

impl<T: Copy> StridedView<T> {
    /// Get an element.
    pub fn get(&self, indices: &[usize]) -> Result<T> {
        let i = self.index_of(indices)?;
        Ok(self.buffer.cells()[i].get())
    }

    /// Set an element. The write is visible through every view of the buffer.
    pub fn set(&self, indices: &[usize], value: T) -> Result<()> {
        let i = self.index_of(indices)?;
        self.buffer.cells()[i].set(value);
        Ok(())
    }

    /// Iterate over elements in row-major logical order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            view: self,
            index: vec![0; self.ndim()],
            pos: self.offset,
            remaining: self.len(),
        }
    }

    /// Copy the elements out in row-major logical order.
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().collect()
    }
}

// ============================================================================
// Iter
// ============================================================================

/// Row-major element iterator over a [`StridedView`].
pub struct Iter<'v, T> {
    view: &'v StridedView<T>,
    index: Vec<usize>,
    pos: isize,
    remaining: usize,
}

impl<T: Copy> Iterator for Iter<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.remaining == 0 {
            return None;
        }
        let value = self.view.buffer.cells()[self.pos as usize].get();
        self.remaining -= 1;
        if self.remaining > 0 {
            let dims = self.view.dims();
            let strides = self.view.strides();
            for d in (0..dims.len()).rev() {
                self.index[d] += 1;
                self.pos += strides[d];
                if self.index[d] < dims[d] {
                    break;
                }
                self.pos -= strides[d] * dims[d] as isize;
                self.index[d] = 0;
            }
        }
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T: Copy> ExactSizeIterator for Iter<'_, T> {}

// ============================================================================
// Tests
// ============================================================================
