//! Dense strided N-dimensional array views.
//!
//! A [`StridedView`] is a shared [`Buffer`] plus a shape, a stride per axis and a
//! base offset. Element `idx` lives at buffer index `offset + Σ idx[i] * strides[i]`.
//! Strides may be negative (reversed traversal) or zero (broadcast along an axis).
//!
//! # Core Types
//!
//! - [`Buffer`]: Reference-counted flat storage shared by every view built over it
//! - [`StridedView`]: Dynamic-rank view with checked element access
//! - [`Layout`]: Row-major (default) or column-major stride assignment
//!
//! # Metadata Transformations
//!
//! These operate only on dims/strides/offset and never touch the buffer:
//! - `step`: Stride multiplication and axis reversal
//! - `hi` / `lo`: Trim the tail / head of each axis
//! - `permute` / `t`: Reorder dimensions
//! - `diagonal` / `diagonal_axes`: Fuse axis pairs with the stride trick
//! - `pick`: Fix an axis at one index and drop it
//!
//! # Elementwise Operations
//!
//! - [`map_into`], [`zip_map2_into`]: Unary and binary maps into a destination view
//! - [`assign`], [`assign_scalar`], [`fill_with`]: Writes
//! - [`add_into`], [`sub_into`], [`mul_into`], [`div_into`], [`scale_into`]: Arithmetic
//! - [`sum`], [`equals`]: Reductions
//!
//! # Example
//!
//! ```rust
//! use strided_ndview::{assign, Buffer, StridedView};
//!
//! let c = StridedView::row_major(Buffer::<f64>::iota(56).unwrap(), &[8, 7]).unwrap();
//! let last_five = c.lo(&[Some(3)]).unwrap();
//! assert_eq!(last_five.dims(), &[5, 7]);
//! assert_eq!(last_five.get(&[0, 0]).unwrap(), 21.0);
//!
//! // Copy the diagonal of `c` onto the diagonal of a zeroed 8x7 array.
//! let d = StridedView::row_major(Buffer::<f64>::zeros(56), &[8, 7]).unwrap();
//! assign(&d.diagonal().unwrap(), &c.diagonal().unwrap()).unwrap();
//! assert_eq!(d.get(&[2, 2]).unwrap(), 16.0);
//! assert_eq!(d.get(&[2, 3]).unwrap(), 0.0);
//! ```

mod auxiliary;
mod buffer;
mod fuse;
mod kernel;
pub mod layout;
mod map;
mod ops;
mod order;
mod show;
pub mod view;

// ============================================================================
// Storage and views
// ============================================================================
pub use buffer::Buffer;
pub use layout::{col_major_strides, row_major_strides, total_len, validate, Layout};
pub use view::StridedView;

// ============================================================================
// Elementwise operations
// ============================================================================
pub use kernel::ensure_same_shape;
pub use map::{fill_with, map_into, zip_map2_into};
pub use ops::{
    add_into, assign, assign_scalar, div_into, equals, mul_into, scale_into, sub_into, sum,
};

// ============================================================================
// Error types
// ============================================================================

/// Errors raised when shape, strides and offset do not describe a valid view.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShapeError {
    /// Shape and stride lists have different lengths.
    #[error("stride and dims length mismatch: {dims} dims vs {strides} strides")]
    LengthMismatch { dims: usize, strides: usize },

    /// Some reachable element falls outside the buffer.
    #[error("view addresses outside a buffer of length {len}")]
    OutOfBounds { len: usize },

    /// Operand shapes differ in an elementwise operation.
    #[error("shape mismatch: {left:?} vs {right:?}")]
    Mismatch { left: Vec<usize>, right: Vec<usize> },
}

/// Errors raised by element access.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IndexError {
    /// An index is past the extent of its axis.
    #[error("index {index} out of range for axis {axis} with extent {extent}")]
    OutOfRange {
        axis: usize,
        index: usize,
        extent: usize,
    },

    /// Wrong number of indices for the view's rank.
    #[error("expected {expected} indices, got {got}")]
    RankMismatch { expected: usize, got: usize },
}

/// Errors raised by view transformations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransformError {
    /// A step multiplier of zero was requested.
    #[error("step of 0 for axis {axis}")]
    ZeroStep { axis: usize },

    /// The axis list is not a permutation of `0..rank`.
    #[error("invalid permutation {0:?}")]
    InvalidPermutation(Vec<usize>),

    /// The view has fewer dimensions than the transform needs.
    #[error("transform needs rank >= {required}, view has rank {actual}")]
    InsufficientRank { required: usize, actual: usize },

    /// More per-axis arguments than the view has axes.
    #[error("{given} per-axis arguments for a view of rank {rank}")]
    TooManyAxes { given: usize, rank: usize },

    /// A `hi`/`lo` bound is larger than the current extent.
    #[error("bound {bound} exceeds extent {extent} of axis {axis}")]
    BoundOutOfRange {
        axis: usize,
        bound: usize,
        extent: usize,
    },

    /// Invalid axis index for the given rank.
    #[error("invalid axis {axis} for rank {rank}")]
    InvalidAxis { axis: usize, rank: usize },
}

/// Errors that can occur during strided view operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StridedError {
    #[error(transparent)]
    Shape(#[from] ShapeError),
    #[error(transparent)]
    Index(#[from] IndexError),
    #[error(transparent)]
    Transform(#[from] TransformError),

    /// A generated value does not fit the element type.
    #[error("value {0} is not representable in the element type")]
    Unrepresentable(usize),
}

/// Result type for strided view operations.
pub type Result<T> = std::result::Result<T, StridedError>;
