//! Shape and stride arithmetic.

use crate::ShapeError;

/// Stride assignment for freshly allocated views.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Layout {
    /// Last index varies fastest (C order).
    #[default]
    RowMajor,
    /// First index varies fastest (Fortran/Julia order).
    ColMajor,
}

impl Layout {
    /// Strides for `dims` under this layout.
    pub fn strides(self, dims: &[usize]) -> Vec<isize> {
        match self {
            Layout::RowMajor => row_major_strides(dims),
            Layout::ColMajor => col_major_strides(dims),
        }
    }
}

/// Compute row-major strides (C default: last index varies fastest).
pub fn row_major_strides(dims: &[usize]) -> Vec<isize> {
    let rank = dims.len();
    if rank == 0 {
        return vec![];
    }
    let mut strides = vec![1isize; rank];
    for i in (0..rank - 1).rev() {
        strides[i] = strides[i + 1].saturating_mul(dim_as_isize(dims[i + 1]));
    }
    strides
}

/// Compute column-major strides (first index varies fastest).
pub fn col_major_strides(dims: &[usize]) -> Vec<isize> {
    let rank = dims.len();
    if rank == 0 {
        return vec![];
    }
    let mut strides = vec![1isize; rank];
    for i in 1..rank {
        strides[i] = strides[i - 1].saturating_mul(dim_as_isize(dims[i - 1]));
    }
    strides
}

fn dim_as_isize(dim: usize) -> isize {
    isize::try_from(dim).unwrap_or(isize::MAX)
}

/// Number of elements addressed by `dims`. Rank 0 has one element.
///
/// Callers pass the dims of a validated view, whose element count fits in `isize`.
#[inline]
pub fn total_len(dims: &[usize]) -> usize {
    dims.iter().product()
}

/// Validate that all reachable offsets stay within `[0, len)` and that the
/// element count fits in `isize`.
pub fn validate(
    dims: &[usize],
    strides: &[isize],
    offset: isize,
    len: usize,
) -> Result<(), ShapeError> {
    if dims.len() != strides.len() {
        return Err(ShapeError::LengthMismatch {
            dims: dims.len(),
            strides: strides.len(),
        });
    }
    let out_of_bounds = ShapeError::OutOfBounds { len };
    let count = dims
        .iter()
        .try_fold(1usize, |acc, &d| acc.checked_mul(d))
        .filter(|&n| isize::try_from(n).is_ok());
    if count.is_none() {
        return Err(out_of_bounds);
    }
    // Empty view - no access needed
    if dims.iter().any(|&d| d == 0) {
        return Ok(());
    }
    let mut min_offset = offset;
    let mut max_offset = offset;
    for (&dim, &stride) in dims.iter().zip(strides.iter()) {
        if dim > 1 {
            let end = isize::try_from(dim - 1)
                .ok()
                .and_then(|d| stride.checked_mul(d))
                .ok_or_else(|| out_of_bounds.clone())?;
            if end >= 0 {
                max_offset = max_offset
                    .checked_add(end)
                    .ok_or_else(|| out_of_bounds.clone())?;
            } else {
                min_offset = min_offset
                    .checked_add(end)
                    .ok_or_else(|| out_of_bounds.clone())?;
            }
        }
    }
    if min_offset < 0 || max_offset < 0 || max_offset as usize >= len {
        return Err(out_of_bounds);
    }
    Ok(())
}
