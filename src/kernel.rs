//! Kernel iteration engine for multi-operand strided walks.
//!
//! A walk is planned once per call: axes are ordered innermost first by stride
//! importance, contiguous runs are fused, and extent-1 axes are dropped. The
//! walk then hands each innermost run to a callback together with the running
//! buffer offset of every operand.

use crate::fuse::{compress_dims, fuse_dims};
use crate::{order, ShapeError};

/// Require two operand shapes to be identical.
pub fn ensure_same_shape(a: &[usize], b: &[usize]) -> Result<(), ShapeError> {
    if a != b {
        return Err(ShapeError::Mismatch {
            left: a.to_vec(),
            right: b.to_vec(),
        });
    }
    Ok(())
}

/// Planned loop nest. `dims[0]` is the innermost loop; `strides[k]` belongs to operand `k`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct KernelPlan {
    pub(crate) dims: Vec<usize>,
    pub(crate) strides: Vec<Vec<isize>>,
}

/// Build an execution plan with dimension fusion.
///
/// Pipeline: order → reorder → fuse → compress.
///
/// Ordering first ensures that dimensions are sorted by stride importance
/// (smallest stride innermost). Fusing *after* ordering catches contiguous
/// dimensions regardless of the original memory layout.
pub(crate) fn build_plan(
    dims: &[usize],
    strides_list: &[&[isize]],
    dest_index: Option<usize>,
) -> KernelPlan {
    let order = order::compute_order(dims, strides_list, dest_index);

    let ordered_dims: Vec<usize> = order.iter().map(|&d| dims[d]).collect();
    let ordered_strides: Vec<Vec<isize>> = strides_list
        .iter()
        .map(|strides| order.iter().map(|&d| strides[d]).collect())
        .collect();
    let ordered_strides_refs: Vec<&[isize]> =
        ordered_strides.iter().map(|s| s.as_slice()).collect();

    let fused_dims = fuse_dims(&ordered_dims, &ordered_strides_refs);
    let (dims, strides) = compress_dims(&fused_dims, &ordered_strides);

    log::trace!(
        "kernel plan: dims {:?} order {:?} -> fused {:?}",
        ordered_dims,
        order,
        dims
    );

    KernelPlan { dims, strides }
}

/// Walk every innermost run of `plan`.
///
/// The callback receives the buffer offset of each operand at the start of the
/// run, the run length, and each operand's innermost stride. Nothing is visited
/// when any extent is zero; a rank-0 plan yields a single run of length 1.
pub(crate) fn for_each_inner_run<F>(plan: &KernelPlan, base_offsets: &[isize], mut f: F)
where
    F: FnMut(&[isize], usize, &[isize]),
{
    let dims = &plan.dims;
    let strides = &plan.strides;
    let rank = dims.len();

    if dims.iter().any(|&d| d == 0) {
        return;
    }
    if rank == 0 {
        let inner = vec![0isize; base_offsets.len()];
        f(base_offsets, 1, &inner);
        return;
    }

    let inner_len = dims[0];
    let inner: Vec<isize> = strides.iter().map(|s| s[0]).collect();
    let mut offsets = base_offsets.to_vec();
    let mut index = vec![0usize; rank];

    loop {
        f(&offsets, inner_len, &inner);

        // Advance the odometer over the outer axes.
        let mut d = 1;
        loop {
            if d == rank {
                return;
            }
            index[d] += 1;
            for (offset, s) in offsets.iter_mut().zip(strides.iter()) {
                *offset += s[d];
            }
            if index[d] < dims[d] {
                break;
            }
            for (offset, s) in offsets.iter_mut().zip(strides.iter()) {
                *offset -= s[d] * dims[d] as isize;
            }
            index[d] = 0;
            d += 1;
        }
    }
}
