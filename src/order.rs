//! Loop ordering for multi-operand strided iteration.

use crate::auxiliary::index_order;
use crate::fuse::{compute_importance, sort_by_importance};

/// Compute the iteration order for dimensions, innermost first.
///
/// Each operand ranks its axes by stride magnitude; the ranks are packed into
/// per-axis importance scores (destination weighted 2x) and sorted descending,
/// so the axis with the smallest strides across operands becomes the inner loop.
///
/// # Arguments
/// * `dims` - The shared dimensions of all operands
/// * `strides_list` - Slice of stride arrays, one per operand
/// * `dest_index` - Index of the destination operand (weighted 2x, typically 0)
pub(crate) fn compute_order(
    dims: &[usize],
    strides_list: &[&[isize]],
    dest_index: Option<usize>,
) -> Vec<usize> {
    let rank = dims.len();
    if rank == 0 {
        return Vec::new();
    }

    if strides_list.is_empty() {
        return (0..rank).rev().collect();
    }

    // Destination goes first so it picks up the double weight.
    let mut reordered: Vec<&[isize]> = strides_list.to_vec();
    if let Some(dest_idx) = dest_index {
        if dest_idx != 0 && dest_idx < reordered.len() {
            let dest = reordered.remove(dest_idx);
            reordered.insert(0, dest);
        }
    }

    let index_orders: Vec<Vec<usize>> = reordered.iter().map(|s| index_order(s)).collect();
    let importance = compute_importance(dims, &reordered, &index_orders);

    sort_by_importance(&importance)
}
