//! Loop-axis fusion and importance scoring.
//!
//! All functions here work on axes already listed innermost first.

/// Fuse contiguous dimensions across multiple operands.
///
/// Axis `i` folds into axis `i - 1` when `strides[k][i] == dims[i-1] * strides[k][i-1]`
/// holds for every operand `k`. The folded axis keeps extent 1; strides are not
/// rewritten, so the fused axis walks with the inner stride.
pub(crate) fn fuse_dims(dims: &[usize], all_strides: &[&[isize]]) -> Vec<usize> {
    let n = dims.len();
    if n <= 1 || all_strides.is_empty() {
        return dims.to_vec();
    }

    let mut result = dims.to_vec();

    for i in (1..n).rev() {
        let can_merge = all_strides
            .iter()
            .all(|strides| {
                isize::try_from(result[i - 1])
                    .ok()
                    .and_then(|d| d.checked_mul(strides[i - 1]))
                    == Some(strides[i])
            });

        if can_merge {
            result[i - 1] *= result[i];
            result[i] = 1;
        }
    }

    result
}

/// Drop extent-1 axes from `dims` and the matching entries of every stride list.
pub(crate) fn compress_dims(
    dims: &[usize],
    all_strides: &[Vec<isize>],
) -> (Vec<usize>, Vec<Vec<isize>>) {
    let keep: Vec<usize> = (0..dims.len()).filter(|&i| dims[i] != 1).collect();
    let new_dims = keep.iter().map(|&i| dims[i]).collect();
    let new_strides = all_strides
        .iter()
        .map(|strides| keep.iter().map(|&i| strides[i]).collect())
        .collect();
    (new_dims, new_strides)
}

/// Score each axis for loop ordering; higher scores go innermost.
///
/// Every operand contributes `1 << (g * (n - order))`, where `order` is the
/// stride rank of the axis in that operand and `g` is wide enough that the
/// contributions never carry into one another. The first operand (the
/// destination) counts twice. Extent-1 axes score 0.
pub(crate) fn compute_importance(
    dims: &[usize],
    all_strides: &[&[isize]],
    index_orders: &[Vec<usize>],
) -> Vec<u128> {
    let n = dims.len();
    let m = all_strides.len();

    if n == 0 || m == 0 {
        return vec![];
    }

    let g = (u64::BITS - (m as u64 + 1).leading_zeros()) as usize;

    let mut importance = vec![0u128; n];
    for (k, orders) in index_orders.iter().enumerate() {
        let weight: u128 = if k == 0 { 2 } else { 1 };
        for i in 0..n {
            // Very high ranks saturate instead of wrapping; ordering degrades gracefully.
            let shift = (g * (n - orders[i])).min(120);
            importance[i] = importance[i].saturating_add(weight << shift);
        }
    }

    for i in 0..n {
        if dims[i] <= 1 {
            importance[i] = 0;
        }
    }

    importance
}

/// Permutation sorting `importance` in descending order (stable).
pub(crate) fn sort_by_importance(importance: &[u128]) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..importance.len()).collect();
    indices.sort_by(|&a, &b| importance[b].cmp(&importance[a]));
    indices
}
