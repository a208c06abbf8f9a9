//! Stride ranking helpers.

/// Compute the relative order of strides.
///
/// Returns a vector where `result[i]` is the 1-based rank of `|strides[i]|` among
/// all non-zero strides. Zero strides have order 1; ties share a rank.
pub(crate) fn index_order(strides: &[isize]) -> Vec<usize> {
    strides
        .iter()
        .map(|&si| {
            let si = si.unsigned_abs();
            if si == 0 {
                return 1;
            }
            1 + strides
                .iter()
                .filter(|&&s| s != 0 && s.unsigned_abs() < si)
                .count()
        })
        .collect()
}
