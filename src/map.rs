//! Map operations on strided views.
//!
//! Every operand keeps its own strides and offset; the destination is written
//! through its view. Shapes must match exactly.

use std::cell::Cell;

use crate::kernel::{build_plan, ensure_same_shape, for_each_inner_run};
use crate::view::StridedView;
use crate::Result;

// ============================================================================
// Stride-specialized inner loop helpers
//
// When all inner strides are 1 the run is a plain slice on every operand and
// the loop is written over zipped slices.
// ============================================================================

/// Unary inner loop: `dst[i] = f(src[i])` for `len` elements.
#[inline(always)]
fn inner_loop_map1<D: Copy, A: Copy>(
    dst: &[Cell<D>],
    dp: isize,
    ds: isize,
    src: &[Cell<A>],
    sp: isize,
    ss: isize,
    len: usize,
    f: &mut impl FnMut(A) -> D,
) {
    if ds == 1 && ss == 1 {
        let (dp, sp) = (dp as usize, sp as usize);
        for (d, s) in dst[dp..dp + len].iter().zip(&src[sp..sp + len]) {
            d.set(f(s.get()));
        }
    } else {
        let (mut dp, mut sp) = (dp, sp);
        for _ in 0..len {
            dst[dp as usize].set(f(src[sp as usize].get()));
            dp += ds;
            sp += ss;
        }
    }
}

/// Binary inner loop: `dst[i] = f(a[i], b[i])`.
#[inline(always)]
fn inner_loop_map2<D: Copy, A: Copy, B: Copy>(
    dst: &[Cell<D>],
    dp: isize,
    ds: isize,
    a: &[Cell<A>],
    ap: isize,
    a_s: isize,
    b: &[Cell<B>],
    bp: isize,
    b_s: isize,
    len: usize,
    f: &mut impl FnMut(A, B) -> D,
) {
    if ds == 1 && a_s == 1 && b_s == 1 {
        let (dp, ap, bp) = (dp as usize, ap as usize, bp as usize);
        let runs = dst[dp..dp + len]
            .iter()
            .zip(&a[ap..ap + len])
            .zip(&b[bp..bp + len]);
        for ((d, x), y) in runs {
            d.set(f(x.get(), y.get()));
        }
    } else {
        let (mut dp, mut ap, mut bp) = (dp, ap, bp);
        for _ in 0..len {
            dst[dp as usize].set(f(a[ap as usize].get(), b[bp as usize].get()));
            dp += ds;
            ap += a_s;
            bp += b_s;
        }
    }
}

/// Apply a function element-wise from source to destination.
///
/// Source and destination may have different element types.
pub fn map_into<D: Copy, A: Copy>(
    dest: &StridedView<D>,
    src: &StridedView<A>,
    mut f: impl FnMut(A) -> D,
) -> Result<()> {
    ensure_same_shape(dest.dims(), src.dims())?;

    let dst = dest.buffer().cells();
    let sa = src.buffer().cells();
    let strides_list: [&[isize]; 2] = [dest.strides(), src.strides()];
    let plan = build_plan(dest.dims(), &strides_list, Some(0));

    for_each_inner_run(
        &plan,
        &[dest.offset(), src.offset()],
        |offsets, len, strides| {
            inner_loop_map1(
                dst, offsets[0], strides[0], sa, offsets[1], strides[1], len, &mut f,
            )
        },
    );
    Ok(())
}

/// Binary element-wise operation: `dest[i] = f(a[i], b[i])`.
///
/// Source operands `a` and `b` may have different element types from each other
/// and from `dest`.
pub fn zip_map2_into<D: Copy, A: Copy, B: Copy>(
    dest: &StridedView<D>,
    a: &StridedView<A>,
    b: &StridedView<B>,
    mut f: impl FnMut(A, B) -> D,
) -> Result<()> {
    ensure_same_shape(dest.dims(), a.dims())?;
    ensure_same_shape(dest.dims(), b.dims())?;

    let dst = dest.buffer().cells();
    let sa = a.buffer().cells();
    let sb = b.buffer().cells();
    let strides_list: [&[isize]; 3] = [dest.strides(), a.strides(), b.strides()];
    let plan = build_plan(dest.dims(), &strides_list, Some(0));

    for_each_inner_run(
        &plan,
        &[dest.offset(), a.offset(), b.offset()],
        |offsets, len, strides| {
            inner_loop_map2(
                dst, offsets[0], strides[0], sa, offsets[1], strides[1], sb, offsets[2],
                strides[2], len, &mut f,
            )
        },
    );
    Ok(())
}

/// Overwrite every element of `dest` with `f(index)`.
///
/// Indices are visited in row-major logical order.
pub fn fill_with<T: Copy>(dest: &StridedView<T>, mut f: impl FnMut(&[usize]) -> T) {
    if dest.is_empty() {
        return;
    }
    let cells = dest.buffer().cells();
    let dims = dest.dims();
    let strides = dest.strides();
    let rank = dims.len();
    let mut index = vec![0usize; rank];
    let mut pos = dest.offset();

    loop {
        cells[pos as usize].set(f(&index));

        let mut d = rank;
        loop {
            if d == 0 {
                return;
            }
            d -= 1;
            index[d] += 1;
            pos += strides[d];
            if index[d] < dims[d] {
                break;
            }
            pos -= strides[d] * dims[d] as isize;
            index[d] = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Buffer, ShapeError, StridedError};

    fn iota_view(dims: &[usize]) -> StridedView<f64> {
        let len = dims.iter().product();
        StridedView::row_major(Buffer::iota(len).unwrap(), dims).unwrap()
    }

    #[test]
    fn test_map_into_contiguous() {
        let src = iota_view(&[2, 3]);
        let dst = StridedView::row_major(Buffer::<f64>::zeros(6), &[2, 3]).unwrap();
        map_into(&dst, &src, |x| x * 2.0).unwrap();
        assert_eq!(dst.to_vec(), vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
    }

    #[test]
    fn test_map_into_transposed() {
        let src = iota_view(&[3, 4]).t();
        let dst = StridedView::row_major(Buffer::<f64>::zeros(12), &[4, 3]).unwrap();
        map_into(&dst, &src, |x| x).unwrap();
        for i in 0..4 {
            for j in 0..3 {
                assert_eq!(dst.get(&[i, j]).unwrap(), (j * 4 + i) as f64);
            }
        }
    }

    #[test]
    fn test_map_into_type_change() {
        let src = iota_view(&[4]);
        let dst = StridedView::row_major(Buffer::<i32>::zeros(4), &[4]).unwrap();
        map_into(&dst, &src, |x| x as i32 + 1).unwrap();
        assert_eq!(dst.to_vec(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_map_into_shape_mismatch_writes_nothing() {
        let src = iota_view(&[2, 3]);
        let dst = StridedView::row_major(Buffer::<f64>::zeros(6), &[3, 2]).unwrap();
        let err = map_into(&dst, &src, |x| x).unwrap_err();
        assert_eq!(
            err,
            StridedError::Shape(ShapeError::Mismatch {
                left: vec![3, 2],
                right: vec![2, 3]
            })
        );
        assert_eq!(dst.to_vec(), vec![0.0; 6]);
    }

    #[test]
    fn test_map_into_reversed_source() {
        let src = iota_view(&[5]).step(&[Some(-1)]).unwrap();
        let dst = StridedView::row_major(Buffer::<f64>::zeros(5), &[5]).unwrap();
        map_into(&dst, &src, |x| x).unwrap();
        assert_eq!(dst.to_vec(), vec![4.0, 3.0, 2.0, 1.0, 0.0]);
    }

    #[test]
    fn test_zip_map2_mixed_strides() {
        let a = iota_view(&[3, 2]).t();
        let b = iota_view(&[2, 3]);
        let dst = StridedView::row_major(Buffer::<f64>::zeros(6), &[2, 3]).unwrap();
        zip_map2_into(&dst, &a, &b, |x, y| x * 10.0 + y).unwrap();
        for i in 0..2 {
            for j in 0..3 {
                let expected = a.get(&[i, j]).unwrap() * 10.0 + b.get(&[i, j]).unwrap();
                assert_eq!(dst.get(&[i, j]).unwrap(), expected);
            }
        }
    }

    #[test]
    fn test_zip_map2_shape_mismatch() {
        let a = iota_view(&[2, 3]);
        let b = iota_view(&[2, 2]);
        let dst = StridedView::row_major(Buffer::<f64>::zeros(6), &[2, 3]).unwrap();
        assert!(zip_map2_into(&dst, &a, &b, |x, y| x + y).is_err());
    }

    #[test]
    fn test_fill_with_index() {
        let dst = StridedView::row_major(Buffer::<usize>::zeros(6), &[2, 3]).unwrap();
        fill_with(&dst.t(), |idx| idx[0] * 10 + idx[1]);
        // dst.t()[j, i] == dst[i, j]
        assert_eq!(dst.to_vec(), vec![0, 10, 20, 1, 11, 21]);
    }

    #[test]
    fn test_fill_with_rank0() {
        let dst = StridedView::new(Buffer::<i32>::zeros(3), &[], &[], 2).unwrap();
        fill_with(&dst, |idx| idx.len() as i32 + 9);
        assert_eq!(dst.buffer().to_vec(), vec![0, 0, 9]);
    }

    #[test]
    fn test_map_into_same_buffer_disjoint() {
        // Copy row 0 onto row 1 of the same buffer.
        let a = iota_view(&[2, 3]);
        let row0 = a.pick(&[Some(0)]).unwrap();
        let row1 = a.pick(&[Some(1)]).unwrap();
        map_into(&row1, &row0, |x| x).unwrap();
        assert_eq!(a.to_vec(), vec![0.0, 1.0, 2.0, 0.0, 1.0, 2.0]);
    }
}
