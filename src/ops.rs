//! Assignment, arithmetic and reductions built on the map kernels.

use std::ops::{Add, Div, Mul, Sub};

use num_traits::Zero;

use crate::kernel::{build_plan, for_each_inner_run};
use crate::map::{map_into, zip_map2_into};
use crate::view::StridedView;
use crate::Result;

/// Copy `src` into `dest` element by element.
///
/// When both views share a buffer and their element sets overlap, the order in
/// which overlapping elements are read and written is unspecified; copy the
/// source out first if the result must not depend on it.
pub fn assign<T: Copy>(dest: &StridedView<T>, src: &StridedView<T>) -> Result<()> {
    map_into(dest, src, |x| x)
}

/// Set every element of `dest` to `value`.
pub fn assign_scalar<T: Copy>(dest: &StridedView<T>, value: T) {
    let cells = dest.buffer().cells();
    let strides_list: [&[isize]; 1] = [dest.strides()];
    let plan = build_plan(dest.dims(), &strides_list, Some(0));
    for_each_inner_run(&plan, &[dest.offset()], |offsets, len, strides| {
        let mut p = offsets[0];
        for _ in 0..len {
            cells[p as usize].set(value);
            p += strides[0];
        }
    });
}

/// `dest = a + b`
pub fn add_into<T: Copy + Add<Output = T>>(
    dest: &StridedView<T>,
    a: &StridedView<T>,
    b: &StridedView<T>,
) -> Result<()> {
    zip_map2_into(dest, a, b, |x, y| x + y)
}

/// `dest = a - b`
pub fn sub_into<T: Copy + Sub<Output = T>>(
    dest: &StridedView<T>,
    a: &StridedView<T>,
    b: &StridedView<T>,
) -> Result<()> {
    zip_map2_into(dest, a, b, |x, y| x - y)
}

/// `dest = a * b` (element-wise)
pub fn mul_into<T: Copy + Mul<Output = T>>(
    dest: &StridedView<T>,
    a: &StridedView<T>,
    b: &StridedView<T>,
) -> Result<()> {
    zip_map2_into(dest, a, b, |x, y| x * y)
}

/// `dest = a / b` (element-wise)
pub fn div_into<T: Copy + Div<Output = T>>(
    dest: &StridedView<T>,
    a: &StridedView<T>,
    b: &StridedView<T>,
) -> Result<()> {
    zip_map2_into(dest, a, b, |x, y| x / y)
}

/// `dest = alpha * src`
pub fn scale_into<T: Copy + Mul<Output = T>>(
    dest: &StridedView<T>,
    src: &StridedView<T>,
    alpha: T,
) -> Result<()> {
    map_into(dest, src, |x| alpha * x)
}

/// Sum of all elements. An empty view sums to zero.
pub fn sum<T: Copy + Zero>(src: &StridedView<T>) -> T {
    let cells = src.buffer().cells();
    let strides_list: [&[isize]; 1] = [src.strides()];
    let plan = build_plan(src.dims(), &strides_list, Some(0));
    let mut acc = T::zero();
    for_each_inner_run(&plan, &[src.offset()], |offsets, len, strides| {
        let mut p = offsets[0];
        for _ in 0..len {
            acc = acc + cells[p as usize].get();
            p += strides[0];
        }
    });
    acc
}

/// True if `a` and `b` have the same shape and equal elements.
pub fn equals<T: Copy + PartialEq>(a: &StridedView<T>, b: &StridedView<T>) -> bool {
    if a.dims() != b.dims() {
        return false;
    }
    let ca = a.buffer().cells();
    let cb = b.buffer().cells();
    let strides_list: [&[isize]; 2] = [a.strides(), b.strides()];
    let plan = build_plan(a.dims(), &strides_list, None);
    let mut equal = true;
    for_each_inner_run(&plan, &[a.offset(), b.offset()], |offsets, len, strides| {
        if !equal {
            return;
        }
        let (mut ap, mut bp) = (offsets[0], offsets[1]);
        for _ in 0..len {
            if ca[ap as usize].get() != cb[bp as usize].get() {
                equal = false;
                return;
            }
            ap += strides[0];
            bp += strides[1];
        }
    });
    equal
}
