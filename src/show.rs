//! Nested-bracket text rendering of views.

use std::fmt;

use crate::view::StridedView;

/// Renders one bracket level per axis, with the innermost axis on one line.
/// Elements are right-aligned to a common width; a precision (`{:.2}`) is
/// forwarded to every element.
impl<T: Copy + fmt::Display> fmt::Display for StridedView<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = f.precision();
        let render = |v: T| match precision {
            Some(p) => format!("{v:.p$}"),
            None => v.to_string(),
        };

        if self.ndim() == 0 {
            let v = self.get(&[]).map_err(|_| fmt::Error)?;
            return f.write_str(&render(v));
        }

        let mut cells = Vec::with_capacity(self.len());
        let mut index = vec![0usize; self.ndim()];
        if !self.is_empty() {
            loop {
                cells.push(render(self.get(&index).map_err(|_| fmt::Error)?));
                if !advance(&mut index, self.dims()) {
                    break;
                }
            }
        }
        let width = cells.iter().map(|c| c.chars().count()).max().unwrap_or(0);

        let mut cells = cells.into_iter();
        write_axis(f, self.dims(), 0, width, &mut cells)
    }
}

/// Row-major odometer step. Returns `false` once every index has been visited.
fn advance(index: &mut [usize], dims: &[usize]) -> bool {
    for d in (0..dims.len()).rev() {
        index[d] += 1;
        if index[d] < dims[d] {
            return true;
        }
        index[d] = 0;
    }
    false
}

fn write_axis(
    f: &mut fmt::Formatter<'_>,
    dims: &[usize],
    depth: usize,
    width: usize,
    cells: &mut impl Iterator<Item = String>,
) -> fmt::Result {
    f.write_str("[")?;
    let extent = dims[depth];
    let innermost = depth + 1 == dims.len();
    for i in 0..extent {
        if i > 0 {
            if innermost {
                f.write_str(", ")?;
            } else {
                f.write_str(",")?;
                for _ in 0..dims.len() - depth - 1 {
                    f.write_str("\n")?;
                }
                for _ in 0..=depth {
                    f.write_str(" ")?;
                }
            }
        }
        if innermost {
            let cell = cells.next().unwrap_or_default();
            write!(f, "{cell:>width$}")?;
        } else {
            write_axis(f, dims, depth + 1, width, cells)?;
        }
    }
    f.write_str("]")
}

#[cfg(test)]
mod tests {
    use crate::{Buffer, StridedView};

    #[test]
    fn test_display_1d() {
        let v = StridedView::from_vec(vec![1, 2, 3], &[3]).unwrap();
        assert_eq!(v.to_string(), "[1, 2, 3]");
    }

    #[test]
    fn test_display_2d_aligned() {
        let v = StridedView::row_major(Buffer::<i32>::iota(6).unwrap(), &[2, 3]).unwrap();
        let v = v.step(&[None, Some(-1)]).unwrap();
        assert_eq!(v.to_string(), "[[2, 1, 0],\n [5, 4, 3]]");

        let w = StridedView::from_vec(vec![1, 20, 300, 4], &[2, 2]).unwrap();
        assert_eq!(w.to_string(), "[[  1,  20],\n [300,   4]]");
    }

    #[test]
    fn test_display_3d_blank_line_between_blocks() {
        let v = StridedView::row_major(Buffer::<i32>::iota(8).unwrap(), &[2, 2, 2]).unwrap();
        assert_eq!(
            v.to_string(),
            "[[[0, 1],\n  [2, 3]],\n\n [[4, 5],\n  [6, 7]]]"
        );
    }

    #[test]
    fn test_display_precision() {
        let v = StridedView::from_vec(vec![0.5f64, 1.0], &[2]).unwrap();
        assert_eq!(format!("{v:.2}"), "[0.50, 1.00]");
    }

    #[test]
    fn test_display_rank0_and_empty() {
        let s = StridedView::new(Buffer::from_vec(vec![4.5f64]), &[], &[], 0).unwrap();
        assert_eq!(s.to_string(), "4.5");
        let e = StridedView::row_major(Buffer::<f64>::zeros(0), &[0]).unwrap();
        assert_eq!(e.to_string(), "[]");
        let e2 = StridedView::row_major(Buffer::<f64>::zeros(0), &[2, 0]).unwrap();
        assert_eq!(e2.to_string(), "[[],\n []]");
    }
}
