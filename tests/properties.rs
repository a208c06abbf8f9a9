use proptest::prelude::*;
use strided_ndview::{assign, row_major_strides, Buffer, StridedView};

fn iota_view(dims: &[usize]) -> StridedView<i64> {
    StridedView::row_major(Buffer::iota(dims.iter().product()).unwrap(), dims).unwrap()
}

/// Every index tuple of `dims` in row-major order.
fn all_indices(dims: &[usize]) -> Vec<Vec<usize>> {
    let mut out = vec![vec![]];
    for &d in dims {
        out = out
            .into_iter()
            .flat_map(|prefix| {
                (0..d).map(move |i| {
                    let mut next = prefix.clone();
                    next.push(i);
                    next
                })
            })
            .collect();
    }
    out
}

proptest! {
    #[test]
    fn prop_row_major_visits_each_address_once(dims in prop::collection::vec(1usize..=4, 1..=4)) {
        let view = iota_view(&dims);
        let strides = row_major_strides(&dims);
        let mut seen = Vec::new();
        for idx in all_indices(&dims) {
            let manual: isize = idx.iter().zip(&strides).map(|(&i, &s)| i as isize * s).sum();
            let flat = view.index_of(&idx).unwrap();
            prop_assert_eq!(flat as isize, manual);
            prop_assert_eq!(view.get(&idx).unwrap(), manual as i64);
            seen.push(flat);
        }
        seen.sort_unstable();
        seen.dedup();
        prop_assert_eq!(seen.len(), dims.iter().product::<usize>());
    }

    #[test]
    fn prop_reverse_twice_is_identity(n in 1usize..=32) {
        let v = iota_view(&[n]);
        let r = v.step(&[Some(-1)]).unwrap();
        prop_assert_eq!(r.get(&[0]).unwrap(), v.get(&[n - 1]).unwrap());
        let mut forward = v.to_vec();
        forward.reverse();
        prop_assert_eq!(r.to_vec(), forward);
        let rr = r.step(&[Some(-1)]).unwrap();
        for i in 0..n {
            prop_assert_eq!(rr.get(&[i]).unwrap(), v.get(&[i]).unwrap());
        }
    }

    #[test]
    fn prop_hi_lo_correspondence((n, k) in (0usize..=24).prop_flat_map(|n| (Just(n), 0..=n))) {
        let v = iota_view(&[n]);
        let head = v.hi(&[Some(k)]).unwrap();
        prop_assert_eq!(head.dims()[0], k);
        for i in 0..k {
            prop_assert_eq!(head.get(&[i]).unwrap(), v.get(&[i]).unwrap());
        }
        let tail = v.lo(&[Some(k)]).unwrap();
        prop_assert_eq!(tail.dims()[0], n - k);
        for i in 0..n - k {
            prop_assert_eq!(tail.get(&[i]).unwrap(), v.get(&[i + k]).unwrap());
        }
    }

    #[test]
    fn prop_square_diagonal_of_iota(n in 1usize..=12) {
        let d = iota_view(&[n, n]).diagonal().unwrap();
        prop_assert_eq!(d.dims(), &[n][..]);
        for i in 0..n {
            prop_assert_eq!(d.get(&[i]).unwrap(), (i * (n + 1)) as i64);
        }
    }

    #[test]
    fn prop_transpose_round_trip(rows in 1usize..=6, cols in 1usize..=6) {
        let v = iota_view(&[rows, cols]);
        let tt = v.t().t();
        prop_assert_eq!(tt.dims(), v.dims());
        prop_assert_eq!(tt.strides(), v.strides());
        prop_assert_eq!(tt.offset(), v.offset());
    }

    #[test]
    fn prop_step_matches_manual_slice(n in 1usize..=20, s in prop_oneof![-4isize..=-1, 1isize..=4]) {
        let v = iota_view(&[n]);
        let stepped = v.step(&[Some(s)]).unwrap();
        let expected: Vec<i64> = if s > 0 {
            (0..n as i64).step_by(s as usize).collect()
        } else {
            (0..n as i64).rev().step_by(s.unsigned_abs()).collect()
        };
        prop_assert_eq!(stepped.to_vec(), expected);
    }

    #[test]
    fn prop_diagonal_assign_leaves_off_diagonal(n in 1usize..=8) {
        let src = iota_view(&[n, n]);
        let dst = StridedView::row_major(Buffer::<i64>::zeros(n * n), &[n, n]).unwrap();
        assign(&dst.diagonal().unwrap(), &src.diagonal().unwrap()).unwrap();
        for i in 0..n {
            for j in 0..n {
                let expected = if i == j { src.get(&[i, j]).unwrap() } else { 0 };
                prop_assert_eq!(dst.get(&[i, j]).unwrap(), expected);
            }
        }
    }

    #[test]
    fn prop_assign_permuted_matches_get(dims in prop::collection::vec(1usize..=4, 3..=3)) {
        let src = iota_view(&dims).permute(&[1, 2, 0]).unwrap();
        let out = StridedView::row_major(Buffer::<i64>::zeros(src.len()), src.dims()).unwrap();
        assign(&out, &src).unwrap();
        prop_assert_eq!(out.to_vec(), src.to_vec());
    }
}
