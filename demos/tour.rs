//! A walk through building, slicing and copying strided views.
//!
//! Run with `cargo run --example tour`; set `RUST_LOG=trace` to see kernel plans.

use strided_ndview::{assign, Buffer, Result, StridedView};

fn main() -> Result<()> {
    env_logger::init();

    let a = StridedView::from_vec(vec![1.0f64, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3])?;

    println!("a =\n{a}");
    println!("\na.ndim() = {}", a.ndim());
    println!("a.len() = {}", a.len());
    println!("a.dims() = {:?}", a.dims());
    println!("a.dims()[0] = {}", a.dims()[0]);
    println!("a.dims()[1] = {}", a.dims()[1]);
    println!("\na[::-1, :] =\n{}", a.step(&[Some(-1), Some(1)])?);

    let b = StridedView::from_vec(vec![1.0f64, 2.0, 3.0, 4.0, 5.0, 6.0], &[6])?;
    println!("\nb = {b}");
    println!("\nb[-1] = {}", b.get(&[b.dims()[0] - 1])?);

    let c = StridedView::row_major(Buffer::<f64>::iota(56)?, &[8, 7])?;
    println!("\nc =\n{c}");

    println!("\nfirst five rows of c =\n{}", c.hi(&[Some(5), None])?);
    println!(
        "\nlast five rows of c =\n{}",
        c.lo(&[Some(c.dims()[0] - 5), None])?
    );
    println!(
        "\nrows one to three and columns five to seven =\n{}",
        c.hi(&[Some(3), Some(7)])?.lo(&[Some(0), Some(4)])?
    );

    let d = StridedView::row_major(Buffer::<f64>::zeros(c.len()), c.dims())?;
    assign(&d.diagonal()?, &c.diagonal()?)?;
    println!("\npopulated diag(c) =\n{d}");

    Ok(())
}
