//! Mixed-precision extension routines.
//!
//! Inputs, outputs and the accumulator each get their own type parameter;
//! every element is widened through f64 into the compute type, accumulated
//! there in ascending order, and narrowed once on store. f64 represents all
//! supported element types exactly, so the widening itself never rounds.

use crate::device::DeviceBuffer;
use crate::handle::{Handle, ResultArg, ScalarArg};
use crate::validate;
use oxblas_common::{vector_index, Compute, Result, Scalar, Transpose};

fn widen<From: Scalar, To: Compute>(v: From) -> To {
    To::from_f64(v.to_f64())
}

fn narrow<From: Compute, To: Scalar>(v: From) -> To {
    To::from_f64(v.to_f64())
}

/// y = alpha * x + y with a separate accumulator type.
///
/// `Ta` is the alpha type, `Tx` the element type of both vectors, `Tc` the
/// type the multiply-add runs in.
#[allow(clippy::too_many_arguments)]
pub fn axpy_ex<Ta, Tx, Tc>(
    handle: &Handle,
    n: i32,
    alpha: ScalarArg<Ta>,
    x: &DeviceBuffer<Tx>,
    incx: i32,
    y: &mut DeviceBuffer<Tx>,
    incy: i32,
) -> Result<()>
where
    Ta: Scalar,
    Tx: Scalar,
    Tc: Compute,
{
    log::trace!("axpy_ex n={n} incx={incx} incy={incy}");
    if n <= 0 {
        return Ok(());
    }
    let alpha: Tc = widen(alpha.resolve(handle, "alpha")?);
    if alpha == Tc::ZERO {
        return Ok(());
    }
    validate::vector_extent("x", x, n, incx)?;
    validate::vector_extent("y", y, n, incy)?;
    handle.stream().record_launch();
    let (xs, ys) = (x.as_slice(), y.as_mut_slice());
    for i in 0..n {
        let yi = vector_index(i, n, incy);
        let acc = alpha * widen::<Tx, Tc>(xs[vector_index(i, n, incx)]) + widen::<Tx, Tc>(ys[yi]);
        ys[yi] = narrow(acc);
    }
    Ok(())
}

/// result = x . y with separate element, result and accumulator types.
#[allow(clippy::too_many_arguments)]
pub fn dot_ex<Tx, Tr, Tc>(
    handle: &Handle,
    n: i32,
    x: &DeviceBuffer<Tx>,
    incx: i32,
    y: &DeviceBuffer<Tx>,
    incy: i32,
    mut result: ResultArg<Tr>,
) -> Result<()>
where
    Tx: Scalar,
    Tr: Scalar,
    Tc: Compute,
{
    log::trace!("dot_ex n={n} incx={incx} incy={incy}");
    result.check(handle, "result")?;
    if n <= 0 {
        result.write(Tr::ZERO);
        return Ok(());
    }
    validate::vector_extent("x", x, n, incx)?;
    validate::vector_extent("y", y, n, incy)?;
    handle.stream().record_launch();
    let (xs, ys) = (x.as_slice(), y.as_slice());
    let mut acc = Tc::ZERO;
    for i in 0..n {
        acc = acc
            + widen::<Tx, Tc>(xs[vector_index(i, n, incx)])
                * widen::<Tx, Tc>(ys[vector_index(i, n, incy)]);
    }
    result.write(narrow(acc));
    Ok(())
}

/// C = alpha * op(A) * op(B) + beta * C with separate input, output and
/// accumulator types. Covers the f16/bf16-in f32-accumulate and i8-in
/// i32-out paths.
#[allow(clippy::too_many_arguments)]
pub fn gemm_ex<Ti, To, Tc>(
    handle: &Handle,
    transa: Transpose,
    transb: Transpose,
    m: i32,
    n: i32,
    k: i32,
    alpha: ScalarArg<Tc>,
    a: &DeviceBuffer<Ti>,
    lda: i32,
    b: &DeviceBuffer<Ti>,
    ldb: i32,
    beta: ScalarArg<Tc>,
    c: &mut DeviceBuffer<To>,
    ldc: i32,
) -> Result<()>
where
    Ti: Scalar,
    To: Scalar,
    Tc: Compute,
{
    log::trace!("gemm_ex transa={transa} transb={transb} m={m} n={n} k={k}");
    validate::size("m", m)?;
    validate::size("n", n)?;
    validate::size("k", k)?;
    let (ra, ca) = match transa {
        Transpose::None => (m, k),
        Transpose::Transpose => (k, m),
    };
    let (rb, cb) = match transb {
        Transpose::None => (k, n),
        Transpose::Transpose => (n, k),
    };
    validate::leading_dim("lda", lda, ra)?;
    validate::leading_dim("ldb", ldb, rb)?;
    validate::leading_dim("ldc", ldc, m)?;
    if m == 0 || n == 0 {
        return Ok(());
    }
    let alpha = alpha.resolve(handle, "alpha")?;
    let beta = beta.resolve(handle, "beta")?;
    if (k == 0 || alpha == Tc::ZERO) && beta == Tc::ONE {
        return Ok(());
    }
    validate::matrix_extent("a", a, ra, ca, lda)?;
    validate::matrix_extent("b", b, rb, cb, ldb)?;
    validate::matrix_extent("c", c, m, n, ldc)?;
    handle.stream().record_launch();
    let (aa, bb, cc) = (a.as_slice(), b.as_slice(), c.as_mut_slice());
    let (lda, ldb, ldc) = (lda as usize, ldb as usize, ldc as usize);
    for j in 0..n {
        for i in 0..m {
            let cij = i as usize + j as usize * ldc;
            // beta of zero overwrites rather than scales, so C is never read.
            let old: Tc =
                if beta == Tc::ZERO { Tc::ZERO } else { beta * widen::<To, Tc>(cc[cij]) };
            if alpha == Tc::ZERO {
                cc[cij] = narrow(old);
                continue;
            }
            let mut acc = Tc::ZERO;
            for l in 0..k {
                let ail = match transa {
                    Transpose::None => aa[i as usize + l as usize * lda],
                    Transpose::Transpose => aa[l as usize + i as usize * lda],
                };
                let blj = match transb {
                    Transpose::None => bb[l as usize + j as usize * ldb],
                    Transpose::Transpose => bb[j as usize + l as usize * ldb],
                };
                acc = acc + widen::<Ti, Tc>(ail) * widen::<Ti, Tc>(blj);
            }
            cc[cij] = narrow(alpha * acc + old);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use half::f16;

    #[test]
    fn gemm_ex_f16_in_f32_accumulate() {
        let h = Handle::new();
        let mut a = DeviceBuffer::<f16>::new(4).unwrap();
        let mut b = DeviceBuffer::<f16>::new(4).unwrap();
        let mut c = DeviceBuffer::<f16>::new(4).unwrap();
        let vals: Vec<f16> = [1.0, 2.0, 3.0, 4.0].iter().map(|&v| f16::from_f64(v)).collect();
        a.transfer_from(&vals).unwrap();
        b.transfer_from(&vals).unwrap();
        c.transfer_from(&[f16::ZERO; 4]).unwrap();
        gemm_ex::<f16, f16, f32>(
            &h, Transpose::None, Transpose::None, 2, 2, 2,
            ScalarArg::Host(1.0f32), &a, 2, &b, 2, ScalarArg::Host(0.0f32), &mut c, 2,
        )
        .unwrap();
        // [[1,3],[2,4]]^2 = [[7,15],[10,22]], exact in f16.
        let mut out = vec![f16::ZERO; 4];
        c.transfer_to(&mut out).unwrap();
        let got: Vec<f64> = out.iter().map(|v| v.to_f64()).collect();
        assert_eq!(got, [7.0, 10.0, 15.0, 22.0]);
    }

    #[test]
    fn gemm_ex_i8_to_i32() {
        let h = Handle::new();
        let mut a = DeviceBuffer::<i8>::new(2).unwrap();
        let mut b = DeviceBuffer::<i8>::new(2).unwrap();
        let mut c = DeviceBuffer::<i32>::new(1).unwrap();
        a.transfer_from(&[100, 100]).unwrap();
        b.transfer_from(&[100, 100]).unwrap();
        gemm_ex::<i8, i32, i32>(
            &h, Transpose::Transpose, Transpose::None, 1, 1, 2,
            ScalarArg::Host(1i32), &a, 2, &b, 2, ScalarArg::Host(0i32), &mut c, 1,
        )
        .unwrap();
        // 100*100 + 100*100 overflows i8 but not the i32 accumulator.
        let mut out = vec![0i32; 1];
        c.transfer_to(&mut out).unwrap();
        assert_eq!(out, [20000]);
    }

    #[test]
    fn axpy_ex_accumulates_in_wider_type() {
        let h = Handle::new();
        let mut x = DeviceBuffer::<f16>::new(1).unwrap();
        let mut y = DeviceBuffer::<f16>::new(1).unwrap();
        x.transfer_from(&[f16::from_f64(0.5)]).unwrap();
        y.transfer_from(&[f16::from_f64(1.0)]).unwrap();
        axpy_ex::<f32, f16, f32>(&h, 1, ScalarArg::Host(2.0f32), &x, 1, &mut y, 1).unwrap();
        let mut out = vec![f16::ZERO; 1];
        y.transfer_to(&mut out).unwrap();
        assert_eq!(out[0].to_f64(), 2.0);
    }

    #[test]
    fn dot_ex_writes_result_type() {
        let h = Handle::new();
        let mut x = DeviceBuffer::<f16>::new(2).unwrap();
        let mut y = DeviceBuffer::<f16>::new(2).unwrap();
        x.transfer_from(&[f16::ONE, f16::from_f64(2.0)]).unwrap();
        y.transfer_from(&[f16::from_f64(3.0), f16::from_f64(4.0)]).unwrap();
        let mut r = f16::ZERO;
        dot_ex::<f16, f16, f32>(&h, 2, &x, 1, &y, 1, ResultArg::Host(&mut r)).unwrap();
        assert_eq!(r.to_f64(), 11.0);
    }
}
