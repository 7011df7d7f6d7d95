//! gemm throughput across square sizes, host and device pointer modes.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use oxblas_common::{PointerMode, Transpose};
use oxblas_crossval::flops;
use oxblas_kernels::{blas3, DeviceBuffer, DeviceScalar, Handle, ScalarArg};
use std::hint::black_box;

fn gemm_flops(n: i32) -> Throughput {
    Throughput::Elements((flops::gemm_gflop_count(n, n, n) * 1e9) as u64)
}

fn square_inputs(n: i32) -> (DeviceBuffer<f32>, DeviceBuffer<f32>, DeviceBuffer<f32>) {
    let len = (n * n) as usize;
    let vals: Vec<f32> = (0..len).map(|i| ((i % 11) as f32) - 5.0).collect();
    let mut a = DeviceBuffer::new(len).unwrap();
    let mut b = DeviceBuffer::new(len).unwrap();
    let mut c = DeviceBuffer::new(len).unwrap();
    a.transfer_from(&vals).unwrap();
    b.transfer_from(&vals).unwrap();
    c.transfer_from(&vec![0.0; len]).unwrap();
    (a, b, c)
}

fn bench_gemm_square(crit: &mut Criterion) {
    let mut group = crit.benchmark_group("gemm_f32_square");
    let handle = Handle::new();

    for n in [32i32, 64, 128, 256] {
        let (a, b, mut c) = square_inputs(n);
        group.throughput(gemm_flops(n));
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |bench, &n| {
            bench.iter(|| {
                blas3::gemm(
                    &handle,
                    Transpose::None,
                    Transpose::None,
                    n,
                    n,
                    n,
                    ScalarArg::Host(black_box(1.0f32)),
                    black_box(&a),
                    n,
                    black_box(&b),
                    n,
                    ScalarArg::Host(0.0f32),
                    &mut c,
                    n,
                )
                .unwrap();
            });
        });
    }

    group.finish();
}

fn bench_gemm_pointer_modes(crit: &mut Criterion) {
    let mut group = crit.benchmark_group("gemm_pointer_mode");
    let n = 128i32;
    let (a, b, mut c) = square_inputs(n);
    group.throughput(gemm_flops(n));

    let mut host_handle = Handle::new();
    host_handle.set_pointer_mode(PointerMode::Host);
    group.bench_function("host", |bench| {
        bench.iter(|| {
            blas3::gemm(
                &host_handle,
                Transpose::None,
                Transpose::None,
                n,
                n,
                n,
                ScalarArg::Host(black_box(1.0f32)),
                &a,
                n,
                &b,
                n,
                ScalarArg::Host(0.0f32),
                &mut c,
                n,
            )
            .unwrap();
        });
    });

    let mut device_handle = Handle::new();
    device_handle.set_pointer_mode(PointerMode::Device);
    let alpha = DeviceScalar::new(1.0f32);
    let beta = DeviceScalar::new(0.0f32);
    group.bench_function("device", |bench| {
        bench.iter(|| {
            blas3::gemm(
                &device_handle,
                Transpose::None,
                Transpose::None,
                n,
                n,
                n,
                ScalarArg::Device(black_box(&alpha)),
                &a,
                n,
                &b,
                n,
                ScalarArg::Device(&beta),
                &mut c,
                n,
            )
            .unwrap();
        });
    });

    group.finish();
}

fn bench_gemm_transposes(crit: &mut Criterion) {
    let mut group = crit.benchmark_group("gemm_transpose");
    let n = 128i32;
    let (a, b, mut c) = square_inputs(n);
    let handle = Handle::new();
    group.throughput(gemm_flops(n));

    for (label, transa, transb) in [
        ("nn", Transpose::None, Transpose::None),
        ("tn", Transpose::Transpose, Transpose::None),
        ("nt", Transpose::None, Transpose::Transpose),
        ("tt", Transpose::Transpose, Transpose::Transpose),
    ] {
        group.bench_function(label, |bench| {
            bench.iter(|| {
                blas3::gemm(
                    &handle,
                    transa,
                    transb,
                    n,
                    n,
                    n,
                    ScalarArg::Host(black_box(1.0f32)),
                    &a,
                    n,
                    &b,
                    n,
                    ScalarArg::Host(0.0f32),
                    &mut c,
                    n,
                )
                .unwrap();
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_gemm_square, bench_gemm_pointer_modes, bench_gemm_transposes);
criterion_main!(benches);
