//! Level-2 cross-validation cases.

use oxblas_crossval::{run_case, Arguments, Initialization};

fn args(function: &str) -> Arguments {
    let mut a = Arguments::new(function);
    a.m = 37;
    a.n = 29;
    a.lda = 40;
    a.ldb = 40;
    a.ldc = 40;
    a
}

fn assert_runs(a: &Arguments) {
    let outcome = run_case(a).unwrap_or_else(|e| panic!("{}: {e:#}", a.function));
    assert!(!outcome.is_skipped(), "{} unexpectedly skipped", a.function);
}

#[test]
fn gemv_trans_and_scalar_grid() {
    for trans in ['N', 'T'] {
        for (alpha, beta) in [(1.0, 0.0), (2.0, 1.0), (0.0, 1.0), (0.0, 0.5), (-1.5, 2.0)] {
            let mut a = args("gemv");
            a.transa = trans;
            a.alpha = alpha;
            a.beta = beta;
            assert_runs(&a);
        }
    }
}

#[test]
fn gemv_padded_lda_and_increments() {
    let mut a = args("gemv");
    a.lda = 64;
    a.incx = 2;
    a.incy = -1;
    a.initialization = Initialization::HplRand;
    assert_runs(&a);
}

#[test]
fn gemv_empty_dimensions() {
    for (m, n) in [(0, 29), (37, 0)] {
        let mut a = args("gemv");
        a.m = m;
        a.n = n;
        a.lda = 40;
        assert_runs(&a);
    }
}

#[test]
fn gemv_batched_variants() {
    let mut a = args("gemv_batched");
    a.batch_count = 4;
    assert_runs(&a);

    let mut a = args("gemv_strided_batched");
    a.batch_count = 3;
    a.stride_a = (a.lda as i64) * (a.n as i64) + 7;
    a.stride_x = 64;
    a.stride_y = 64;
    assert_runs(&a);
}

#[test]
fn ger_rank_one_updates() {
    for (incx, incy) in [(1, 1), (2, -1)] {
        let mut a = args("ger");
        a.incx = incx;
        a.incy = incy;
        a.alpha = 1.5;
        assert_runs(&a);
    }
}

#[test]
fn symv_both_triangles() {
    for uplo in ['U', 'L'] {
        let mut a = args("symv");
        a.n = 31;
        a.lda = 31;
        a.uplo = uplo;
        a.alpha = 2.0;
        a.beta = -1.0;
        assert_runs(&a);
    }
}

#[test]
fn trsv_full_option_grid() {
    for uplo in ['U', 'L'] {
        for trans in ['N', 'T'] {
            for diag in ['N', 'U'] {
                let mut a = args("trsv");
                a.n = 24;
                a.lda = 24;
                a.uplo = uplo;
                a.transa = trans;
                a.diag = diag;
                a.initialization = Initialization::HplRand;
                assert_runs(&a);
            }
        }
    }
}

#[test]
fn trsv_negative_increment() {
    let mut a = args("trsv");
    a.n = 16;
    a.lda = 20;
    a.incx = -2;
    a.initialization = Initialization::HplRand;
    assert_runs(&a);
}

#[test]
fn bad_arg_contract() {
    assert_runs(&args("gemv_bad_arg"));
    assert_runs(&args("ger_bad_arg"));
    assert_runs(&args("symv_bad_arg"));
    assert_runs(&args("trsv_bad_arg"));
}

#[test]
fn gemv_timing_produces_a_record() {
    let mut a = args("gemv");
    a.timing = true;
    a.iters = 3;
    let report = run_case(&a).unwrap().unwrap_report();
    let perf = report.perf.expect("timing requested");
    assert!(perf.cpu_us.is_some());
}

#[test]
fn level2_timing_reports_flop_rates() {
    for function in ["ger", "symv", "trsv"] {
        let mut a = args(function);
        a.n = 16;
        a.m = 16;
        a.lda = 16;
        a.timing = true;
        a.iters = 2;
        a.cold_iters = 1;
        let report = run_case(&a).unwrap().unwrap_report();
        let perf = report.perf.expect("timing requested");
        assert!(perf.gflops.is_some(), "{function} missing gflops");
        assert!(perf.cpu_us.is_some(), "{function} missing oracle time");
    }
}
