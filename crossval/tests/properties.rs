//! Property tests: randomly drawn valid geometries must always validate,
//! and the scoring and data-generation layers must hold their contracts.

use oxblas_crossval::{compare, init, run_case, Arguments, Initialization};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn check(args: &Arguments) {
    let outcome = run_case(args).unwrap_or_else(|e| panic!("{}: {e:#}", args.function));
    assert!(!outcome.is_skipped());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn axpy_any_valid_geometry(
        n in 0i32..200,
        incx in prop_oneof![1i32..4, -3i32..0],
        incy in prop_oneof![1i32..4, -3i32..0],
        alpha in -4.0f64..4.0,
        seed in any::<u64>(),
    ) {
        let mut args = Arguments::new("axpy");
        args.n = n;
        args.incx = incx;
        args.incy = incy;
        args.alpha = alpha;
        args.seed = seed;
        args.initialization = Initialization::HplRand;
        check(&args);
    }

    #[test]
    fn gemm_any_valid_geometry(
        m in 0i32..48,
        n in 0i32..48,
        k in 0i32..48,
        pad in 0i32..5,
        transa in prop_oneof![Just('N'), Just('T')],
        transb in prop_oneof![Just('N'), Just('T')],
        alpha in -2.0f64..2.0,
        beta in -2.0f64..2.0,
        seed in any::<u64>(),
    ) {
        let mut args = Arguments::new("gemm");
        args.m = m;
        args.n = n;
        args.k = k;
        args.transa = transa;
        args.transb = transb;
        // Leading dimensions cover the operand rows plus padding, never
        // below one.
        let rows_a = if transa == 'N' { m } else { k };
        let rows_b = if transb == 'N' { k } else { n };
        args.lda = (rows_a + pad).max(1);
        args.ldb = (rows_b + pad).max(1);
        args.ldc = (m + pad).max(1);
        args.alpha = alpha;
        args.beta = beta;
        args.seed = seed;
        args.initialization = Initialization::HplRand;
        check(&args);
    }

    #[test]
    fn gemm_f64_matches_f32_layout(
        m in 1i32..32,
        n in 1i32..32,
        k in 1i32..32,
        seed in any::<u64>(),
    ) {
        let mut args = Arguments::new("gemm");
        args.m = m;
        args.n = n;
        args.k = k;
        args.lda = m;
        args.ldb = k;
        args.ldc = m;
        args.seed = seed;
        for dt in [oxblas_common::Datatype::F32, oxblas_common::Datatype::F64] {
            args.a_type = dt;
            args.b_type = dt;
            args.c_type = dt;
            args.d_type = dt;
            args.compute_type = dt;
            check(&args);
        }
    }

    #[test]
    fn trsv_any_conditioned_system(
        n in 1i32..32,
        uplo in prop_oneof![Just('U'), Just('L')],
        trans in prop_oneof![Just('N'), Just('T')],
        diag in prop_oneof![Just('N'), Just('U')],
        seed in any::<u64>(),
    ) {
        let mut args = Arguments::new("trsv");
        args.n = n;
        args.lda = n;
        args.uplo = uplo;
        args.transa = trans;
        args.diag = diag;
        args.seed = seed;
        args.initialization = Initialization::HplRand;
        check(&args);
    }

    #[test]
    fn norm_check_of_a_vector_against_itself_is_zero(
        n in 1i32..200,
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let x: Vec<f64> = init::vector(&mut rng, n, 1, Initialization::HplRand);
        prop_assert_eq!(compare::norm_check(&x, &x), 0.0);
    }

    #[test]
    fn unit_check_is_symmetric(
        n in 1i32..64,
        flip in 0usize..64,
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let a: Vec<f32> = init::vector(&mut rng, n, 1, Initialization::HplRand);
        let mut b = a.clone();
        if flip < b.len() {
            b[flip] += 1.0;
        }
        let forward = compare::unit_check("fwd", &a, &b).is_ok();
        let backward = compare::unit_check("bwd", &b, &a).is_ok();
        prop_assert_eq!(forward, backward);
    }

    #[test]
    fn generation_is_deterministic_per_seed(
        n in 0i32..200,
        incx in prop_oneof![1i32..4, -3i32..0],
        seed in any::<u64>(),
    ) {
        let mut r1 = StdRng::seed_from_u64(seed);
        let mut r2 = StdRng::seed_from_u64(seed);
        let a: Vec<f64> = init::vector(&mut r1, n, incx, Initialization::HplRand);
        let b: Vec<f64> = init::vector(&mut r2, n, incx, Initialization::HplRand);
        prop_assert_eq!(a, b);
    }
}
