//! Kernel capability registry — single source of truth for available paths.
//!
//! Describes what a given build provides: which level-3 path is compiled in
//! and the SIMD level the compiler was allowed to assume. The handle takes a
//! snapshot at construction and the timing harness records it alongside
//! performance numbers.

use std::fmt;

/// SIMD instruction set level assumed at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[non_exhaustive]
pub enum SimdLevel {
    /// No SIMD; scalar code only.
    Scalar,
    /// ARM NEON (128-bit).
    Neon,
    /// x86 SSE4.2 (128-bit).
    Sse42,
    /// x86 AVX2 (256-bit).
    Avx2,
    /// x86 AVX-512 (512-bit).
    Avx512,
}

impl fmt::Display for SimdLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimdLevel::Scalar => write!(f, "scalar"),
            SimdLevel::Neon => write!(f, "neon"),
            SimdLevel::Sse42 => write!(f, "sse4.2"),
            SimdLevel::Avx2 => write!(f, "avx2"),
            SimdLevel::Avx512 => write!(f, "avx512"),
        }
    }
}

/// The matrix-multiply path a build executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum KernelBackend {
    /// Straight triple loops.
    Looped,
    /// Cache-blocked over output tiles.
    Blocked,
}

impl fmt::Display for KernelBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KernelBackend::Looped => write!(f, "looped"),
            KernelBackend::Blocked => write!(f, "blocked"),
        }
    }
}

impl KernelBackend {
    /// Returns true if this backend is compiled in the current build.
    pub fn is_compiled(self) -> bool {
        match self {
            KernelBackend::Looped => true,
            KernelBackend::Blocked => cfg!(feature = "blocked"),
        }
    }
}

/// Snapshot of what a build configuration provides.
#[derive(Debug, Clone)]
pub struct KernelCaps {
    /// Cache-blocked level-3 path is compiled in.
    pub blocked: bool,
    /// Best SIMD level assumed at compile time.
    pub simd_level: SimdLevel,
}

impl KernelCaps {
    /// Build from compile-time feature flags.
    pub fn from_compile_time() -> Self {
        KernelCaps {
            blocked: cfg!(feature = "blocked"),
            simd_level: compile_time_simd_level(),
        }
    }

    /// The level-3 path this build executes.
    pub fn gemm_backend(&self) -> KernelBackend {
        if self.blocked {
            KernelBackend::Blocked
        } else {
            KernelBackend::Looped
        }
    }

    /// Human-readable summary for logs and performance records.
    pub fn summary(&self) -> String {
        format!("simd={} gemm={}", self.simd_level, self.gemm_backend())
    }
}

/// Detect the best SIMD level assumed at compile time.
const fn compile_time_simd_level() -> SimdLevel {
    if cfg!(target_feature = "avx512f") {
        SimdLevel::Avx512
    } else if cfg!(target_feature = "avx2") {
        SimdLevel::Avx2
    } else if cfg!(target_feature = "sse4.2") {
        SimdLevel::Sse42
    } else if cfg!(target_arch = "aarch64") {
        SimdLevel::Neon
    } else {
        SimdLevel::Scalar
    }
}
