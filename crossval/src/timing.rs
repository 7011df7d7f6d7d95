//! Cold/hot timing harness.
//!
//! Warm-up iterations run first and are discarded, then the hot loop runs
//! with a stream synchronize on each side of the clock, so queued work
//! never leaks into or out of the measured window.

use anyhow::Result;
use oxblas_kernels::Handle;
use serde::Serialize;
use std::time::Instant;

/// One timed measurement, serialized into performance reports.
#[derive(Debug, Clone, Serialize)]
pub struct PerfRecord {
    pub function: String,
    /// Mean wall time per hot iteration, microseconds.
    pub us_per_iter: f64,
    /// Wall time of one host-oracle evaluation, microseconds.
    pub cpu_us: Option<f64>,
    pub gflops: Option<f64>,
    pub gbytes_per_sec: Option<f64>,
    pub iters: u32,
    pub cold_iters: u32,
    /// Build capability summary the numbers were taken under.
    pub kernel_caps: String,
}

/// Times `launch` over `cold_iters` discarded and `iters` measured runs.
///
/// Returns the mean hot-iteration time in microseconds. `iters` of zero
/// reports zero rather than dividing by it.
pub fn time_kernel<F>(
    handle: &Handle,
    cold_iters: u32,
    iters: u32,
    mut launch: F,
) -> Result<f64>
where
    F: FnMut() -> Result<()>,
{
    for _ in 0..cold_iters {
        launch()?;
    }
    handle.stream().synchronize();
    let start = Instant::now();
    for _ in 0..iters {
        launch()?;
    }
    handle.stream().synchronize();
    let elapsed = start.elapsed();
    if iters == 0 {
        return Ok(0.0);
    }
    Ok(elapsed.as_secs_f64() * 1e6 / iters as f64)
}

impl PerfRecord {
    /// Assembles a record from a measured mean and optional work counts.
    pub fn new(
        handle: &Handle,
        function: &str,
        us_per_iter: f64,
        iters: u32,
        cold_iters: u32,
        cpu_us: Option<f64>,
        gflop_count: Option<f64>,
        gbyte_count: Option<f64>,
    ) -> Self {
        let secs = us_per_iter / 1e6;
        let rate = |work: f64| if secs > 0.0 { Some(work / secs) } else { None };
        PerfRecord {
            function: function.to_string(),
            us_per_iter,
            cpu_us,
            gflops: gflop_count.and_then(rate),
            gbytes_per_sec: gbyte_count.and_then(rate),
            iters,
            cold_iters,
            kernel_caps: handle.caps().summary(),
        }
    }
}
