//! Test case outcomes.

use crate::timing::PerfRecord;
use serde::Serialize;

/// The result of one executed test case.
#[derive(Debug, Clone, Serialize)]
pub struct TestReport {
    pub function: String,
    /// Frobenius relative error of the host-pointer-mode run, when a norm
    /// check was requested.
    pub norm_error_host: Option<f64>,
    /// Same for the device-pointer-mode run.
    pub norm_error_device: Option<f64>,
    pub perf: Option<PerfRecord>,
}

impl TestReport {
    pub fn new(function: &str) -> Self {
        TestReport {
            function: function.to_string(),
            norm_error_host: None,
            norm_error_device: None,
            perf: None,
        }
    }
}

/// What the dispatcher did with an argument record.
#[derive(Debug)]
pub enum TestOutcome {
    /// The datatype tuple was enabled and the case ran to a verdict.
    Ran(TestReport),
    /// The datatype tuple has no instantiation; the case is a no-op.
    Skipped,
    /// The function name matches no routine at all.
    Unsupported,
}

impl TestOutcome {
    pub fn is_skipped(&self) -> bool {
        matches!(self, TestOutcome::Skipped)
    }

    pub fn is_unsupported(&self) -> bool {
        matches!(self, TestOutcome::Unsupported)
    }

    /// The report of a case that ran; panics otherwise, so only tests
    /// should use it.
    pub fn unwrap_report(self) -> TestReport {
        match self {
            TestOutcome::Ran(report) => report,
            TestOutcome::Skipped => panic!("case was skipped"),
            TestOutcome::Unsupported => panic!("function is not supported"),
        }
    }
}
