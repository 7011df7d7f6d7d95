//! Cross-validation harness.
//!
//! Drives every routine through the same protocol a hardware-backed build
//! would face: seeded inputs, one host-oracle run, one device run per
//! pointer mode, numeric scoring (exact, tolerance, or norm), and optional
//! cold/hot timing. Cases are flat [`arguments::Arguments`] records, so a
//! failing case is one JSON line that replays by itself.

pub mod arguments;
pub mod bytes;
pub mod compare;
pub mod dispatch;
pub mod flops;
pub mod init;
pub mod report;
pub mod testing;
pub mod timing;

pub use arguments::{Arguments, Initialization};
pub use dispatch::run_case;
pub use report::{TestOutcome, TestReport};
