//! Library handle and scalar argument plumbing.

use crate::check_numerics::CheckNumericsMode;
use crate::device::{DeviceBuffer, DeviceScalar, Stream};
use crate::registry::KernelCaps;
use oxblas_common::{Error, PointerMode, Result, Scalar};

/// Per-context state every routine call threads through.
///
/// Owns the execution stream, the scalar pointer mode, and the numeric
/// checking policy. Handles are cheap and independent; a test creates one
/// per case.
pub struct Handle {
    pointer_mode: PointerMode,
    check_numerics: CheckNumericsMode,
    stream: Stream,
    caps: KernelCaps,
}

impl Handle {
    pub fn new() -> Self {
        let caps = KernelCaps::from_compile_time();
        log::debug!("handle created: {}", caps.summary());
        Self {
            pointer_mode: PointerMode::Host,
            check_numerics: CheckNumericsMode::NoCheck,
            stream: Stream::default(),
            caps,
        }
    }

    pub fn pointer_mode(&self) -> PointerMode {
        self.pointer_mode
    }

    pub fn set_pointer_mode(&mut self, mode: PointerMode) {
        self.pointer_mode = mode;
    }

    pub fn check_numerics(&self) -> CheckNumericsMode {
        self.check_numerics
    }

    pub fn set_check_numerics(&mut self, mode: CheckNumericsMode) {
        self.check_numerics = mode;
    }

    pub fn stream(&self) -> &Stream {
        &self.stream
    }

    pub fn caps(&self) -> &KernelCaps {
        &self.caps
    }
}

impl Default for Handle {
    fn default() -> Self {
        Self::new()
    }
}

/// A scalar routine argument, resident wherever the handle's pointer mode
/// says scalars live.
pub enum ScalarArg<'a, T: Scalar> {
    Host(T),
    Device(&'a DeviceScalar<T>),
}

impl<T: Scalar> ScalarArg<'_, T> {
    /// Reads the scalar value, rejecting an argument passed in the wrong
    /// residence for `handle`'s pointer mode.
    pub(crate) fn resolve(&self, handle: &Handle, arg: &'static str) -> Result<T> {
        match (self, handle.pointer_mode()) {
            (ScalarArg::Host(v), PointerMode::Host) => Ok(*v),
            (ScalarArg::Device(d), PointerMode::Device) => Ok(d.get()),
            (_, expected) => Err(Error::PointerMode { arg, expected }),
        }
    }
}

/// Destination for a single reduction result (dot, nrm2, asum, iamax).
pub enum ResultArg<'a, T: Scalar> {
    Host(&'a mut T),
    Device(&'a mut DeviceScalar<T>),
}

impl<T: Scalar> ResultArg<'_, T> {
    pub(crate) fn check(&self, handle: &Handle, arg: &'static str) -> Result<()> {
        match (self, handle.pointer_mode()) {
            (ResultArg::Host(_), PointerMode::Host) => Ok(()),
            (ResultArg::Device(_), PointerMode::Device) => Ok(()),
            (_, expected) => Err(Error::PointerMode { arg, expected }),
        }
    }

    pub(crate) fn write(&mut self, value: T) {
        match self {
            ResultArg::Host(h) => **h = value,
            ResultArg::Device(d) => d.set(value),
        }
    }
}

/// Destination for batched reduction results, one per batch member.
pub enum ResultsArg<'a, T: Scalar> {
    Host(&'a mut [T]),
    Device(&'a mut DeviceBuffer<T>),
}

impl<T: Scalar> ResultsArg<'_, T> {
    pub(crate) fn check(
        &self,
        handle: &Handle,
        arg: &'static str,
        batch_count: i32,
    ) -> Result<()> {
        let len = match (self, handle.pointer_mode()) {
            (ResultsArg::Host(h), PointerMode::Host) => h.len(),
            (ResultsArg::Device(d), PointerMode::Device) => d.len(),
            (_, expected) => return Err(Error::PointerMode { arg, expected }),
        };
        if len < batch_count as usize {
            return Err(Error::SizeMismatch {
                arg,
                required: batch_count as usize,
                actual: len,
            });
        }
        Ok(())
    }

    pub(crate) fn write(&mut self, i: usize, value: T) {
        match self {
            ResultsArg::Host(h) => h[i] = value,
            ResultsArg::Device(d) => d.as_mut_slice()[i] = value,
        }
    }
}
