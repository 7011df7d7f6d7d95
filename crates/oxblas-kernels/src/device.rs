//! Simulated device memory and streams.
//!
//! Device allocations are ordinary host allocations hidden behind a
//! transfer-only public API: code outside this crate moves data in and out
//! with explicit `transfer_*` calls, exactly as it would across a real bus.
//! Only the kernels in this crate touch the backing storage directly.

use oxblas_common::{Error, Result, Scalar};
use std::sync::atomic::{AtomicU64, Ordering};

/// A device-resident array of `len` elements.
pub struct DeviceBuffer<T: Scalar> {
    data: Vec<T>,
}

impl<T: Scalar> DeviceBuffer<T> {
    /// Allocates `len` elements, zero-initialized.
    ///
    /// Fails with [`Error::OutOfMemory`] instead of aborting when the
    /// allocation cannot be satisfied.
    pub fn new(len: usize) -> Result<Self> {
        let mut data = Vec::new();
        data.try_reserve_exact(len).map_err(|_| Error::OutOfMemory {
            bytes: len * std::mem::size_of::<T>(),
        })?;
        data.resize(len, T::ZERO);
        Ok(Self { data })
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Host-to-device copy. `host` must match the allocation exactly.
    pub fn transfer_from(&mut self, host: &[T]) -> Result<()> {
        if host.len() != self.data.len() {
            return Err(Error::SizeMismatch {
                arg: "transfer_from",
                required: self.data.len(),
                actual: host.len(),
            });
        }
        self.data.copy_from_slice(host);
        Ok(())
    }

    /// Device-to-host copy. `host` must match the allocation exactly.
    pub fn transfer_to(&self, host: &mut [T]) -> Result<()> {
        if host.len() != self.data.len() {
            return Err(Error::SizeMismatch {
                arg: "transfer_to",
                required: self.data.len(),
                actual: host.len(),
            });
        }
        host.copy_from_slice(&self.data);
        Ok(())
    }

    pub(crate) fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }
}

/// A single device-resident scalar, used for alpha/beta and reduction
/// results in device pointer mode.
pub struct DeviceScalar<T: Scalar> {
    value: T,
}

impl<T: Scalar> DeviceScalar<T> {
    pub fn new(value: T) -> Self {
        Self { value }
    }

    /// Host-to-device scalar copy.
    pub fn set(&mut self, value: T) {
        self.value = value;
    }

    /// Device-to-host scalar copy.
    pub fn get(&self) -> T {
        self.value
    }
}

impl<T: Scalar> Default for DeviceScalar<T> {
    fn default() -> Self {
        Self { value: T::ZERO }
    }
}

/// A batch of equally sized device buffers, the pointer-array layout of the
/// `_batched` routines.
pub struct DeviceBatch<T: Scalar> {
    bufs: Vec<DeviceBuffer<T>>,
}

impl<T: Scalar> DeviceBatch<T> {
    pub fn new(batch_count: usize, len: usize) -> Result<Self> {
        let mut bufs = Vec::new();
        bufs.try_reserve_exact(batch_count).map_err(|_| Error::OutOfMemory {
            bytes: batch_count * std::mem::size_of::<usize>(),
        })?;
        for _ in 0..batch_count {
            bufs.push(DeviceBuffer::new(len)?);
        }
        Ok(Self { bufs })
    }

    pub fn batch_count(&self) -> usize {
        self.bufs.len()
    }

    pub fn buf(&self, i: usize) -> &DeviceBuffer<T> {
        &self.bufs[i]
    }

    pub fn buf_mut(&mut self, i: usize) -> &mut DeviceBuffer<T> {
        &mut self.bufs[i]
    }

    /// Host-to-device copy of every member, one host slice per batch index.
    pub fn transfer_from(&mut self, host: &[Vec<T>]) -> Result<()> {
        if host.len() != self.bufs.len() {
            return Err(Error::SizeMismatch {
                arg: "batch transfer_from",
                required: self.bufs.len(),
                actual: host.len(),
            });
        }
        for (buf, h) in self.bufs.iter_mut().zip(host) {
            buf.transfer_from(h)?;
        }
        Ok(())
    }

    /// Device-to-host copy of every member.
    pub fn transfer_to(&self, host: &mut [Vec<T>]) -> Result<()> {
        if host.len() != self.bufs.len() {
            return Err(Error::SizeMismatch {
                arg: "batch transfer_to",
                required: self.bufs.len(),
                actual: host.len(),
            });
        }
        for (buf, h) in self.bufs.iter().zip(host) {
            buf.transfer_to(h)?;
        }
        Ok(())
    }
}

/// An in-order execution queue.
///
/// Kernels are synchronous here, so [`Stream::synchronize`] only fences the
/// launch counter; callers still must synchronize before reading results,
/// as they would on real hardware, and the timing harness relies on it.
#[derive(Default)]
pub struct Stream {
    launches: AtomicU64,
}

impl Stream {
    pub(crate) fn record_launch(&self) {
        self.launches.fetch_add(1, Ordering::Relaxed);
    }

    /// Blocks until all queued work has finished.
    pub fn synchronize(&self) {
        // All launches complete at enqueue time; the fence orders the
        // counter read against them.
        std::sync::atomic::fence(Ordering::SeqCst);
    }

    /// Number of kernel launches enqueued so far.
    pub fn launch_count(&self) -> u64 {
        self.launches.load(Ordering::Relaxed)
    }
}
