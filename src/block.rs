//! Native memory block ownership.
//!
//! A `Block` owns one allocation obtained directly from the global allocator
//! and frees it when dropped. Ownership is explicit and exclusive: once a
//! block leaves the registry its memory is returned immediately, there is no
//! deferred collection.

use std::alloc::{alloc, dealloc, Layout};
use std::ptr::NonNull;

use tracing::debug;

/// Scaling factor: one requested unit is one MiB of native memory.
pub const BYTES_PER_UNIT: usize = 1024 * 1024;

/// Errors raised while obtaining native memory.
#[derive(Debug, thiserror::Error)]
pub enum AllocError {
    #[error("requested size overflows the address space: {units} MiB")]
    SizeOverflow { units: usize },

    #[error("allocator refused a {units} MiB request")]
    OutOfMemory { units: usize },
}

/// One simulated memory block: the requested size in units plus the backing
/// allocation. The block's contents are never initialized or read.
#[derive(Debug)]
pub struct Block {
    units: usize,
    ptr: Option<NonNull<u8>>,
    layout: Layout,
}

// The pointer is exclusively owned and the pointee is never accessed, so
// moving or sharing the handle across threads is sound.
unsafe impl Send for Block {}
unsafe impl Sync for Block {}

impl Block {
    /// Allocate `units` MiB from the global allocator.
    ///
    /// A zero-unit block is valid and holds no memory.
    pub fn allocate(units: usize) -> Result<Self, AllocError> {
        let bytes = units
            .checked_mul(BYTES_PER_UNIT)
            .ok_or(AllocError::SizeOverflow { units })?;

        if bytes == 0 {
            return Ok(Self {
                units,
                ptr: None,
                layout: Layout::new::<u8>(),
            });
        }

        let layout =
            Layout::array::<u8>(bytes).map_err(|_| AllocError::SizeOverflow { units })?;
        // SAFETY: layout has non-zero size.
        let raw = unsafe { alloc(layout) };
        let ptr = NonNull::new(raw).ok_or(AllocError::OutOfMemory { units })?;

        debug!(units, bytes, ptr = ?ptr, "allocated block");
        Ok(Self {
            units,
            ptr: Some(ptr),
            layout,
        })
    }

    /// The requested size in units, as passed to `allocate`.
    pub fn units(&self) -> usize {
        self.units
    }
}

impl Drop for Block {
    fn drop(&mut self) {
        if let Some(ptr) = self.ptr.take() {
            debug!(units = self.units, ptr = ?ptr, "freeing block");
            // SAFETY: ptr was returned by alloc with this exact layout and
            // has not been freed before (take() clears it).
            unsafe { dealloc(ptr.as_ptr(), self.layout) };
        }
    }
}
