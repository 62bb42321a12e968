// SPDX-License-Identifier: MPL-2.0

//! Laying out the kernel and the firmware in the output buffer.
//!
//! The stub jumps over the kernel to reach the firmware, which must start
//! on a [`KERNEL_ALIGNMENT`] boundary. The kernel is therefore padded with
//! zeros when its length is not a multiple of the alignment.

use log::debug;

use crate::error::{PatchError, Result};

pub const KERNEL_ALIGNMENT: usize = 16;

/// Returns the number of zero bytes to put after a kernel of `len` bytes.
pub fn padding_for(len: usize) -> usize {
    (KERNEL_ALIGNMENT - len % KERNEL_ALIGNMENT) % KERNEL_ALIGNMENT
}

/// The output buffer with the kernel and the firmware in place.
#[derive(Debug)]
pub struct Assembled {
    /// At least `len` bytes. Bytes past `len` are zero.
    pub storage: Vec<u8>,
    /// The length of the image, i.e., prefix, padded kernel and firmware.
    pub len: usize,
    /// The length of the kernel, including the padding.
    pub kernel_len: usize,
}

/// Builds `prefix || kernel || zero padding || firmware`.
///
/// The final size is computed up front and allocated once. `min_storage`
/// makes the buffer at least that long, zero-filled past the image.
pub fn assemble(
    prefix: &[u8],
    kernel: &[u8],
    firmware: &[u8],
    min_storage: usize,
) -> Result<Assembled> {
    let padding = padding_for(kernel.len());
    let kernel_len = kernel.len() + padding;
    let len = [prefix.len(), kernel_len, firmware.len()]
        .into_iter()
        .try_fold(0usize, usize::checked_add)
        .ok_or(PatchError::Allocation(usize::MAX))?;
    let storage_len = len.max(min_storage);

    let mut storage = Vec::new();
    storage
        .try_reserve_exact(storage_len)
        .map_err(|_| PatchError::Allocation(storage_len))?;

    storage.extend_from_slice(prefix);
    storage.extend_from_slice(kernel);
    if padding != 0 {
        debug!(
            "Padding the kernel with {} byte(s) to a {}-byte boundary",
            padding, KERNEL_ALIGNMENT
        );
        storage.resize(prefix.len() + kernel_len, 0);
    }
    storage.extend_from_slice(firmware);
    storage.resize(storage_len, 0);

    Ok(Assembled {
        storage,
        len,
        kernel_len,
    })
}
