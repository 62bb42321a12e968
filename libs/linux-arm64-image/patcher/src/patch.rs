// SPDX-License-Identifier: MPL-2.0

//! Splicing the firmware and the stub into a kernel.
//!
//! The patched image looks like this (offsets relative to the unwrapped
//! kernel):
//!
//! ```text
//! 0x00  b 0x04              ; into the stub entry slot
//! 0x04  b <kernel entry>    ; the original entry, re-targeted
//! 0x20  stack base          ; for the firmware
//! 0x28  stack size          ; for the firmware
//! 0x30  kernel size         ; how far to jump to reach the firmware
//! 0x40  stub payload
//! ...   kernel
//! ...   zero padding up to a 16-byte boundary
//! ...   firmware
//! ```

use log::{info, warn};

use crate::{
    align::{Assembled, assemble, padding_for},
    branch::relocate_branch,
    detect::{EntrySlot, KernelFormat, detect_format},
    error::{PatchError, Result},
    header::{HEADER_WINDOW_SIZE, INSTRUCTION_SIZE, ImageHeader},
    window::{ImageWindow, WRAPPER_HEADER_SIZE, WrapperHeader},
};

/// The stub header that is dropped when the stub is copied.
pub const STUB_HEADER_SIZE: usize = 0x40;

/// The tag a stub carries at [`STUB_MAGIC_OFFSET`].
pub const STUB_MAGIC: &[u8; 7] = b"SHLLCOD";

pub const STUB_MAGIC_OFFSET: usize = 8;

/// Firmware up to this size is accepted with an untagged stub.
pub const UNCHECKED_FIRMWARE_SIZE: usize = 0x40;

/// `b #+4`, which `code0` is replaced with.
pub const STUB_ENTRY_BRANCH: u32 = 0x1400_0001;

/// The values handed to the stub through the image header.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PatchConfig {
    pub stack_base: u64,
    pub stack_size: u64,
}

/// A kernel with the firmware and the stub spliced in.
#[derive(Debug)]
pub struct PatchedImage {
    window: ImageWindow,
    format: KernelFormat,
    kernel_size: usize,
}

impl PatchedImage {
    /// The image as it should be written out, including the wrapper if the
    /// input kernel had one.
    pub fn as_bytes(&self) -> &[u8] {
        self.window.as_bytes()
    }

    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    /// The unwrapped image, extended to cover at least the header window and
    /// the stub payload.
    ///
    /// Only differs from the unwrapped [`Self::as_bytes`] for kernels shorter
    /// than their header window.
    pub fn header_window(&self) -> &[u8] {
        self.window.window()
    }

    /// The format the input kernel was detected as.
    pub fn format(&self) -> KernelFormat {
        self.format
    }

    /// The length of the kernel in the image, including the alignment padding.
    pub fn kernel_size(&self) -> usize {
        self.kernel_size
    }

    pub fn is_wrapped(&self) -> bool {
        self.window.is_wrapped()
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.window.into_vec()
    }
}

/// Returns the part of `stub` that is copied into the kernel.
fn stub_payload(stub: &[u8], firmware_len: usize) -> Result<&[u8]> {
    if stub.len() < STUB_HEADER_SIZE {
        return Err(PatchError::Validation(format!(
            "stub of {:#x} bytes is shorter than its {:#x}-byte header",
            stub.len(),
            STUB_HEADER_SIZE
        )));
    }
    let magic = &stub[STUB_MAGIC_OFFSET..STUB_MAGIC_OFFSET + STUB_MAGIC.len()];
    if firmware_len > UNCHECKED_FIRMWARE_SIZE && magic != STUB_MAGIC {
        return Err(PatchError::Validation(
            "SHLLCOD tag not found in the stub header".to_string(),
        ));
    }
    Ok(&stub[STUB_HEADER_SIZE..])
}

/// Checks that the stub payload, copied to [`HEADER_WINDOW_SIZE`] of the
/// image, stays clear of the firmware placed at `kernel_len`.
fn check_payload_fits(payload_len: usize, kernel_len: usize, firmware_len: usize) -> Result<()> {
    let payload_end = HEADER_WINDOW_SIZE + payload_len;
    let firmware_end = kernel_len + firmware_len;
    if payload_len != 0
        && firmware_len != 0
        && HEADER_WINDOW_SIZE < firmware_end
        && kernel_len < payload_end
    {
        return Err(PatchError::Validation(format!(
            "stub payload [{:#x}, {:#x}) overlaps the firmware at [{:#x}, {:#x})",
            HEADER_WINDOW_SIZE, payload_end, kernel_len, firmware_end
        )));
    }
    Ok(())
}

/// Returns the kernel of an image that was patched before, i.e., drops the
/// firmware appended by the previous patch.
fn previously_patched_kernel(body: &[u8]) -> Result<&[u8]> {
    let header = ImageHeader::from_image(body).ok_or_else(|| {
        PatchError::Format("patched kernel is shorter than its header".to_string())
    })?;
    let recorded = header.kernel_size.get();
    usize::try_from(recorded)
        .ok()
        .filter(|size| (2 * INSTRUCTION_SIZE..=body.len()).contains(size))
        .map(|size| &body[..size])
        .ok_or_else(|| {
            PatchError::Format(format!(
                "recorded kernel size {:#x} does not fit in the {:#x}-byte image",
                recorded,
                body.len()
            ))
        })
}

/// Splices `firmware` and `stub` into `kernel`.
///
/// Neither input is modified. On error nothing is produced; the caller must
/// not write anything out.
pub fn patch_kernel(
    kernel: &[u8],
    firmware: &[u8],
    stub: &[u8],
    config: &PatchConfig,
) -> Result<PatchedImage> {
    let wrapped = WrapperHeader::detect(kernel).is_some();
    let (prefix, body) = if wrapped {
        info!("Kernel has UNCOMPRESSED_IMG header");
        kernel.split_at(WRAPPER_HEADER_SIZE)
    } else {
        (&kernel[..0], kernel)
    };

    let format = detect_format(body);
    match format {
        KernelFormat::Invalid => {
            return Err(PatchError::Format(
                "branch instruction not found within the first two instruction slots".to_string(),
            ));
        }
        KernelFormat::AlreadyPatched => info!("Patched kernel detected, replacing the firmware"),
        KernelFormat::EfiStub => {
            warn!("Kernel has an EFI stub, its entry branch is left unresolved")
        }
        KernelFormat::BareUnpatched(slot) => info!("Kernel entry branch found in {:?} slot", slot),
    }

    let payload = stub_payload(stub, firmware.len())?;

    let kernel_body = match format {
        KernelFormat::AlreadyPatched => previously_patched_kernel(body)?,
        _ => body,
    };
    check_payload_fits(
        payload.len(),
        kernel_body.len() + padding_for(kernel_body.len()),
        firmware.len(),
    )?;

    let min_storage = prefix.len() + HEADER_WINDOW_SIZE + payload.len();
    let Assembled {
        storage,
        len,
        kernel_len,
    } = assemble(prefix, kernel_body, firmware, min_storage)?;
    let mut window = ImageWindow::new(storage, len, wrapped);

    let header = window
        .header_mut()
        .ok_or(PatchError::Allocation(min_storage))?;
    if format == KernelFormat::BareUnpatched(EntrySlot::First) {
        // The entry branch moves one slot forward.
        let entry = relocate_branch(header.code0.get(), -1)?;
        header.code1.set(entry);
    }
    header.code0.set(STUB_ENTRY_BRANCH);
    header.stack_base.set(config.stack_base);
    header.stack_size.set(config.stack_size);
    header.kernel_size.set(kernel_len as u64);

    window.window_mut()[HEADER_WINDOW_SIZE..HEADER_WINDOW_SIZE + payload.len()]
        .copy_from_slice(payload);

    window.rewrap()?;

    Ok(PatchedImage {
        window,
        format,
        kernel_size: kernel_len,
    })
}
