// SPDX-License-Identifier: MPL-2.0

//! Taking the firmware and the stub entry out of a patched kernel.

use log::info;

use crate::{
    branch::relocate_branch,
    detect::{KernelFormat, detect_format},
    error::{PatchError, Result},
    header::{EntrySlots, INSTRUCTION_SIZE, ImageHeader},
    window::{ImageWindow, WRAPPER_HEADER_SIZE, WrapperHeader},
};

/// Restores the kernel that `patched` was built from.
///
/// The firmware is cut off at the kernel size recorded in the header, the
/// entry branch is moved back to the first slot and the reserved header
/// fields used by the patcher are zeroed again. The stub payload is left in
/// place, so a kernel only comes back byte-for-byte if it was patched with
/// an empty stub payload. The values the reserved fields held before the
/// patch are not recoverable.
pub fn remove_patch(patched: &[u8]) -> Result<Vec<u8>> {
    let wrapped = WrapperHeader::detect(patched).is_some();
    let base = if wrapped {
        info!("Kernel has UNCOMPRESSED_IMG header");
        WRAPPER_HEADER_SIZE
    } else {
        0
    };
    let body = &patched[base..];

    let header = ImageHeader::from_image(body).ok_or_else(|| {
        PatchError::Format("image is too short to carry a patched header".to_string())
    })?;
    let recorded = header.kernel_size.get();
    let kernel_len = usize::try_from(recorded)
        .ok()
        .filter(|size| (2 * INSTRUCTION_SIZE..=body.len()).contains(size))
        .ok_or_else(|| {
            PatchError::Format(format!(
                "recorded kernel size {:#x} does not fit in the {:#x}-byte image",
                recorded,
                body.len()
            ))
        })?;

    let len = base + kernel_len;
    let mut storage = Vec::new();
    storage
        .try_reserve_exact(len)
        .map_err(|_| PatchError::Allocation(len))?;
    storage.extend_from_slice(&patched[..len]);
    let mut window = ImageWindow::new(storage, len, wrapped);

    if detect_format(window.body()) != KernelFormat::AlreadyPatched {
        return Err(PatchError::Format(
            "patched kernel signature not found".to_string(),
        ));
    }
    info!("Patched kernel detected");

    let slots = EntrySlots::from_image_mut(window.body_mut()).ok_or_else(|| {
        PatchError::Format("kernel is shorter than two instructions".to_string())
    })?;
    // The entry branch moves one slot back.
    let entry = relocate_branch(slots.code1.get(), 1)?;
    slots.code0.set(entry);
    slots.code1.set(0);

    if let Some(header) = window.header_mut() {
        header.stack_base.set(0);
        header.stack_size.set(0);
        header.kernel_size.set(0);
    }

    window.rewrap()?;
    Ok(window.into_vec())
}
