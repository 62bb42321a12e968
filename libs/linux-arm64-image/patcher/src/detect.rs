// SPDX-License-Identifier: MPL-2.0

//! Classification of a kernel by its first two instruction slots.
//!
//! A stock ARM64 Image branches to its entry point from one of the first two
//! instructions. A patched image branches from both: the first one into the
//! stub and the second one into the kernel. The wrapper is orthogonal to all
//! of this and is handled by [`crate::window`].

use crate::{
    branch::is_branch,
    header::{INSTRUCTION_SIZE, MZ_MAGIC},
};

/// The instruction slot that holds the entry branch of an unpatched kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntrySlot {
    /// `code0`. The branch has to move to `code1` to make room for the stub.
    First,
    /// `code1`. The branch can stay where it is.
    Second,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelFormat {
    /// Both slots branch: the image went through the patcher before.
    AlreadyPatched,
    /// The image starts with "MZ" and branches from the second slot.
    EfiStub,
    /// Exactly one slot branches.
    BareUnpatched(EntrySlot),
    /// No slot branches.
    Invalid,
}

/// Classifies the unwrapped kernel `image`.
///
/// Only the first two instruction slots are looked at. An image that is too
/// short to hold them is [`KernelFormat::Invalid`].
pub fn detect_format(image: &[u8]) -> KernelFormat {
    if image.len() < 2 * INSTRUCTION_SIZE {
        return KernelFormat::Invalid;
    }
    let first = is_branch(&image[..INSTRUCTION_SIZE]);
    let second = is_branch(&image[INSTRUCTION_SIZE..2 * INSTRUCTION_SIZE]);

    match (first, second) {
        (true, true) => KernelFormat::AlreadyPatched,
        (false, true) if image[..2] == MZ_MAGIC.to_le_bytes() => KernelFormat::EfiStub,
        (true, false) => KernelFormat::BareUnpatched(EntrySlot::First),
        (false, true) => KernelFormat::BareUnpatched(EntrySlot::Second),
        (false, false) => KernelFormat::Invalid,
    }
}
