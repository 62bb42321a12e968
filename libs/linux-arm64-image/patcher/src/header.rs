// SPDX-License-Identifier: MPL-2.0

//! The ARM64 Linux Image header, as far as the patcher is concerned.
//!
//! The layout of a stock header is in the Linux documentation
//! `Documentation/arch/arm64/booting.rst`. The patcher repurposes the three
//! reserved 64-bit fields to hand the stack of the firmware and the size of
//! the kernel to the stub.

use zerocopy::{
    FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned,
    little_endian::{U32, U64},
};

/// The size of the header window at the start of the (unwrapped) kernel.
pub const HEADER_WINDOW_SIZE: usize = 0x40;

/// The size of one AArch64 instruction slot.
pub const INSTRUCTION_SIZE: usize = 4;

/// The magic stored in bytes [0, 2) of an image with an EFI stub.
pub const MZ_MAGIC: u16 = 0x5a4d; // "MZ"

#[derive(FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned, Clone, Copy, Debug)]
#[repr(C)]
pub struct ImageHeader {
    pub code0: U32,       /* 0x00, executable code */
    pub code1: U32,       /* 0x04, executable code */
    pub text_offset: U64, /* 0x08, image load offset */
    pub image_size: U64,  /* 0x10, effective image size */
    pub flags: U64,       /* 0x18, kernel flags */
    pub stack_base: U64,  /* 0x20, reserved, firmware stack base when patched */
    pub stack_size: U64,  /* 0x28, reserved, firmware stack size when patched */
    pub kernel_size: U64, /* 0x30, reserved, kernel size when patched */
    pub magic: U32,       /* 0x38, "ARM\x64" */
    pub res5: U32,        /* 0x3c, PE header offset */
}

const _: () = assert!(size_of::<ImageHeader>() == HEADER_WINDOW_SIZE);

impl ImageHeader {
    /// Views the header at the start of `image`.
    ///
    /// Returns `None` if `image` is shorter than the header window.
    pub fn from_image(image: &[u8]) -> Option<&Self> {
        Self::ref_from_prefix(image).ok().map(|(header, _)| header)
    }

    /// Mutably views the header at the start of `image`.
    pub fn from_image_mut(image: &mut [u8]) -> Option<&mut Self> {
        Self::mut_from_prefix(image).ok().map(|(header, _)| header)
    }
}

/// The two instruction slots at the start of the image.
///
/// Unlike [`ImageHeader`], this only needs the image to be 8 bytes long.
#[derive(FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned, Clone, Copy, Debug)]
#[repr(C)]
pub struct EntrySlots {
    pub code0: U32,
    pub code1: U32,
}

impl EntrySlots {
    pub fn from_image_mut(image: &mut [u8]) -> Option<&mut Self> {
        Self::mut_from_prefix(image).ok().map(|(slots, _)| slots)
    }
}
