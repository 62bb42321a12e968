// SPDX-License-Identifier: MPL-2.0

//! Building dual-boot ARM64 kernel images.
//!
//! [`patch_kernel`] appends a firmware payload to an ARM64 Linux Image and
//! makes the image branch into a small stub before the kernel entry. The
//! stub finds the firmware right after the kernel, using the kernel size
//! recorded in the image header, and decides which of the two to boot.
//! [`remove_patch`] turns a patched image back into a plain one.
//!
//! Three flavours of input are understood: a bare Image, an Image with an
//! EFI stub, and either of them wrapped in a vendor `UNCOMPRESSED_IMG`
//! header. Everything operates on byte slices; reading and writing files is
//! left to the caller.

pub mod align;
pub mod branch;
pub mod detect;
mod error;
pub mod header;
mod inspect;
pub mod patch;
mod remove;
pub mod window;

pub use self::{
    detect::{EntrySlot, KernelFormat, detect_format},
    error::{PatchError, Result},
    inspect::{ImageReport, PatchRecord, inspect_image},
    patch::{PatchConfig, PatchedImage, patch_kernel},
    remove::remove_patch,
};
