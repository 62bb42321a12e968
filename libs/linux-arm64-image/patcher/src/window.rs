// SPDX-License-Identifier: MPL-2.0

//! The optional `UNCOMPRESSED_IMG` wrapper and an owned view that hides it.
//!
//! Some vendor boot chains expect the kernel to be prefixed by a 0x14-byte
//! wrapper: a 16-byte ASCII tag followed by the length of the wrapped body
//! as a little-endian `u32`. All header offsets of the patcher are relative
//! to the wrapped body, so [`ImageWindow`] keeps the wrapper out of the way
//! by addressing the buffer from a base offset instead of moving pointers.

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned, little_endian::U32};

use crate::{
    error::{PatchError, Result},
    header::ImageHeader,
};

pub const WRAPPER_MAGIC: &[u8; 16] = b"UNCOMPRESSED_IMG";

pub const WRAPPER_HEADER_SIZE: usize = 0x14;

#[derive(FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned, Clone, Copy, Debug)]
#[repr(C)]
pub struct WrapperHeader {
    pub magic: [u8; 16], /* 0x00, "UNCOMPRESSED_IMG" */
    pub size: U32,       /* 0x10, length of the wrapped body */
}

const _: () = assert!(size_of::<WrapperHeader>() == WRAPPER_HEADER_SIZE);

impl WrapperHeader {
    /// Returns the wrapper at the start of `image`, if there is one.
    pub fn detect(image: &[u8]) -> Option<&Self> {
        let (wrapper, _) = Self::ref_from_prefix(image).ok()?;
        (&wrapper.magic == WRAPPER_MAGIC).then_some(wrapper)
    }
}

/// An owned image buffer addressed relative to the wrapped body.
///
/// The buffer may be longer than the image itself, i.e., `storage` covers
/// at least `len` bytes. Bytes past `len` are scratch space that keeps
/// header writes in bounds for images shorter than their header window.
#[derive(Debug)]
pub struct ImageWindow {
    storage: Vec<u8>,
    base: usize,
    len: usize,
}

impl ImageWindow {
    /// Takes over `storage`, whose first `len` bytes are the image.
    ///
    /// If `wrapped`, the first [`WRAPPER_HEADER_SIZE`] bytes are the wrapper.
    pub fn new(storage: Vec<u8>, len: usize, wrapped: bool) -> Self {
        debug_assert!(len <= storage.len());
        let base = if wrapped { WRAPPER_HEADER_SIZE } else { 0 };
        debug_assert!(base <= len);
        Self { storage, base, len }
    }

    pub fn is_wrapped(&self) -> bool {
        self.base != 0
    }

    /// The image without the wrapper.
    pub fn body(&self) -> &[u8] {
        &self.storage[self.base..self.len]
    }

    pub fn body_mut(&mut self) -> &mut [u8] {
        &mut self.storage[self.base..self.len]
    }

    /// The unwrapped body followed by the scratch space.
    pub fn window(&self) -> &[u8] {
        &self.storage[self.base..]
    }

    pub fn window_mut(&mut self) -> &mut [u8] {
        &mut self.storage[self.base..]
    }

    pub fn header(&self) -> Option<&ImageHeader> {
        ImageHeader::from_image(self.window())
    }

    pub fn header_mut(&mut self) -> Option<&mut ImageHeader> {
        ImageHeader::from_image_mut(self.window_mut())
    }

    /// Stores the current body length into the wrapper, if there is one.
    pub fn rewrap(&mut self) -> Result<()> {
        if !self.is_wrapped() {
            return Ok(());
        }
        let body_len = self.body().len();
        let size = u32::try_from(body_len).map_err(|_| {
            PatchError::Format(format!(
                "body of {:#x} bytes does not fit in the UNCOMPRESSED_IMG header",
                body_len
            ))
        })?;
        let (wrapper, _) = WrapperHeader::mut_from_prefix(&mut self.storage[..])
            .map_err(|_| PatchError::Format("truncated UNCOMPRESSED_IMG header".to_string()))?;
        wrapper.size.set(size);
        Ok(())
    }

    /// The whole image, including the wrapper.
    pub fn as_bytes(&self) -> &[u8] {
        &self.storage[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drops the scratch space and returns the image, including the wrapper.
    pub fn into_vec(mut self) -> Vec<u8> {
        self.storage.truncate(self.len);
        self.storage
    }
}
