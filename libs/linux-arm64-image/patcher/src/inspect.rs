// SPDX-License-Identifier: MPL-2.0

use std::fmt;

use crate::{
    detect::{KernelFormat, detect_format},
    header::ImageHeader,
    window::{WRAPPER_HEADER_SIZE, WrapperHeader},
};

/// What the patcher would see in an image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReport {
    /// The body size stored in the `UNCOMPRESSED_IMG` wrapper, if any.
    pub wrapped_size: Option<u32>,
    pub format: KernelFormat,
    /// The header fields written by the patcher. Only filled in for patched
    /// images that are long enough to hold them.
    pub patch: Option<PatchRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatchRecord {
    pub stack_base: u64,
    pub stack_size: u64,
    pub kernel_size: u64,
}

pub fn inspect_image(image: &[u8]) -> ImageReport {
    let wrapped_size = WrapperHeader::detect(image).map(|wrapper| wrapper.size.get());
    let body = if wrapped_size.is_some() {
        &image[WRAPPER_HEADER_SIZE..]
    } else {
        image
    };

    let format = detect_format(body);
    let patch = match format {
        KernelFormat::AlreadyPatched => ImageHeader::from_image(body).map(|header| PatchRecord {
            stack_base: header.stack_base.get(),
            stack_size: header.stack_size.get(),
            kernel_size: header.kernel_size.get(),
        }),
        _ => None,
    };

    ImageReport {
        wrapped_size,
        format,
        patch,
    }
}

impl fmt::Display for ImageReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.wrapped_size {
            Some(size) => writeln!(f, "UNCOMPRESSED_IMG header: body of {:#x} bytes", size)?,
            None => writeln!(f, "UNCOMPRESSED_IMG header: none")?,
        }
        let format = match self.format {
            KernelFormat::AlreadyPatched => "patched",
            KernelFormat::EfiStub => "EFI stub",
            KernelFormat::BareUnpatched(_) => "unpatched",
            KernelFormat::Invalid => "not a kernel image",
        };
        write!(f, "Format: {}", format)?;
        if let Some(record) = &self.patch {
            writeln!(f)?;
            writeln!(f, "Stack base: {:#x}", record.stack_base)?;
            writeln!(f, "Stack size: {:#x}", record.stack_size)?;
            write!(f, "Kernel size: {:#x}", record.kernel_size)?;
        }
        Ok(())
    }
}
