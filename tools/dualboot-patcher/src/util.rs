// SPDX-License-Identifier: MPL-2.0

use std::{fs, path::Path, process};

use crate::{error::Errno, error_msg};

/// Reads the whole file at `path`, or exits if it cannot be read.
pub fn read_file(path: impl AsRef<Path>) -> Vec<u8> {
    let path = path.as_ref();
    match fs::read(path) {
        Ok(content) => {
            debug!("Read {:#x} bytes from {}", content.len(), path.display());
            content
        }
        Err(e) => {
            error_msg!("Failed to read {}: {}", path.display(), e);
            process::exit(Errno::InputNotFound as _);
        }
    }
}

/// Writes `content` to `path`, replacing the file if it exists, or exits.
pub fn write_file(path: impl AsRef<Path>, content: &[u8]) {
    let path = path.as_ref();
    if let Err(e) = fs::write(path, content) {
        error_msg!("Failed to write {}: {}", path.display(), e);
        process::exit(Errno::WriteOutput as _);
    }
    debug!("Wrote {:#x} bytes to {}", content.len(), path.display());
}
