// SPDX-License-Identifier: MPL-2.0

use std::{error::Error, fmt};

/// Errors that abort a patch or revert.
///
/// None of them is transient: the input is malformed and retrying the same
/// operation yields the same error. When an error is returned no output
/// buffer exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchError {
    /// The kernel does not carry a recognizable entry branch, or a revert was
    /// requested on an image that was never patched.
    Format(String),
    /// The stub payload does not look like a stub.
    Validation(String),
    /// The output buffer of the given size could not be allocated.
    Allocation(usize),
}

impl fmt::Display for PatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatchError::Format(msg) => write!(f, "Invalid kernel image: {}", msg),
            PatchError::Validation(msg) => write!(f, "Invalid stub payload: {}", msg),
            PatchError::Allocation(size) => {
                write!(f, "Failed to allocate an output buffer of {:#x} bytes", size)
            }
        }
    }
}

impl From<PatchError> for String {
    fn from(err: PatchError) -> Self {
        err.to_string()
    }
}

impl Error for PatchError {}

pub type Result<T> = core::result::Result<T, PatchError>;
