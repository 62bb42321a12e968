// SPDX-License-Identifier: MPL-2.0

/// The process exit codes.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Errno {
    InputNotFound = 1,
    ParseConfig = 2,
    PatchKernel = 3,
    RemovePatch = 4,
    WriteOutput = 5,
}

/// Print error message to console
#[macro_export]
macro_rules! error_msg {
    () => {{
        println!("[Error]:")
    }};
    ($($arg:tt)*) => {{
        println!("[Error]: {}", format_args!($($arg)*))
    }};
}
