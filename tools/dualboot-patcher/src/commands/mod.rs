// SPDX-License-Identifier: MPL-2.0

//! This module contains subcommands of dualboot-patcher.

mod inspect;
mod patch;
mod revert;

pub use self::{
    inspect::execute_inspect_command, patch::execute_patch_command,
    revert::execute_revert_command,
};
