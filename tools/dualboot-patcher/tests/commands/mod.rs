// SPDX-License-Identifier: MPL-2.0

mod patch;
mod revert;
