// SPDX-License-Identifier: MPL-2.0

//! The patch config file.
//!
//! The file holds one `Key=HexValue` pair per line, e.g.
//!
//! ```text
//! StackBase=9FC00000
//! StackSize=0x300000
//! ```
//!
//! Unknown keys are ignored and missing keys default to zero.

use std::{path::Path, process};

use linux_arm64_image_patcher::PatchConfig;
use regex::Regex;

use crate::{error::Errno, error_msg, util::read_file};

const STACK_BASE_KEY: &str = "StackBase";
const STACK_SIZE_KEY: &str = "StackSize";

/// Loads the config file at `path`, or exits if it cannot be read.
pub fn load_config(path: impl AsRef<Path>) -> PatchConfig {
    let path = path.as_ref();
    let content = read_file(path);
    let Ok(content) = String::from_utf8(content) else {
        error_msg!("Config file {} is not valid UTF-8", path.display());
        process::exit(Errno::ParseConfig as _);
    };
    parse_config(&content)
}

/// Parses the content of a config file. Malformed lines are skipped.
pub fn parse_config(content: &str) -> PatchConfig {
    let kv_pattern = Regex::new(r"^\s*([A-Za-z_][A-Za-z0-9_]*)\s*=\s*(?:0[xX])?([0-9A-Fa-f]+)\s*$")
        .unwrap();

    let mut config = PatchConfig::default();
    for (line_no, line) in content.lines().enumerate() {
        if line.trim().is_empty() || line.trim_start().starts_with('#') {
            continue;
        }

        let Some(captures) = kv_pattern.captures(line) else {
            warn!("Skipping malformed config line {}: {:?}", line_no + 1, line);
            continue;
        };
        let key = &captures[1];
        let Ok(value) = u64::from_str_radix(&captures[2], 16) else {
            warn!(
                "Skipping config line {}: value of `{}` does not fit in 64 bits",
                line_no + 1,
                key
            );
            continue;
        };

        match key {
            STACK_BASE_KEY => config.stack_base = value,
            STACK_SIZE_KEY => config.stack_size = value,
            _ => debug!("Ignoring unknown config key `{}`", key),
        }
    }

    debug!("Patch config: {:x?}", config);
    config
}
