// SPDX-License-Identifier: MPL-2.0

use std::process;

use linux_arm64_image_patcher::remove_patch;

use crate::{
    cli::RevertArgs,
    error::Errno,
    error_msg,
    util::{read_file, write_file},
};

pub fn execute_revert_command(args: &RevertArgs) {
    let patched = read_file(&args.patched);

    let kernel = match remove_patch(&patched) {
        Ok(kernel) => kernel,
        Err(e) => {
            error_msg!("Error removing patch: {}", e);
            process::exit(Errno::RemovePatch as _);
        }
    };

    write_file(&args.output, &kernel);

    info!("Patch successfully removed");
    info!(
        "Please check the unpatched kernel image at {}",
        args.output.display()
    );
}
