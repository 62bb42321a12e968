// SPDX-License-Identifier: MPL-2.0

use std::process;

use linux_arm64_image_patcher::patch_kernel;

use crate::{
    cli::PatchArgs,
    config::load_config,
    error::Errno,
    error_msg,
    util::{read_file, write_file},
};

pub fn execute_patch_command(args: &PatchArgs) {
    info!(
        "Patching {} with {} and saving to {}",
        args.kernel.display(),
        args.firmware.display(),
        args.output.display()
    );

    let kernel = read_file(&args.kernel);
    let firmware = read_file(&args.firmware);
    let config = load_config(&args.config);
    let stub = read_file(&args.stub);

    let patched = match patch_kernel(&kernel, &firmware, &stub, &config) {
        Ok(patched) => patched,
        Err(e) => {
            error_msg!("{}", e);
            process::exit(Errno::PatchKernel as _);
        }
    };
    info!(
        "Kernel occupies {:#x} bytes, firmware starts right after it",
        patched.kernel_size()
    );

    write_file(&args.output, patched.as_bytes());

    info!("Image successfully patched");
    info!(
        "Please find the newly made kernel image at {}",
        args.output.display()
    );
}
