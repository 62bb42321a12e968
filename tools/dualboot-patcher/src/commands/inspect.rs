// SPDX-License-Identifier: MPL-2.0

use linux_arm64_image_patcher::inspect_image;

use crate::{cli::InspectArgs, util::read_file};

pub fn execute_inspect_command(args: &InspectArgs) {
    let image = read_file(&args.image);
    let report = inspect_image(&image);
    println!("{}", report);
}
