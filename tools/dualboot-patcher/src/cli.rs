// SPDX-License-Identifier: MPL-2.0

use std::path::PathBuf;

use clap::{Parser, crate_version};

use crate::commands::{execute_inspect_command, execute_patch_command, execute_revert_command};

pub fn main() {
    let cli = Cli::parse();
    info!("DualBoot Kernel Image Patcher v{}", crate_version!());

    match &cli.subcommand {
        PatcherSubcommand::Patch(args) => execute_patch_command(args),
        PatcherSubcommand::Revert(args) => execute_revert_command(args),
        PatcherSubcommand::Inspect(args) => execute_inspect_command(args),
    }
}

#[derive(Debug, Parser)]
#[clap(name = "dualboot-patcher", version = crate_version!())]
/// Build and undo dual-boot ARM64 kernel images
pub struct Cli {
    #[clap(subcommand)]
    subcommand: PatcherSubcommand,
}

#[derive(Debug, Parser)]
pub enum PatcherSubcommand {
    #[command(about = "Splice a firmware image and a stub into a kernel image")]
    Patch(PatchArgs),
    #[command(
        about = "Restore the kernel image a patched image was made from",
        visible_alias = "remove"
    )]
    Revert(RevertArgs),
    #[command(about = "Show how a kernel image would be treated")]
    Inspect(InspectArgs),
}

#[derive(Debug, Parser)]
pub struct PatchArgs {
    #[arg(name = "KERNEL", help = "The kernel image to patch")]
    pub kernel: PathBuf,
    #[arg(name = "FIRMWARE", help = "The firmware (e.g., UEFI FD) image to append")]
    pub firmware: PathBuf,
    #[arg(name = "OUTPUT", help = "Where to write the patched kernel image")]
    pub output: PathBuf,
    #[arg(name = "CONFIG", help = "The config file with `StackBase` and `StackSize`")]
    pub config: PathBuf,
    #[arg(name = "STUB", help = "The stub (shell code) file")]
    pub stub: PathBuf,
}

#[derive(Debug, Parser)]
pub struct RevertArgs {
    #[arg(name = "PATCHED", help = "The patched kernel image")]
    pub patched: PathBuf,
    #[arg(name = "OUTPUT", help = "Where to write the unpatched kernel image")]
    pub output: PathBuf,
}

#[derive(Debug, Parser)]
pub struct InspectArgs {
    #[arg(name = "IMAGE", help = "The kernel image to inspect")]
    pub image: PathBuf,
}
