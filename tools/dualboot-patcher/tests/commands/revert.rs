// SPDX-License-Identifier: MPL-2.0

use std::{ffi::OsStr, fs};

use crate::util::*;

#[test]
fn patch_then_revert() {
    let dir = fixture_dir("patch_then_revert");
    let kernel = bare_kernel(0x4000, 0x812);
    let fixture = PatchFixture::new(&dir, &kernel, &[0x3c; 0x2000], &stub(&[]));
    assert_success(&dualboot_patcher(fixture.args()).output().unwrap());

    let reverted = dir.join("Image.reverted");
    let args = [OsStr::new("revert"), fixture.output.as_os_str(), reverted.as_os_str()];
    let output = dualboot_patcher(args).output().unwrap();
    assert_success(&output);
    assert_stdout_contains_msg(&output, "Patch successfully removed");
    assert_eq!(fs::read(&reverted).unwrap(), kernel);
}

#[test]
fn revert_wrapped_kernel_with_alias() {
    let dir = fixture_dir("revert_wrapped_kernel_with_alias");
    let kernel = wrap(&bare_kernel(0x1000, 0x20));
    let fixture = PatchFixture::new(&dir, &kernel, &[0x3c; 0x100], &stub(&[]));
    assert_success(&dualboot_patcher(fixture.args()).output().unwrap());

    let reverted = dir.join("Image.reverted");
    let args = [OsStr::new("remove"), fixture.output.as_os_str(), reverted.as_os_str()];
    let output = dualboot_patcher(args).output().unwrap();
    assert_success(&output);
    assert_eq!(fs::read(&reverted).unwrap(), kernel);
}

#[test]
fn revert_unpatched_kernel() {
    let dir = fixture_dir("revert_unpatched_kernel");
    let kernel = dir.join("Image");
    fs::write(&kernel, bare_kernel(0x100, 0x10)).unwrap();

    let reverted = dir.join("Image.reverted");
    let args = [OsStr::new("revert"), kernel.as_os_str(), reverted.as_os_str()];
    let output = dualboot_patcher(args).output().unwrap();
    assert_exit_code(&output, 4);
    assert!(!reverted.exists());
}
