// SPDX-License-Identifier: MPL-2.0

use std::fs;

use crate::util::*;

#[test]
fn patch_bare_kernel() {
    let dir = fixture_dir("patch_bare_kernel");
    let kernel = bare_kernel(0x2000, 0x400);
    let firmware = vec![0xfd; 0x1000];
    let fixture = PatchFixture::new(&dir, &kernel, &firmware, &stub(&[0xaa; 0x20]));

    let output = dualboot_patcher(fixture.args()).output().unwrap();
    assert_success(&output);
    assert_stdout_contains_msg(&output, "Image successfully patched");

    let patched = fs::read(&fixture.output).unwrap();
    assert_eq!(patched.len(), 0x3000);
    assert_eq!(patched[..4], [0x01u8, 0x00, 0x00, 0x14]);
    assert_eq!(patched[4..8], [0xffu8, 0x03, 0x00, 0x14]);
    assert_eq!(read_u64(&patched, 0x20), STACK_BASE);
    assert_eq!(read_u64(&patched, 0x28), STACK_SIZE);
    assert_eq!(read_u64(&patched, 0x30), 0x2000);
    assert_eq!(patched[0x40..0x60], [0xaau8; 0x20]);
    assert_eq!(patched[0x2000..], firmware[..]);
}

#[test]
fn patch_wrapped_kernel() {
    let dir = fixture_dir("patch_wrapped_kernel");
    let kernel = wrap(&bare_kernel(0x1004, 0x100));
    let fixture = PatchFixture::new(&dir, &kernel, &[0x5a; 0x80], &stub(&[]));

    let output = dualboot_patcher(fixture.args()).output().unwrap();
    assert_success(&output);
    assert_stdout_contains_msg(&output, "UNCOMPRESSED_IMG");

    let patched = fs::read(&fixture.output).unwrap();
    assert_eq!(patched[..16], *b"UNCOMPRESSED_IMG");
    let stored = u32::from_le_bytes(patched[0x10..0x14].try_into().unwrap());
    assert_eq!(stored, 0x1010 + 0x80);
    assert_eq!(read_u64(&patched, 0x14 + 0x30), 0x1010);
    assert_eq!(patched.len(), 0x14 + 0x1010 + 0x80);
}

#[test]
fn invalid_kernel_writes_nothing() {
    let dir = fixture_dir("invalid_kernel_writes_nothing");
    let fixture = PatchFixture::new(&dir, &[0u8; 0x100], &[0; 0x10], &stub(&[]));

    let output = dualboot_patcher(fixture.args()).output().unwrap();
    assert_exit_code(&output, 3);
    assert_stdout_contains_msg(&output, "[Error]");
    assert!(!fixture.output.exists());
}

#[test]
fn untagged_stub_writes_nothing() {
    let dir = fixture_dir("untagged_stub_writes_nothing");
    let fixture = PatchFixture::new(&dir, &bare_kernel(0x100, 0x10), &[0; 0x100], &[0; 0x48]);

    let output = dualboot_patcher(fixture.args()).output().unwrap();
    assert_exit_code(&output, 3);
    assert!(!fixture.output.exists());
}

#[test]
fn missing_input() {
    let dir = fixture_dir("missing_input");
    let fixture = PatchFixture::new(&dir, &bare_kernel(0x100, 0x10), &[0; 0x10], &stub(&[]));
    fs::remove_file(&fixture.firmware).unwrap();

    let output = dualboot_patcher(fixture.args()).output().unwrap();
    assert_exit_code(&output, 1);
    assert!(!fixture.output.exists());
}

#[test]
fn wrong_argument_count() {
    let output = dualboot_patcher(["patch", "Image", "UEFI.fd"]).output().unwrap();
    assert!(!output.status.success());
}
