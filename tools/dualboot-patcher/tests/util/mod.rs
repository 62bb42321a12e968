// SPDX-License-Identifier: MPL-2.0

//! The common utils for the binary tests

use std::{
    ffi::OsStr,
    fs,
    path::{Path, PathBuf},
    process::Output,
};

use assert_cmd::Command;

pub const STACK_BASE: u64 = 0x9fc0_0000;
pub const STACK_SIZE: u64 = 0x0030_0000;

pub fn dualboot_patcher<T: AsRef<OsStr>, I: IntoIterator<Item = T>>(args: I) -> Command {
    let mut command = Command::cargo_bin("dualboot-patcher").unwrap();
    command.env("RUST_LOG", "info");
    command.args(args);
    command
}

pub fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "Command output {:#?} seems failed, stdout:\n {}",
        output,
        String::from_utf8_lossy(&output.stdout)
    );
}

pub fn assert_exit_code(output: &Output, code: i32) {
    assert_eq!(
        output.status.code(),
        Some(code),
        "unexpected exit status, stdout:\n {}",
        String::from_utf8_lossy(&output.stdout)
    );
}

pub fn assert_stdout_contains_msg(output: &Output, msg: &str) {
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(msg), "{:?} not found in:\n{}", msg, stdout);
}

/// A fresh directory under `/tmp` for the fixtures of one test.
pub fn fixture_dir(name: &str) -> PathBuf {
    let dir = PathBuf::from("/tmp/dualboot-patcher-tests").join(name);
    if dir.exists() {
        fs::remove_dir_all(&dir).unwrap();
    }
    fs::create_dir_all(&dir).unwrap();
    dir
}

/// A stock kernel of `len` bytes that branches to `entry` from its first slot.
pub fn bare_kernel(len: usize, entry: u32) -> Vec<u8> {
    let mut kernel: Vec<u8> = (0..len).map(|i| (i % 251) as u8).collect();
    kernel[..4].copy_from_slice(&(0x1400_0000 | entry).to_le_bytes());
    kernel[4..8].fill(0);
    kernel[0x20..0x38].fill(0);
    kernel
}

pub fn stub(payload: &[u8]) -> Vec<u8> {
    let mut stub = vec![0u8; 0x40];
    stub[8..15].copy_from_slice(b"SHLLCOD");
    stub.extend_from_slice(payload);
    stub
}

pub fn wrap(body: &[u8]) -> Vec<u8> {
    let mut image = b"UNCOMPRESSED_IMG".to_vec();
    image.extend_from_slice(&(body.len() as u32).to_le_bytes());
    image.extend_from_slice(body);
    image
}

pub fn read_u64(image: &[u8], offset: usize) -> u64 {
    u64::from_le_bytes(image[offset..offset + 8].try_into().unwrap())
}

pub struct PatchFixture {
    pub kernel: PathBuf,
    pub firmware: PathBuf,
    pub output: PathBuf,
    pub config: PathBuf,
    pub stub: PathBuf,
}

impl PatchFixture {
    pub fn new(dir: &Path, kernel: &[u8], firmware: &[u8], stub: &[u8]) -> Self {
        let fixture = Self {
            kernel: dir.join("Image"),
            firmware: dir.join("UEFI.fd"),
            output: dir.join("Image.patched"),
            config: dir.join("patch.cfg"),
            stub: dir.join("ShellCode.bin"),
        };
        fs::write(&fixture.kernel, kernel).unwrap();
        fs::write(&fixture.firmware, firmware).unwrap();
        fs::write(
            &fixture.config,
            format!("StackBase={:08X}\nStackSize={:08X}\n", STACK_BASE, STACK_SIZE),
        )
        .unwrap();
        fs::write(&fixture.stub, stub).unwrap();
        fixture
    }

    pub fn args(&self) -> [&Path; 6] {
        [
            Path::new("patch"),
            &self.kernel,
            &self.firmware,
            &self.output,
            &self.config,
            &self.stub,
        ]
    }
}
