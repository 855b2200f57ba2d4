#![allow(dead_code)]

use std::{
    io::Read,
    path::Path,
    process::{Command, Output},
};

use tempfile::NamedTempFile;

/// Regular file standing in for `/dev/mem`, large enough to hold the page
/// containing any address below 1 MiB whatever the host page size.
pub fn fake_device() -> NamedTempFile {
    let file = NamedTempFile::new().expect("create fake device");
    file.as_file()
        .set_len(2 << 20)
        .expect("size fake device");
    file
}

pub fn device_bytes(device: &NamedTempFile, at: usize, len: usize) -> Vec<u8> {
    let mut contents = Vec::new();
    device
        .reopen()
        .expect("reopen fake device")
        .read_to_end(&mut contents)
        .expect("read fake device");
    contents[at..at + len].to_vec()
}

/// Run the `devmem` binary against `device` with `args` after `--device`.
pub fn devmem(device: &Path, leading: &[&str], args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_devmem"))
        .args(leading)
        .arg("--device")
        .arg(device)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("spawn devmem")
}

pub fn stdout_lines(output: &Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_string)
        .collect()
}
