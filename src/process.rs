//! Running external tools with piped stdio.

use std::{
    io::{self, Write},
    process::{Command, Output, Stdio},
    thread,
};

/// Spawns `command`, feeds `input` to its stdin and collects its output.
///
/// Stdin is written from a separate thread while the output is drained, so
/// a child that streams while it reads cannot fill both pipes and stall.
pub fn pipe_through(command: &mut Command, input: &str) -> io::Result<Output> {
    let mut child = command
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;
    let stdin = child.stdin.take();

    thread::scope(|scope| {
        if let Some(mut stdin) = stdin {
            scope.spawn(move || {
                // A child that exits early closes the pipe; its exit status reports that.
                let _ = stdin.write_all(input.as_bytes());
            });
        }
        child.wait_with_output()
    })
}

/// Writes an executable shell script standing in for an external tool.
#[cfg(all(test, unix))]
pub(crate) fn fake_tool(dir: &std::path::Path, name: &str, script: &str) -> std::path::PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{script}\n")).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}
