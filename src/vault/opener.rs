use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result};

/// Hands a note file to the platform's default handler. The child process is
/// detached; the frame loop never waits on it.
pub fn open_note(path: &Path) -> Result<()> {
    let mut command = platform_open_command(path);
    command
        .spawn()
        .with_context(|| format!("failed to open note {}", path.display()))?;
    Ok(())
}

#[cfg(target_os = "macos")]
fn platform_open_command(path: &Path) -> Command {
    let mut command = Command::new("open");
    command.arg(path);
    command
}

#[cfg(target_os = "windows")]
fn platform_open_command(path: &Path) -> Command {
    let mut command = Command::new("cmd");
    command.args(["/C", "start", ""]).arg(path);
    command
}

#[cfg(all(unix, not(target_os = "macos")))]
fn platform_open_command(path: &Path) -> Command {
    let mut command = Command::new("xdg-open");
    command.arg(path);
    command
}
