use std::path::Path;
use std::process::{Child, Command, Stdio};

use tracing::{info, warn};

use crate::config::{Item, ItemKind};
use crate::error::{Error, Result};

/// Runs launcher items.
pub trait Launch {
    fn launch(&self, item: &Item) -> Result<()>;

    /// Open a file or directory with the desktop's default handler.
    fn open_path(&self, path: &Path) -> Result<()>;
}

/// Spawns real processes: the platform shell for commands, the platform
/// opener for URLs and paths.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLauncher;

impl Launch for SystemLauncher {
    fn launch(&self, item: &Item) -> Result<()> {
        launch_with(item, shell_command)
    }

    fn open_path(&self, path: &Path) -> Result<()> {
        open_target(&path.to_string_lossy())
    }
}

/// Launch `item`, building the process for non-URL items with `shell`.
fn launch_with(item: &Item, shell: fn(&str) -> Command) -> Result<()> {
    let command = item.command.trim();
    if command.is_empty() {
        return Ok(());
    }
    match item.kind {
        ItemKind::Url => open_target(command),
        ItemKind::Application | ItemKind::Script => {
            // Fire and forget: spawn failures are only logged.
            match detach(shell(command)) {
                Ok(pid) => info!(name = %item.name, pid, "launched"),
                Err(e) => warn!(name = %item.name, command, "launch failed: {e}"),
            }
            Ok(())
        }
    }
}

#[cfg(unix)]
fn shell_command(command: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command);
    cmd
}

#[cfg(windows)]
fn shell_command(command: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.arg("/C").arg(command);
    cmd
}

#[cfg(target_os = "macos")]
fn opener_command(target: &str) -> Command {
    let mut cmd = Command::new("open");
    cmd.arg(target);
    cmd
}

#[cfg(windows)]
fn opener_command(target: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.args(["/C", "start", ""]).arg(target);
    cmd
}

#[cfg(all(unix, not(target_os = "macos")))]
fn opener_command(target: &str) -> Command {
    let mut cmd = Command::new("xdg-open");
    cmd.arg(target);
    cmd
}

fn open_target(target: &str) -> Result<()> {
    let pid = detach(opener_command(target)).map_err(|source| Error::Launch {
        target: target.to_string(),
        source,
    })?;
    info!(opened = target, pid, "opened with system handler");
    Ok(())
}

/// Spawn with null stdio so the child never writes over the panel, then
/// reap it on a background thread.
fn detach(mut cmd: Command) -> std::io::Result<u32> {
    let child = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    let pid = child.id();
    reap(child);
    Ok(pid)
}

fn reap(mut child: Child) {
    std::thread::spawn(move || {
        let _ = child.wait();
    });
}
