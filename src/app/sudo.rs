use std::process::{Command, Stdio};
use std::thread;
use std::time::Duration;

use anyhow::{bail, Context, Result};

const KEEPALIVE_INTERVAL: Duration = Duration::from_secs(60);

pub(crate) fn is_root() -> bool {
    unsafe { libc::geteuid() == 0 }
}

/// Prompts for the sudo password on the plain terminal, then keeps the
/// timestamp fresh from a detached thread for the rest of the run.
pub(crate) fn acquire() -> Result<()> {
    println!("HecateShell Installer");
    println!();
    println!("This installer requires sudo privileges to install dependencies.");
    println!("Please enter your password when prompted.");
    println!();

    let status = Command::new("sudo")
        .arg("-v")
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .context("run sudo -v")?;
    if !status.success() {
        bail!("failed to acquire sudo privileges ({status})");
    }

    thread::spawn(|| loop {
        thread::sleep(KEEPALIVE_INTERVAL);
        let refreshed = Command::new("sudo")
            .args(["-n", "-v"])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();
        if !matches!(refreshed, Ok(status) if status.success()) {
            break;
        }
    });

    println!();
    println!("✓ Sudo privileges acquired!");
    println!("Starting installer...");
    thread::sleep(Duration::from_millis(500));
    Ok(())
}
