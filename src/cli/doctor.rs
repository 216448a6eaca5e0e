//! Environment readiness check — browser presence and headless launch.

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Run the doctor checks and print a readiness summary.
pub async fn run(json: bool) -> Result<()> {
    let browser = find_browser();
    let version = browser.as_deref().and_then(browser_version);
    let launch = match &browser {
        Some(path) => Some(test_headless_launch(path)),
        None => None,
    };

    if json {
        let launch_ms = launch.as_ref().and_then(|r| r.as_ref().ok().copied());
        let launch_error = launch
            .as_ref()
            .and_then(|r| r.as_ref().err().map(|e| e.to_string()));
        let out = serde_json::json!({
            "version": env!("CARGO_PKG_VERSION"),
            "os": std::env::consts::OS,
            "arch": std::env::consts::ARCH,
            "browser_path": browser.as_ref().map(|p| p.display().to_string()),
            "browser_version": version,
            "headless_launch_ms": launch_ms,
            "headless_launch_error": launch_error,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!(
        "maskbind {} on {} ({})",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH
    );

    match &browser {
        Some(path) => {
            println!(
                "browser: {} at {}",
                version.as_deref().unwrap_or("unknown version"),
                path.display()
            );
        }
        None => {
            println!("browser: NOT FOUND");
            println!("  fix: install Chrome/Chromium, or set MASKBIND_BROWSER_PATH=/path/to/chrome");
        }
    }

    let mut ready = browser.is_some();
    if let Some(launch) = launch {
        match launch {
            Ok(ms) => println!("headless test: launched and closed in {ms}ms"),
            Err(e) => {
                println!("headless test: FAILED — {e}");
                if is_docker() {
                    println!("  running in Docker? try MASKBIND_NO_SANDBOX=1 or 'bind --no-sandbox'");
                }
                ready = false;
            }
        }
    }

    if ready {
        println!("READY — try 'maskbind bind <url>'");
    } else {
        println!("NOT READY — fix the issues above");
    }
    Ok(())
}

/// Find a browser executable: env override, then PATH, then common macOS
/// location.
pub fn find_browser() -> Option<PathBuf> {
    if let Ok(p) = std::env::var("MASKBIND_BROWSER_PATH") {
        let path = PathBuf::from(&p);
        if path.exists() {
            return Some(path);
        }
    }

    for name in ["google-chrome", "chromium", "chromium-browser", "chrome"] {
        if let Ok(path) = which::which(name) {
            return Some(path);
        }
    }

    if cfg!(target_os = "macos") {
        let common = PathBuf::from("/Applications/Google Chrome.app/Contents/MacOS/Google Chrome");
        if common.exists() {
            return Some(common);
        }
    }

    None
}

fn browser_version(path: &Path) -> Option<String> {
    let output = Command::new(path).arg("--version").output().ok()?;
    if output.status.success() {
        let raw = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Some(raw.replace("Google Chrome ", "").replace("Chromium ", ""))
    } else {
        None
    }
}

/// Test that the browser can launch headless and close.
fn test_headless_launch(path: &Path) -> Result<u64> {
    let start = std::time::Instant::now();
    let mut cmd = Command::new(path);
    cmd.args(["--headless", "--disable-gpu", "--dump-dom", "about:blank"]);

    if is_docker() || std::env::var("MASKBIND_NO_SANDBOX").is_ok() {
        cmd.arg("--no-sandbox");
    }

    let output = cmd
        .output()
        .map_err(|e| anyhow::anyhow!("failed to launch: {e}"))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(anyhow::anyhow!(
            "{}",
            stderr.lines().next().unwrap_or("unknown error")
        ));
    }

    Ok(start.elapsed().as_millis() as u64)
}

fn is_docker() -> bool {
    PathBuf::from("/.dockerenv").exists()
        || std::fs::read_to_string("/proc/1/cgroup")
            .map(|s| s.contains("docker") || s.contains("containerd"))
            .unwrap_or(false)
}
