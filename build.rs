//! Build script for hypemcli.
//!
//! Copies the `.env.example` configuration template into the user's local
//! data directory so it sits next to the `.env` file the binary reads:
//!
//! - Linux: `~/.local/share/hypemcli/.env.example`
//! - macOS: `~/Library/Application Support/hypemcli/.env.example`
//! - Windows: `%LOCALAPPDATA%/hypemcli/.env.example`
//!
//! Failures only produce cargo warnings: the template is a convenience and
//! must never break a build in a sandbox without a writable home.

use std::{env, fs, path::PathBuf};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=.env.example");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let env_example_path = manifest_dir.join(".env.example");

    let mut out_dir = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    out_dir.push("hypemcli");

    if !env_example_path.is_file() {
        println!(
            "cargo:warning=.env.example not found at {}",
            env_example_path.display()
        );
        return Ok(());
    }

    let copied = fs::create_dir_all(&out_dir)
        .and_then(|_| fs::copy(&env_example_path, out_dir.join(".env.example")));
    if let Err(e) = copied {
        println!(
            "cargo:warning=cannot copy .env.example to {}: {}",
            out_dir.display(),
            e
        );
    }

    Ok(())
}
