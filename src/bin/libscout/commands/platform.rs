//! `libscout platform` command
//!
//! Prints what the filesystem search will use on this host.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde_json::json;

use crate::cli::PlatformArgs;
use libscout::util::process::find_executable;
use libscout::util::GlobalContext;
use libscout::PlatformProfile;

/// External tools the pipeline may invoke.
const TOOLS: &[&str] = &["autoreconf", "make"];

pub fn execute(args: PlatformArgs, gctx: &GlobalContext) -> Result<()> {
    let profile = PlatformProfile::from_host(&gctx.host_env());
    let stable_dir = gctx.layout().stable_library_dir(profile.os_kind());

    if args.json {
        let value = json!({
            "os": profile.os_kind().as_str(),
            "arch": profile.arch().as_str(),
            "library_extensions": profile.library_extensions(),
            "search_directories": profile.search_directories(),
            "include_directories": profile.include_directories(),
            "stable_library_directory": stable_dir,
            "tools": tool_paths(gctx),
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&value).context("failed to serialize profile")?
        );
        return Ok(());
    }

    println!("os: {}", profile.os_kind());
    println!("arch: {}", profile.arch().as_str());
    println!(
        "extensions: {}",
        profile
            .library_extensions()
            .iter()
            .map(|e| if e.is_empty() { "(none)" } else { e.as_str() })
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!("stable library directory: {}", stable_dir.display());
    println!("search directories:");
    for dir in profile.search_directories() {
        println!("  {}", dir.display());
    }
    println!("include directories:");
    for dir in profile.include_directories() {
        println!("  {}", dir.display());
    }
    println!("tools:");
    for (tool, path) in tool_paths(gctx) {
        match path {
            Some(path) => println!("  {}: {}", tool, path.display()),
            None => println!("  {}: not found", tool),
        }
    }
    Ok(())
}

fn tool_paths(gctx: &GlobalContext) -> BTreeMap<String, Option<PathBuf>> {
    std::iter::once(gctx.pkg_config_program())
        .chain(TOOLS.iter().map(|t| t.to_string()))
        .map(|tool| {
            let path = find_executable(&tool);
            (tool, path)
        })
        .collect()
}
