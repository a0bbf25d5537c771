//! `libscout resolve` command

use anyhow::{Context, Result};

use crate::cli::{OutputFormat, ResolveArgs, ToolsetArgs};
use libscout::ops::{resolve_options, resolve_packages, select_toolset, ResolveOptions};
use libscout::util::{Config, GlobalContext};
use libscout::BuildConfiguration;

pub fn execute(args: ResolveArgs, gctx: &GlobalContext) -> Result<()> {
    let config = gctx.load_config();

    let mut options = resolve_options(gctx, &config, args.packages.clone())?;
    options.language = args.language.clone();
    if args.offline {
        options.downloads_disabled = Some("--offline was given".to_string());
    }
    if args.force {
        options.force_build = true;
    }
    if args.no_pkg_config {
        options.use_pkg_config = false;
    }
    apply_search_dirs(&mut options, &args.search_dirs, gctx);
    apply_toolset(&mut options, &args.toolset, &config)?;

    let resolved = resolve_packages(gctx, &config, &options)?;
    print_configuration(&resolved, args.format)
}

/// Command-line directories go ahead of configured ones.
pub fn apply_search_dirs(
    options: &mut ResolveOptions,
    dirs: &[std::path::PathBuf],
    gctx: &GlobalContext,
) {
    let mut extra: Vec<_> = dirs
        .iter()
        .map(|d| if d.is_absolute() { d.clone() } else { gctx.cwd().join(d) })
        .collect();
    extra.append(&mut options.extra_dirs);
    options.extra_dirs = extra;
}

/// Command-line toolset inputs override configuration.
pub fn apply_toolset(
    options: &mut ResolveOptions,
    args: &ToolsetArgs,
    config: &Config,
) -> Result<()> {
    if args.toolset.is_none() && args.runtime_version.is_none() {
        return Ok(());
    }

    let explicit = args
        .toolset
        .as_deref()
        .or(config.windows.toolset.as_deref());
    let runtime = args
        .runtime_version
        .as_deref()
        .or(config.windows.runtime_version.as_deref());

    options.toolset = select_toolset(explicit, runtime)?;
    Ok(())
}

fn print_configuration(config: &BuildConfiguration, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let json =
                serde_json::to_string_pretty(config).context("failed to serialize configuration")?;
            println!("{}", json);
        }
        OutputFormat::Flags => {
            for flag in config.to_flags() {
                println!("{}", flag);
            }
        }
        OutputFormat::Cargo => {
            for line in config.to_cargo_directives() {
                println!("{}", line);
            }
        }
    }
    Ok(())
}
