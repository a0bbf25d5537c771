//! `libscout build` command

use anyhow::Result;

use crate::cli::BuildArgs;
use libscout::ops::{build_package, resolve_options};
use libscout::util::GlobalContext;

pub fn execute(args: BuildArgs, gctx: &GlobalContext) -> Result<()> {
    let config = gctx.load_config();
    let mut options = resolve_options(gctx, &config, vec![args.package.clone()])?;
    if args.force {
        options.force_build = true;
    }
    if args.jobs.is_some() {
        options.jobs = args.jobs;
    }

    let stable_dir = build_package(gctx, &config, &args.package, &options)?;

    tracing::info!("{} is ready in {}", args.package, stable_dir.display());
    println!("{}", stable_dir.display());
    Ok(())
}
