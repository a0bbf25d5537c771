//! `libscout fetch` command

use anyhow::Result;

use crate::cli::FetchArgs;
use libscout::ops::{fetch_package, resolve_options};
use libscout::util::GlobalContext;

pub fn execute(args: FetchArgs, gctx: &GlobalContext) -> Result<()> {
    let config = gctx.load_config();
    let options = resolve_options(gctx, &config, vec![args.package.clone()])?;

    let source_dir = fetch_package(gctx, &config, &args.package, &options)?;

    println!("{}", source_dir.display());
    Ok(())
}
