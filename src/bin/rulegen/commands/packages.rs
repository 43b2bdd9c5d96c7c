//! `rulegen packages` command

use anyhow::Result;

use super::{GlobalOpts, Workspace};
use crate::cli::PackagesArgs;

pub fn execute(args: PackagesArgs, opts: &GlobalOpts) -> Result<()> {
    let ws = Workspace::load(&args.root, opts)?;

    for package in ws.index.packages() {
        println!("//{}", package);
    }

    Ok(())
}
