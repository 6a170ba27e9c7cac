//! `binlink link` command

use anyhow::Result;

use crate::cli::LinkArgs;
use crate::commands::LinkSettings;
use crate::GlobalOptions;
use binlink::{BinLinker, LinkBinsOptions};

pub fn execute(args: LinkArgs, opts: &GlobalOptions) -> Result<()> {
    let settings = LinkSettings::resolve(&args)?;
    settings.emit_warnings(opts.color);
    tracing::debug!("Linking with {:?}", settings);

    let warn = |msg: &str| tracing::warn!("{}", msg);
    let link_opts = LinkBinsOptions::new(&warn)
        .allow_exotic_manifests(settings.allow_exotic_manifests);

    BinLinker::new(settings.platform).link_bins(
        &settings.modules_dir,
        &settings.bin_dir,
        &link_opts,
    )?;

    Ok(())
}
