//! `binlink plan` command

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::cli::PlanArgs;
use crate::commands::LinkSettings;
use crate::GlobalOptions;
use binlink::{BinConflict, BinLinker, Resolution};

/// JSON form of a plan.
#[derive(Debug, Serialize)]
struct PlanReport<'a> {
    bin_dir: &'a Path,
    bins: Vec<PlannedBin<'a>>,
    conflicts: &'a [BinConflict],
}

#[derive(Debug, Serialize)]
struct PlannedBin<'a> {
    name: &'a str,
    package: &'a str,
    shim: PathBuf,
    target: &'a Path,
}

pub fn execute(args: PlanArgs, opts: &GlobalOptions) -> Result<()> {
    let settings = LinkSettings::resolve(&args.link)?;
    settings.emit_warnings(opts.color);

    let resolution = BinLinker::new(settings.platform).plan_bins(
        &settings.modules_dir,
        &settings.bin_dir,
        settings.allow_exotic_manifests,
    )?;

    if args.json {
        let report = report(&resolution, &settings.bin_dir);
        let json = serde_json::to_string_pretty(&report).context("failed to serialize plan")?;
        println!("{}", json);
    } else {
        print_plan(&resolution, &settings.bin_dir);
    }

    Ok(())
}

fn report<'a>(resolution: &'a Resolution, bin_dir: &'a Path) -> PlanReport<'a> {
    let mut bins: Vec<_> = resolution
        .winners
        .iter()
        .map(|cmd| PlannedBin {
            name: &cmd.name,
            package: &cmd.pkg_name,
            shim: bin_dir.join(&cmd.name),
            target: &cmd.path,
        })
        .collect();
    bins.sort_by(|a, b| a.name.cmp(b.name));

    PlanReport {
        bin_dir,
        bins,
        conflicts: &resolution.conflicts,
    }
}

fn print_plan(resolution: &Resolution, bin_dir: &Path) {
    println!("Bins for {}:", bin_dir.display());
    println!();

    let report = report(resolution, bin_dir);
    for bin in &report.bins {
        println!("  {} -> {}", bin.name, bin.target.display());
        println!("     From: {}", bin.package);
    }

    if report.bins.is_empty() {
        println!("  (no bins)");
    }

    if !resolution.conflicts.is_empty() {
        println!();
        println!("Rejected:");
        for conflict in &resolution.conflicts {
            println!("  {}", conflict);
        }
    }
}
