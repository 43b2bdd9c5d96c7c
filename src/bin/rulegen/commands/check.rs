//! `rulegen check` command
//!
//! Converts the whole workspace twice and compares the fingerprints of the
//! generated output. Build files already on disk that differ from the
//! generated output are reported as warnings.

use anyhow::{bail, Result};

use super::{load, report_failures, GlobalOpts, Workspace};
use crate::cli::CheckArgs;
use rulegen::convert::PackageOutput;
use rulegen::util::diagnostic::{self, suggestions, Diagnostic};
use rulegen::util::fs::read_to_string;
use rulegen::util::hash::fingerprint_outputs;

pub fn execute(args: CheckArgs, opts: &GlobalOpts) -> Result<()> {
    let (ws, graph) = load(&args.workspace, opts)?;
    let converter = ws.converter(&graph);
    let labels = &ws.options.labels;

    let first = converter.convert_all();
    let second = converter.convert_all();

    let fp_first = fingerprint_outputs(&first, labels);
    let fp_second = fingerprint_outputs(&second, labels);
    tracing::debug!("fingerprints: {} {}", fp_first, fp_second);

    if fp_first != fp_second {
        bail!("conversion is not deterministic: two runs produced different output");
    }

    let failed = report_failures(&first, &ws, opts.color);
    if failed > 0 {
        bail!(
            "{} module(s) failed to convert\n{}",
            failed,
            suggestions::CONVERT_FAILED
        );
    }

    let stale = report_stale(&first, &ws, opts.color)?;
    if stale > 0 {
        eprintln!("{}", suggestions::STALE_OUTPUT);
    }

    let rules: usize = first.iter().map(|o| o.rules().len()).sum();
    println!(
        "ok: {} rule(s) in {} package(s), fingerprint {}",
        rules,
        first.len(),
        &fp_first[..16]
    );

    Ok(())
}

/// Warn about build files on disk whose contents differ from the generated
/// output; returns how many differ. Missing build files are not reported.
fn report_stale(outputs: &[PackageOutput], ws: &Workspace, color: bool) -> Result<usize> {
    let labels = &ws.options.labels;
    let mut stale = 0;
    for output in outputs {
        let file = ws.build_file(&output.package);
        if !file.is_file() {
            continue;
        }
        if read_to_string(&file)? != output.render(labels) {
            let diag = Diagnostic::warning("build file is out of date")
                .with_location(&file)
                .with_context(format!("generated output for `//{}` differs", output.package));
            diagnostic::emit(&diag, color);
            stale += 1;
        }
    }
    Ok(stale)
}
