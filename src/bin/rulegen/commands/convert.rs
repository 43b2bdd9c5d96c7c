//! `rulegen convert` command

use anyhow::{bail, Result};

use super::{load, report_failures, GlobalOpts};
use crate::cli::{ConvertArgs, OutputFormat};
use rulegen::convert::{ConditionLabels, ModuleOutcome, PackageOutput};
use rulegen::core::path;
use rulegen::util::diagnostic::suggestions;
use rulegen::util::fs::write_string;

pub fn execute(args: ConvertArgs, opts: &GlobalOpts) -> Result<()> {
    let (ws, graph) = load(&args.workspace, opts)?;
    let converter = ws.converter(&graph);

    let outputs: Vec<PackageOutput> = if args.package.is_empty() {
        converter.convert_all()
    } else {
        let declared = graph.packages();
        let mut outputs = Vec::with_capacity(args.package.len());
        for requested in &args.package {
            let package = path::normalize(requested);
            if !declared.contains(package.as_str()) {
                bail!(
                    "no modules are declared in package `{}`\n{}",
                    requested,
                    suggestions::PACKAGE_NOT_FOUND
                );
            }
            outputs.push(converter.convert_package(&package));
        }
        outputs
    };

    for output in &outputs {
        for outcome in &output.outcomes {
            if let ModuleOutcome::Skipped { name, reason } = outcome {
                tracing::debug!("skipped `{}`: {}", name, reason);
            }
        }
    }

    let labels = &ws.options.labels;
    if args.write {
        let mut written = 0;
        for output in &outputs {
            let text = output.render(labels);
            if text.is_empty() {
                continue;
            }
            let file = ws.build_file(&output.package);
            write_string(&file, &text)?;
            tracing::info!("wrote {}", file.display());
            written += 1;
        }
        println!("Generated {} build file(s)", written);
    } else {
        match args.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&outputs)?),
            OutputFormat::Text => print_text(&outputs, labels, ws.config.build_file_name()),
        }
    }

    let failed = report_failures(&outputs, &ws, opts.color);
    if failed > 0 {
        bail!(
            "{} module(s) failed to convert\n{}",
            failed,
            suggestions::CONVERT_FAILED
        );
    }

    Ok(())
}

fn print_text(outputs: &[PackageOutput], labels: &ConditionLabels, file_name: &str) {
    let mut first = true;
    for output in outputs {
        let text = output.render(labels);
        if text.is_empty() {
            continue;
        }
        if !first {
            println!();
        }
        first = false;
        println!("# {}", path::join(&output.package, file_name));
        print!("{}", text);
    }
}
