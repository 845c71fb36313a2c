use anyhow::{Context, Result, anyhow, bail};
use grna_report::render::{
    fingerprint, render_binding_map_svg, render_json, render_markdown, render_report_svg,
    render_table_csv,
};
use grna_report::{AnalysisService, ReportBundle, ReportPipeline, ReportSettings, about, logging};
use serde::Serialize;
use std::io::Read;
use std::{env, fs};

#[derive(Serialize)]
struct ValidationSummary<'a> {
    gene: &'a str,
    candidates: usize,
    uniform_positions: bool,
    out_of_range_scores: &'a [usize],
    caveats: &'a [String],
}

fn usage() {
    eprintln!(
        "Usage:\n  \
  grna_report_cli --version\n  \
  grna_report_cli [--config PATH] validate INPUT.json\n  \
  grna_report_cli [--config PATH] view INPUT.json\n  \
  grna_report_cli [--config PATH] render INPUT.json svg|map|markdown|json|csv OUTPUT\n  \
  grna_report_cli [--config PATH] fingerprint INPUT.json\n  \
  grna_report_cli [--config PATH] health\n  \
  grna_report_cli [--config PATH] crops\n  \
  grna_report_cli [--config PATH] traits CROP\n  \
  grna_report_cli [--config PATH] catalog\n  \
  grna_report_cli [--config PATH] fetch CROP TRAIT OUTPUT.json\n\n  \
  Tip: pass - as INPUT to read from stdin, or as OUTPUT to write to stdout"
    );
}

fn read_input(path: &str) -> Result<String> {
    if path == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Could not read gene result from stdin")?;
        Ok(text)
    } else {
        fs::read_to_string(path).with_context(|| format!("Could not read gene result '{path}'"))
    }
}

fn write_output(path: &str, text: &str) -> Result<()> {
    if path == "-" {
        print!("{text}");
        Ok(())
    } else {
        fs::write(path, text).with_context(|| format!("Could not write output '{path}'"))
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("Could not serialize JSON output")?;
    println!("{text}");
    Ok(())
}

fn parse_global_config_arg(args: &[String]) -> (Option<String>, usize) {
    if args.len() >= 3 && args[1] == "--config" {
        return (Some(args[2].clone()), 3);
    }
    (None, 1)
}

fn require_args(args: &[String], cmd_idx: usize, count: usize, shape: &str) -> Result<()> {
    if args.len() <= cmd_idx + count {
        usage();
        bail!("{} requires: {shape}", args[cmd_idx]);
    }
    Ok(())
}

fn build_report(settings: &ReportSettings, input: &str) -> Result<ReportBundle> {
    let text = read_input(input)?;
    ReportPipeline::new(settings.validation.clone())
        .run_json(&text)
        .with_context(|| format!("Could not build a report from '{input}'"))
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() <= 1 {
        usage();
        bail!("Missing command");
    }
    if args.iter().any(|a| a == "--version" || a == "-V") {
        println!("{}", about::version_cli_text());
        return Ok(());
    }
    logging::init();

    let (config_path, cmd_idx) = parse_global_config_arg(&args);
    if args.len() <= cmd_idx {
        usage();
        bail!("Missing command");
    }
    let settings = ReportSettings::resolve(config_path.as_deref())?;
    let command = args[cmd_idx].as_str();

    match command {
        "validate" => {
            require_args(&args, cmd_idx, 1, "INPUT.json")?;
            let bundle = build_report(&settings, &args[cmd_idx + 1])?;
            print_json(&ValidationSummary {
                gene: &bundle.document.overview.gene.symbol,
                candidates: bundle.document.table.len(),
                uniform_positions: bundle.outcome.uniform_positions,
                out_of_range_scores: &bundle.outcome.out_of_range_scores,
                caveats: &bundle.document.caveats,
            })
        }
        "view" => {
            require_args(&args, cmd_idx, 1, "INPUT.json")?;
            let bundle = build_report(&settings, &args[cmd_idx + 1])?;
            print_json(&bundle.view)
        }
        "render" => {
            require_args(&args, cmd_idx, 3, "INPUT.json svg|map|markdown|json|csv OUTPUT")?;
            let input = &args[cmd_idx + 1];
            let format = args[cmd_idx + 2].as_str();
            let output = &args[cmd_idx + 3];
            let bundle = build_report(&settings, input)?;
            let doc = &bundle.document;
            let render = &settings.render;
            // Rendered in full before anything touches OUTPUT.
            let text = match format {
                "svg" => render_report_svg(doc, render)?,
                "map" => render_binding_map_svg(doc, render),
                "markdown" | "md" => render_markdown(doc, render)?,
                "json" => render_json(doc)?,
                "csv" => render_table_csv(doc)?,
                _ => bail!("Unknown render format '{format}', expected svg, map, markdown, json or csv"),
            };
            write_output(output, &text)?;
            if output != "-" {
                eprintln!("Wrote {format} report for '{}' to '{output}'", doc.overview.gene.symbol);
            }
            Ok(())
        }
        "fingerprint" => {
            require_args(&args, cmd_idx, 1, "INPUT.json")?;
            let bundle = build_report(&settings, &args[cmd_idx + 1])?;
            println!("{}", fingerprint(&bundle.document)?);
            Ok(())
        }
        "health" => {
            let service = AnalysisService::new(&settings.service)?;
            let status = service.health()?;
            println!("{} {status}", service.base_url());
            Ok(())
        }
        "crops" => {
            let crops = AnalysisService::new(&settings.service)?.crops()?;
            print_json(&crops)
        }
        "catalog" => {
            let catalog = AnalysisService::new(&settings.service)?.crops_and_traits()?;
            print_json(&catalog)
        }
        "traits" => {
            require_args(&args, cmd_idx, 1, "CROP")?;
            let crop = &args[cmd_idx + 1];
            let traits = AnalysisService::new(&settings.service)?
                .traits(crop)
                .with_context(|| format!("Could not list traits for '{crop}'"))?;
            print_json(&traits)
        }
        "fetch" => {
            require_args(&args, cmd_idx, 3, "CROP TRAIT OUTPUT.json")?;
            let crop = &args[cmd_idx + 1];
            let trait_name = &args[cmd_idx + 2];
            let output = &args[cmd_idx + 3];
            let result = AnalysisService::new(&settings.service)?
                .generate_report(crop, trait_name)
                .with_context(|| format!("Could not fetch a report for '{crop}' / '{trait_name}'"))?;
            // Only records that make it through the pipeline are saved.
            ReportPipeline::new(settings.validation.clone())
                .run(&result)
                .context("Service returned a result that cannot be reported")?;
            let mut text = serde_json::to_string_pretty(&result)?;
            text.push('\n');
            write_output(output, &text)?;
            if output != "-" {
                eprintln!("Saved {} candidates for {} to '{output}'", result.candidates.len(), result.gene.symbol);
            }
            Ok(())
        }
        _ => {
            usage();
            Err(anyhow!("Unknown command '{command}'"))
        }
    }
}
