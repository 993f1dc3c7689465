//! Shim CLI
//!
//! Generates C++ bindings and NDK build scripts from a managed type model.

use std::path::{Path, PathBuf};
use std::time::Instant;

use shim_cpp::OutputStyle;
use shim_ir::input::ModelInput;
use shimc::{init_tracing, Orchestrator, SerializationConfig};

struct Args {
    model: PathBuf,
    config: Option<PathBuf>,
    out: Option<PathBuf>,
    style: Option<OutputStyle>,
}

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    let args = match parse_args(args.get(1..).unwrap_or(&[])) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("error: {message}");
            print_usage();
            std::process::exit(2);
        }
    };

    let mut config = match &args.config {
        Some(path) => match SerializationConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("error[{}]: {e}", e.code());
                std::process::exit(1);
            }
        },
        None => SerializationConfig::default(),
    };
    if let Some(out) = args.out {
        config = config.with_output_dir(out);
    }
    if let Some(style) = args.style {
        config = config.with_output_style(style);
    }

    let start = Instant::now();
    let input = match read_model(&args.model) {
        Ok(input) => input,
        Err(message) => {
            eprintln!("error: {message}");
            std::process::exit(1);
        }
    };
    println!("Parsed model in {:?}", start.elapsed());

    let orchestrator = match Orchestrator::new(config) {
        Ok(orchestrator) => orchestrator,
        Err(e) => {
            eprintln!("error[{}]: {e}", e.code());
            std::process::exit(1);
        }
    };
    let report = match orchestrator.run(&input) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("error[{}]: {e}", e.code());
            std::process::exit(1);
        }
    };

    println!("Timings: {}", report.timings);
    for failure in &report.failures {
        eprintln!("{failure}");
    }
    println!("{report}");
    if !report.status.is_success() {
        std::process::exit(1);
    }
}

fn read_model(path: &Path) -> Result<ModelInput, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read `{}`: {e}", path.display()))?;
    serde_json::from_str(&text).map_err(|e| format!("`{}` is not a type model: {e}", path.display()))
}

fn parse_args(args: &[String]) -> Result<Args, String> {
    let mut model = None;
    let mut config = None;
    let mut out = None;
    let mut style = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" | "--out" | "--style" => {
                let Some(value) = iter.next() else {
                    return Err(format!("{arg} needs a value"));
                };
                match arg.as_str() {
                    "--config" => config = Some(PathBuf::from(value)),
                    "--out" => out = Some(PathBuf::from(value)),
                    _ => style = Some(parse_style(value)?),
                }
            }
            flag if flag.starts_with('-') => return Err(format!("unknown option `{flag}`")),
            path if model.is_none() => model = Some(PathBuf::from(path)),
            extra => return Err(format!("unexpected argument `{extra}`")),
        }
    }

    let model = model.ok_or_else(|| "missing model file".to_owned())?;
    Ok(Args {
        model,
        config,
        out,
        style,
    })
}

fn parse_style(value: &str) -> Result<OutputStyle, String> {
    match value.to_ascii_lowercase().replace('_', "").as_str() {
        "normal" => Ok(OutputStyle::Normal),
        "crashunless" => Ok(OutputStyle::CrashUnless),
        "throwunless" => Ok(OutputStyle::ThrowUnless),
        _ => Err(format!(
            "unknown style `{value}` (expected normal, crash_unless or throw_unless)"
        )),
    }
}

fn print_usage() {
    eprintln!("Usage: shim <model.json> [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config <cfg.json>   Serialization config (defaults otherwise)");
    eprintln!("  --out <dir>           Output directory");
    eprintln!("  --style <style>       normal, crash_unless or throw_unless");
}
