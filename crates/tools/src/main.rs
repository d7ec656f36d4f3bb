use std::env;
use std::fs;
use std::path::PathBuf;

use catalog::StarCatalog;
use tools::{CatalogSummary, PrepareOptions, prepare_file};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = real_main() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<(), String> {
    let mut args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        return Err(usage());
    }

    let cmd = args[1].clone();
    args.drain(0..2);

    match cmd.as_str() {
        "prepare" => cmd_prepare(args),
        "stats" => cmd_stats(args),
        _ => Err(usage()),
    }
}

fn cmd_prepare(args: Vec<String>) -> Result<(), String> {
    // starquiz prepare <input.csv[.gz]> <output.json> [--max-mag M]
    let mut opts = PrepareOptions::default();
    let mut paths: Vec<PathBuf> = Vec::new();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--max-mag" => {
                i += 1;
                let value = args
                    .get(i)
                    .ok_or_else(|| "--max-mag requires a value".to_string())?;
                opts.max_magnitude = value
                    .parse::<f64>()
                    .ok()
                    .filter(|m| m.is_finite())
                    .ok_or_else(|| format!("invalid --max-mag: {value}"))?;
            }
            s if s.starts_with('-') => {
                return Err(format!("unknown arg: {s}\n\n{}", usage()));
            }
            _ => paths.push(PathBuf::from(&args[i])),
        }
        i += 1;
    }

    let [input, output] = paths.as_slice() else {
        return Err(usage());
    };

    let report = prepare_file(input, output, opts).map_err(|e| format!("prepare {input:?}: {e}"))?;
    println!(
        "read {} rows, kept {} named stars (mag <= {}), dropped {} too faint and {} unnamed",
        report.rows, report.kept, opts.max_magnitude, report.too_faint, report.unnamed
    );
    Ok(())
}

fn cmd_stats(args: Vec<String>) -> Result<(), String> {
    // starquiz stats <stars.json>
    let [path] = args.as_slice() else {
        return Err(usage());
    };

    let text = fs::read_to_string(path).map_err(|e| format!("read {path:?}: {e}"))?;
    let catalog = StarCatalog::from_json_str(&text).map_err(|e| format!("{path}: {e}"))?;
    print!("{}", CatalogSummary::of(&catalog));
    Ok(())
}

fn usage() -> String {
    [
        "usage:",
        "  starquiz prepare <input.csv[.gz]> <output.json> [--max-mag M]",
        "  starquiz stats <stars.json>",
    ]
    .join("\n")
}
