// structure_dump — render a structure headlessly and print instance counts.
//
// Usage:
//   structure_dump [--structure <path>] [--config <path>]
//
// Without `--structure`, builds the two-room demo interior. `--config` loads
// a `StructureConfig` JSON file. Prints one JSON object to stdout:
// `{ "rooms": .., "areas": .., "instances": { part: count, .. }, "colliders": .. }`.
//
// Logging goes to stderr; set `RUST_LOG` to override the default filter.

use std::process::ExitCode;

use alienation_sim::Structure;
use alienation_sim::config::StructureConfig;
use alienation_sim::demo::demo_structure;
use alienation_sim::instances::InstanceBuffers;
use tracing_subscriber::EnvFilter;

struct Args {
    structure: Option<String>,
    config: Option<String>,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args {
        structure: None,
        config: None,
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--structure" => {
                args.structure = Some(iter.next().ok_or("--structure needs a path")?);
            }
            "--config" => {
                args.config = Some(iter.next().ok_or("--config needs a path")?);
            }
            other => return Err(format!("unknown argument: {other}")),
        }
    }
    Ok(args)
}

fn run() -> Result<(), String> {
    let args = parse_args()?;

    let config = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path).map_err(|e| format!("{path}: {e}"))?;
            StructureConfig::from_json(&json).map_err(|e| format!("{path}: {e}"))?
        }
        None => StructureConfig::default(),
    };

    let structure = match &args.structure {
        Some(path) => {
            let json = std::fs::read_to_string(path).map_err(|e| format!("{path}: {e}"))?;
            let mut s = Structure::from_json(&json).map_err(|e| format!("{path}: {e}"))?;
            s.link_neighbours();
            s
        }
        None => demo_structure()
            .map(|(s, _)| s)
            .map_err(|issue| issue.handle().to_string())?,
    };

    let buffers = InstanceBuffers::from_records(structure.render_all_par(&config), &config);
    tracing::info!(
        rooms = structure.rooms().len(),
        instances = buffers.total(),
        "structure rendered"
    );

    let report = serde_json::json!({
        "rooms": structure.rooms().len(),
        "areas": structure.area_count(),
        "instances": buffers.counts_by_name(),
        "colliders": buffers.colliders().len(),
    });
    let text = serde_json::to_string_pretty(&report).map_err(|e| e.to_string())?;
    println!("{text}");
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,alienation_sim=debug,alienation_ids=debug")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
