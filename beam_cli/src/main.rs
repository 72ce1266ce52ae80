//! # Beam CLI
//!
//! Runs a beam model file through the statics engine and prints the support
//! reactions and diagram extremes.
//!
//! ```text
//! beam_cli [model.json] [--json]
//! ```
//!
//! Without a model path the built-in demo (10 m simply supported beam with a
//! 10 kN midspan point load) is analysed. `--json` prints the full report,
//! diagrams included. Set `RUST_LOG=debug` for solver logging.

use std::fs;
use std::process::ExitCode;

use beam_core::{AnalysisSettings, Beam, BeamError, BeamModel, BeamReport, Joint, Load};

#[derive(Debug)]
struct Args {
    model_path: Option<String>,
    json: bool,
}

const USAGE: &str = "Usage: beam_cli [model.json] [--json]";

fn parse_args(raw: impl IntoIterator<Item = String>) -> Result<Args, String> {
    let mut args = Args {
        model_path: None,
        json: false,
    };
    for arg in raw {
        match arg.as_str() {
            "--json" => args.json = true,
            flag if flag.starts_with('-') => return Err(format!("Unknown option '{}'", flag)),
            _ if args.model_path.is_some() => return Err(format!("Unexpected argument '{}'", arg)),
            _ => args.model_path = Some(arg),
        }
    }
    Ok(args)
}

fn demo_model() -> Result<BeamModel, BeamError> {
    let beam = Beam::new(10.0)?
        .with_joint(Joint::pinned(0.0))
        .with_joint(Joint::roller(10.0))
        .with_load(Load::point(5.0, 10.0));
    Ok(BeamModel::from_beam(&beam, AnalysisSettings::default().with_step(0.01)))
}

fn load_model(path: &str) -> Result<BeamModel, BeamError> {
    let json = fs::read_to_string(path).map_err(|e| BeamError::file_error("read", path, e))?;
    BeamModel::from_json(&json)
}

fn run(args: &Args) -> Result<(Beam, BeamReport), BeamError> {
    let model = match &args.model_path {
        Some(path) => {
            log::info!("Loading beam model from {}", path);
            load_model(path)?
        }
        None => demo_model()?,
    };
    let beam = model.to_beam()?;
    let report = beam.verify(&model.settings)?.report();
    Ok((beam, report))
}

fn print_summary(beam: &Beam, report: &BeamReport) {
    println!("═══════════════════════════════════════");
    println!("  BEAM ANALYSIS RESULTS");
    println!("═══════════════════════════════════════");
    println!();
    println!("Beam:");
    println!("  Length:   {} m", beam.length());
    println!("  Supports: {}", report.configuration.display_name());
    println!();
    println!("Loads:");
    for load in beam.loads() {
        println!("  {}", load);
    }
    println!();
    println!("Reactions:");
    for r in &report.reactions {
        println!(
            "  {:<24} Ry = {:>10.3} kN   Rx = {:>6.3} kN   Rm = {:>10.3} kN·m",
            r.description, r.reaction.ry, r.reaction.rx, r.reaction.rm
        );
    }
    println!();
    println!("Diagrams ({} samples):", report.diagrams.len());
    println!(
        "  V_max = {:.3} kN at {:.3} m",
        report.extremes.max_shear.y, report.extremes.max_shear.x
    );
    println!(
        "  M_max = {:.3} kN·m at {:.3} m",
        report.extremes.max_moment.y, report.extremes.max_moment.x
    );
    println!();
    println!("═══════════════════════════════════════");
}

fn main() -> ExitCode {
    env_logger::init();
    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("Error: {}", message);
            eprintln!("{}", USAGE);
            return ExitCode::FAILURE;
        }
    };

    match run(&args) {
        Ok((beam, report)) => {
            if args.json {
                match serde_json::to_string_pretty(&report) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("Error: {}", e);
                        return ExitCode::FAILURE;
                    }
                }
            } else {
                print_summary(&beam, &report);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Beam verification failed: {}", e);
            if e.is_geometry_error() {
                eprintln!("Check the load and joint positions against the beam length and support layout.");
            }
            if let Ok(json) = serde_json::to_string_pretty(&e) {
                eprintln!();
                eprintln!("Error JSON:");
                eprintln!("{}", json);
            }
            ExitCode::FAILURE
        }
    }
}
