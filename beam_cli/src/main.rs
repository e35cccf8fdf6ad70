//! # Beam Diagrams CLI
//!
//! Terminal front end for `beam_core`: collects a beam configuration (from a
//! JSON file, from dice, or from prompts), runs the analysis and prints the
//! derivation, reactions, diagrams and a coarse value table.
//!
//! ```text
//! beam_cli                         # interactive prompts
//! beam_cli --roll --json out.json  # random beam, report saved as JSON
//! beam_cli --config beam.json --samples 1000
//! ```
//!
//! Set `RUST_LOG=debug` to mirror every derivation step to stderr.

mod report;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use beam_core::{
    load_configuration, save_configuration, save_report, AnalysisReport, AnalysisSettings, BeamAnalyzer,
    BeamConfiguration, CalcResult, DiceRolls, SupportKind,
};
use log::info;

const USAGE: &str = "\
usage: beam_cli [--config <file> | --roll] [options]

Sources (default: interactive prompts):
  --config <file>       analyse a JSON beam configuration
  --roll                generate the beam from dice

Options:
  --samples <n>         grid size (default 500, minimum 2)
  --parallel            evaluate fallback points on all cores
  --latex               also print V(x) and M(x) as LaTeX
  --json <file>         save the full report as JSON
  --save-config <file>  save the analysed input configuration
  --help                show this message";

/// Where the beam configuration comes from
#[derive(Debug, Clone, PartialEq)]
enum Source {
    Interactive,
    Config(PathBuf),
    Roll,
}

#[derive(Debug, Clone, PartialEq)]
struct Options {
    source: Source,
    samples: Option<usize>,
    parallel: bool,
    latex: bool,
    json: Option<PathBuf>,
    save_config: Option<PathBuf>,
    help: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            source: Source::Interactive,
            samples: None,
            parallel: false,
            latex: false,
            json: None,
            save_config: None,
            help: false,
        }
    }
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let mut options = Options::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        let mut value = |flag: &str| {
            iter.next()
                .cloned()
                .ok_or_else(|| format!("{} requires a value", flag))
        };
        match arg.as_str() {
            "--config" | "-c" => {
                if options.source == Source::Roll {
                    return Err("--config and --roll cannot be combined".to_string());
                }
                options.source = Source::Config(PathBuf::from(value(arg)?));
            }
            "--roll" | "-r" => {
                if matches!(options.source, Source::Config(_)) {
                    return Err("--config and --roll cannot be combined".to_string());
                }
                options.source = Source::Roll;
            }
            "--samples" | "-n" => {
                let raw = value(arg)?;
                let samples: usize = raw
                    .parse()
                    .map_err(|_| format!("--samples expects a whole number, got '{}'", raw))?;
                options.samples = Some(samples);
            }
            "--parallel" => options.parallel = true,
            "--latex" => options.latex = true,
            "--json" => options.json = Some(PathBuf::from(value(arg)?)),
            "--save-config" => options.save_config = Some(PathBuf::from(value(arg)?)),
            "--help" | "-h" => options.help = true,
            other => return Err(format!("unknown argument '{}'", other)),
        }
    }

    Ok(options)
}

fn prompt_line(prompt: &str) -> Option<String> {
    print!("{}", prompt);
    io::stdout().flush().ok()?;

    let mut input = String::new();
    io::stdin().lock().read_line(&mut input).ok()?;
    Some(input.trim().to_string())
}

fn prompt_f64(prompt: &str, default: f64) -> f64 {
    prompt_line(prompt)
        .and_then(|input| input.parse().ok())
        .unwrap_or(default)
}

fn prompt_support(prompt: &str, default: SupportKind) -> SupportKind {
    match prompt_line(prompt) {
        Some(input) if !input.is_empty() => SupportKind::parse(&input).unwrap_or_else(|e| {
            println!("  {} - using {}", e, default);
            default
        }),
        _ => default,
    }
}

fn prompt_configuration() -> BeamConfiguration {
    println!("Enter the beam (press Enter to keep the value in brackets).");
    println!("Supports: Fixed, Simple, Free");
    println!();

    let length = prompt_f64("Beam length L [10.0]: ", 10.0);
    let left = prompt_support("Left support [Simple]: ", SupportKind::Simple);
    let right = prompt_support("Right support [Simple]: ", SupportKind::Simple);

    let p = prompt_f64("Point load P [10.0]: ", 10.0);
    let half = length / 2.0;
    let p_at = prompt_f64(&format!("Point load position [{:.1}]: ", half), half);

    let w = prompt_f64("Distributed load w [0.0]: ", 0.0);
    let (w_start, w_end) = if w != 0.0 {
        let start = prompt_f64("Distributed load start [0.0]: ", 0.0);
        let end = prompt_f64(&format!("Distributed load end [{:.1}]: ", length), length);
        (start, end)
    } else {
        (0.0, length)
    };
    let stiffness = prompt_f64("Stiffness EI [1.0]: ", 1.0);
    println!();

    BeamConfiguration::new(length, left, right)
        .with_point_load(p, p_at)
        .with_distributed_load(w, w_start, w_end)
        .with_stiffness(stiffness)
}

fn run(options: &Options) -> CalcResult<()> {
    let (config, dice) = match &options.source {
        Source::Config(path) => {
            info!("Loading configuration from {}", path.display());
            (load_configuration(path)?, None)
        }
        Source::Roll => {
            let dice = DiceRolls::roll()?;
            (dice.interpret()?, Some(dice))
        }
        Source::Interactive => (prompt_configuration(), None),
    };
    config.validate()?;

    if let Some(path) = &options.save_config {
        save_configuration(&config, path)?;
        println!("Configuration saved to {}", path.display());
    }

    let mut settings = AnalysisSettings::default().with_parallel_fallback(options.parallel);
    if let Some(samples) = options.samples {
        settings = settings.with_sample_points(samples);
    }
    let precision = settings.precision;

    let result = BeamAnalyzer::new(settings).analyze(&config);
    print!("{}", report::render_report(&result, dice.as_ref(), options.latex, precision));

    if let Some(path) = &options.json {
        let mut saved = AnalysisReport::new(result);
        if let Some(dice) = dice {
            saved = saved.with_dice(dice);
        }
        save_report(&saved, path)?;
        println!("Report {} saved to {}", saved.id, path.display());
    }

    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("error: {}", message);
            eprintln!("{}", USAGE);
            return ExitCode::from(2);
        }
    };
    if options.help {
        println!("{}", USAGE);
        return ExitCode::SUCCESS;
    }

    println!("Beam Diagrams - shear and moment solver");
    println!("=======================================");
    println!();

    match run(&options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Ok(json) = serde_json::to_string_pretty(&e) {
                eprintln!();
                eprintln!("Error JSON:");
                eprintln!("{}", json);
            }
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn no_arguments_means_interactive() {
        assert_eq!(parse_args(&[]).unwrap(), Options::default());
    }

    #[test]
    fn parses_all_flags() {
        let options = parse_args(&args(&[
            "--config", "beam.json", "--samples", "200", "--parallel", "--latex", "--json", "out.json",
        ]))
        .unwrap();
        assert_eq!(options.source, Source::Config(PathBuf::from("beam.json")));
        assert_eq!(options.samples, Some(200));
        assert!(options.parallel);
        assert!(options.latex);
        assert_eq!(options.json, Some(PathBuf::from("out.json")));
        assert!(!options.help);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse_args(&args(&["--samples"])).unwrap_err().contains("requires a value"));
        assert!(parse_args(&args(&["--samples", "many"])).is_err());
        assert!(parse_args(&args(&["--roll", "--config", "a.json"])).is_err());
        assert!(parse_args(&args(&["--frobnicate"])).unwrap_err().contains("unknown argument"));
    }

    #[test]
    fn roll_and_help() {
        let options = parse_args(&args(&["-r", "-h"])).unwrap();
        assert_eq!(options.source, Source::Roll);
        assert!(options.help);
    }
}
