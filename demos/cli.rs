//! Command-line interface for iridoscan
//!
//! Runs one eye photograph through the full pipeline using the fixed-fraction
//! detector, so the eye must be framed where that detector expects it.

use std::{env, fs, path::Path, process};

use iridoscan::image_loader::{encode_png, is_supported_extension};
use iridoscan::{AnalysisOutput, CaptureMode, EyeSide, IrisPipeline, PipelineConfig};
use tracing::Level;

fn main() {
    let args: Vec<String> = env::args().collect();

    let mut config_path = None;
    let mut output_path = None;
    let mut eye = EyeSide::Left;
    let mut both_eyes = false;
    let mut verbose = false;
    let mut image_path_arg = None;

    // Parse arguments
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                i += 1;
                config_path = Some(required_value(&args, i, "--config"));
            }
            "--out" => {
                i += 1;
                output_path = Some(required_value(&args, i, "--out"));
            }
            "--eye" => {
                i += 1;
                eye = match required_value(&args, i, "--eye").as_str() {
                    "left" => EyeSide::Left,
                    "right" => EyeSide::Right,
                    other => {
                        eprintln!("Error: --eye expects 'left' or 'right', got '{}'", other);
                        process::exit(1);
                    }
                };
            }
            "--both-eyes" => both_eyes = true,
            "--verbose" | "-v" => verbose = true,
            "--help" | "-h" => {
                print_help(&args[0]);
                process::exit(0);
            }
            arg if !arg.starts_with("--") => {
                if image_path_arg.is_none() {
                    image_path_arg = Some(arg.to_string());
                } else {
                    eprintln!("Error: Multiple image paths provided");
                    process::exit(1);
                }
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                eprintln!("Use --help for usage information");
                process::exit(1);
            }
        }
        i += 1;
    }

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if verbose { Level::DEBUG } else { Level::WARN })
        .init();

    let image_path_str = match image_path_arg {
        Some(path) => path,
        None => {
            print_help(&args[0]);
            process::exit(1);
        }
    };
    let image_path = Path::new(&image_path_str);

    let supported = image_path
        .extension()
        .and_then(|e| e.to_str())
        .map(is_supported_extension)
        .unwrap_or(false);
    if !supported {
        eprintln!("Error: Unsupported file type '{}'", image_path.display());
        process::exit(1);
    }

    let mut config = match config_path {
        Some(path) => load_config(Path::new(&path)),
        None => PipelineConfig::default(),
    };
    if both_eyes {
        config.capture.mode = CaptureMode::BothEyes;
    }

    let bytes = match fs::read(image_path) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("Error: Failed to read '{}': {}", image_path.display(), e);
            process::exit(1);
        }
    };

    let result = IrisPipeline::with_placeholder(config, eye)
        .and_then(|pipeline| pipeline.analyze(&bytes, eye));
    match result {
        Ok(output) => {
            print_result(&output);
            if let Some(path) = output_path {
                save_normalized(&output, Path::new(&path));
            }
        }
        Err(error) => {
            eprintln!("Analysis failed: {}", error);
            if error.is_recoverable() {
                eprintln!("Suggestion: {}", error.user_message());
            }
            process::exit(1);
        }
    }
}

fn required_value(args: &[String], i: usize, flag: &str) -> String {
    match args.get(i) {
        Some(value) if !value.starts_with("--") => value.clone(),
        _ => {
            eprintln!("Error: {} requires a value", flag);
            process::exit(1);
        }
    }
}

fn load_config(path: &Path) -> PipelineConfig {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Error: Failed to read config '{}': {}", path.display(), e);
            process::exit(1);
        }
    };
    match PipelineConfig::from_json_str(&text) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: Invalid config '{}': {}", path.display(), e);
            process::exit(1);
        }
    }
}

fn print_help(program_name: &str) {
    eprintln!("Usage: {} [OPTIONS] <image_path>", program_name);
    eprintln!();
    eprintln!("Analyze an eye photograph zone by zone.");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --eye left|right   Eye to analyze (default: left)");
    eprintln!("  --both-eyes        Expect a face-framed capture with both eyes");
    eprintln!("  --config FILE      JSON pipeline configuration");
    eprintln!("  --out FILE         Save the normalized iris as PNG");
    eprintln!("  --verbose, -v      Log pipeline stages to stderr");
    eprintln!("  --help, -h         Show this help message");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  {} eye.jpg", program_name);
    eprintln!("  {} --eye right --out iris.png eye.png", program_name);
    eprintln!("  {} --both-eyes --config capture.json face.jpg", program_name);
}

fn save_normalized(output: &AnalysisOutput, path: &Path) {
    let bytes = match encode_png(&output.normalized.image) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("Warning: Failed to encode normalized iris: {}", e);
            return;
        }
    };
    match fs::write(path, bytes) {
        Ok(()) => eprintln!("Saved normalized iris to {}", path.display()),
        Err(e) => eprintln!("Warning: Failed to save normalized iris: {}", e),
    }
}

fn print_result(output: &AnalysisOutput) {
    // JSON to stdout for programmatic use
    match output.analysis.to_json() {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing result: {}", e);
            process::exit(1);
        }
    }

    // Summary to stderr for human reading
    let analysis = &output.analysis;
    let color = &analysis.overall_color;
    eprintln!();
    eprintln!("Iris Analysis Summary ({} eye):", analysis.eye_side);
    eprintln!("  Color: {} ({})", color.dominant, color.hex);
    eprintln!("  Capture quality: {:.0}%", output.quality.metrics.overall * 100.0);
    eprintln!("  Confidence: {:.0}%", analysis.analysis_confidence * 100.0);
    if analysis.insights.is_empty() {
        eprintln!("  No zone stands out from the rest of the iris.");
    }
    for insight in &analysis.insights {
        eprintln!("  [{:?}] {}", insight.confidence, insight.message);
    }
}
