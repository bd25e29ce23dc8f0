//! Watermark CLI
//!
//! Command-line front end for the watermark library.

use anyhow::{bail, Context};
use log::{debug, info};
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use watermark::core::settings::{DEFAULT_SETTINGS_FILE, PARALLEL_ENV};
use watermark::prelude::*;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<WatermarkError>().and_then(WatermarkError::as_validation) {
                // Validation messages are meant for the user as-is.
                Some(validation) => {
                    println!("{}", validation);
                    if let Some(fix) = validation.suggested_fix() {
                        debug!("suggested fix: {}", fix);
                    }
                }
                None => eprintln!("Error: {:#}", err),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(args: &[String]) -> anyhow::Result<()> {
    let program = args.first().map(String::as_str).unwrap_or(watermark::NAME);
    let mut rest = args.get(1..).unwrap_or_default();

    let mut settings_path: Option<PathBuf> = None;
    if rest.first().map(String::as_str) == Some("--settings") {
        let Some(path) = rest.get(1) else {
            bail!("--settings needs a file path");
        };
        settings_path = Some(PathBuf::from(path));
        rest = &rest[2..];
    }

    let settings = Settings::load(settings_path.as_deref()).context("failed to load settings")?;
    let env = env_logger::Env::default().default_filter_or(&settings.log_filter);
    env_logger::Builder::from_env(env).init();
    debug!("settings: {:?}", settings);

    let compositor = Compositor::with_options(
        CompositeOptions::new()
            .with_parallel(settings.parallel)
            .with_progress(|update| {
                if let ProgressUpdate::Completed {
                    total_duration_ms,
                    tiles_processed,
                } = update
                {
                    info!("blended {} tile(s) in {}ms", tiles_processed, total_duration_ms);
                }
            }),
    );

    match rest.first().map(String::as_str) {
        None | Some("interactive") => interactive(&compositor, &settings),
        Some("apply") => {
            let Some(job) = rest.get(1) else {
                eprintln!("Error: Please specify a job file");
                print_usage(program);
                bail!("missing job file");
            };
            apply(Path::new(job), &compositor, &settings)
        }
        Some("info") => {
            let Some(image) = rest.get(1) else {
                eprintln!("Error: Please specify an image file");
                print_usage(program);
                bail!("missing image file");
            };
            image_info(Path::new(image))
        }
        Some("help" | "--help" | "-h") => {
            print_usage(program);
            Ok(())
        }
        Some(other) => {
            print_usage(program);
            bail!("unknown command: {}", other)
        }
    }
}

fn print_usage(program: &str) {
    println!("Watermark v{}", watermark::VERSION);
    println!();
    println!("Usage: {} [--settings <file>] <command>", program);
    println!();
    println!("Commands:");
    println!("  interactive       Ask for every input on the terminal (default)");
    println!("  apply <job>       Run a TOML or JSON job file");
    println!("  info <image>      Show image metadata");
    println!("  help              Show this help message");
    println!();
    println!("Settings are read from {} when --settings is not given.", DEFAULT_SETTINGS_FILE);
    println!("Set {}=false to blend on a single thread.", PARALLEL_ENV);
}

fn interactive(compositor: &Compositor, settings: &Settings) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut session = InteractiveSession::new(stdin.lock(), io::stdout());
    session.run(compositor, settings.jpeg_quality)?;
    Ok(())
}

fn apply(job_file: &Path, compositor: &Compositor, settings: &Settings) -> anyhow::Result<()> {
    let spec = JobSpec::from_file(job_file)?;
    let job = spec.prepare()?;
    for warning in &job.report().warnings {
        println!("Warning: {}", warning.message);
    }

    let output = job.run(compositor, settings.jpeg_quality)?;
    println!("The watermarked image {} has been created.", output.display());
    Ok(())
}

fn image_info(path: &Path) -> anyhow::Result<()> {
    let raster = load_raster(path)?;
    println!("{}", ImageReport::from_raster(path, &raster));
    Ok(())
}
