use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use fea2d_script::{Interpreter, Report};
use fea2d_solver::ModelState;
use log::info;

fn usage() {
    eprintln!("usage: fea2d [--json] <script>");
    eprintln!();
    eprintln!("Logging is controlled by FEA2D_LOG (default: info).");
}

fn print_report(report: &Report, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(report)?);
    } else {
        print!("{report}");
    }
    Ok(())
}

fn run(path: &Path, json: bool) -> Result<()> {
    let mut interpreter = Interpreter::new();
    let mut output = Ok(());
    let status = interpreter.run_file(path, |report| {
        if output.is_ok() {
            output = print_report(&report, json);
        }
    });
    output?;
    status.with_context(|| format!("failed to run {}", path.display()))?;

    if interpreter.model().state() != ModelState::Finalized {
        info!("script ended without FINISH");
    }
    Ok(())
}

fn main() -> ExitCode {
    let _ = env_logger::Builder::from_env(
        env_logger::Env::new().filter_or("FEA2D_LOG", "info"),
    )
    .format_timestamp(None)
    .try_init();

    let mut json = false;
    let mut script = None;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--json" => json = true,
            "-h" | "--help" => {
                usage();
                return ExitCode::SUCCESS;
            }
            _ if arg.starts_with('-') || script.is_some() => {
                usage();
                return ExitCode::from(2);
            }
            _ => script = Some(arg),
        }
    }
    let Some(script) = script else {
        usage();
        return ExitCode::from(2);
    };

    match run(Path::new(&script), json) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(1)
        }
    }
}
