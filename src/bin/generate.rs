//! Binary entry point: wires CLI (C12) → Reader (C13) → Engine (C1–C11) →
//! Writer (C14), with the progress reporter (C15) and logger (C17)
//! observing the loop.

use std::process::ExitCode;

use clap::Parser;
use rand::SeedableRng;

use arraygen::cli::Args;
use arraygen::io::{read_input_file, read_partial_file, write_rows};
use arraygen::progress::{Progress, Verbosity};
use arraygen::{enumerate, logging, score};

fn main() -> ExitCode {
    let args = Args::parse();
    logging::init(args.debug, args.silent);

    match run(&args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

fn run(args: &Args) -> arraygen::Result<ExitCode> {
    let params = args.parameters()?;
    let profile = read_input_file(&args.input_file, params.t, params.d, params.delta, params.mode)?;

    let partial_rows = match &args.partial {
        Some(path) => read_partial_file(path, &profile.levels)?,
        None => Vec::new(),
    };

    let rng = rand::rngs::SmallRng::from_os_rng();
    let max_threads = num_cpus::get();
    let mut engine = enumerate::build(
        &profile.levels,
        params.t as usize,
        params.d as usize,
        params.delta,
        params.mode,
        max_threads,
        rng,
    )?;

    let verbosity = Verbosity::resolve(args.verbose, args.halfway, args.silent);
    let progress = Progress::new(verbosity);

    for row in &partial_rows {
        score::update_array(&mut engine, row, true);
        progress.row_committed(&engine, row);
    }

    let run_result = engine.run_with(|engine, row| progress.row_committed(engine, row));
    let exit_code = match run_result {
        Ok(()) => 0,
        Err(arraygen::Error::Stagnation { .. }) => {
            progress.warn("score stagnated; requested properties may be infeasible with this budget");
            0
        }
        Err(e @ arraygen::Error::OutOfMemory { fatal: false, .. }) => {
            progress.warn(&e.to_string());
            0
        }
        Err(e) => return Err(e),
    };

    write_rows(args.output_file.as_deref(), &engine.rows)?;
    progress.finished(&engine);

    Ok(ExitCode::from(exit_code))
}
