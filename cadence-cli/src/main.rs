//! # Cadence
//!
//! Replays a JSON-lines message log at recorded pace. Messages and playback
//! broadcasts go to stdout as JSON lines; control requests are read from
//! stdin.

use log::error;

mod cli;
mod controls;
mod logging;
mod runner;
mod sink;

fn main() {
    logging::init();
    let args = cli::args::build_cli().get_matches();

    let code = match runner::run(&args) {
        Ok(code) => code,
        Err(err) => {
            error!("{}", err);
            1
        }
    };

    std::process::exit(code)
}
