//! play-sound: play a random notification sound for an event category.
//!
//! Looks up `<base>/<category>/*.wav`, picks one file at random and hands it
//! to afplay, paplay/aplay/play or PowerShell depending on the host.

use std::process::ExitCode;

use sound_dispatch::cli;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = match cli::parse_args(std::env::args_os()) {
        Ok(args) => args,
        Err(code) => return ExitCode::from(code),
    };

    ExitCode::from(cli::run(&args))
}
