// Entrypoint for the CLI application.
// - Keeps `main` small: build the console sink and hand it to the UI loop.
// - A Ctrl-C during any prompt surfaces as an Interrupted io::Error; that
//   is a normal way to leave the tool, so it exits with status 0.

use std::io;
use std::process::ExitCode;
use team_invite_cli::{output::ConsoleSink, ui};

fn main() -> ExitCode {
    // During the blocking send the terminal is in cooked mode, so Ctrl-C
    // arrives as SIGINT rather than an Interrupted read. The handler
    // flags the UI's wait loop, which then errors out with the same
    // Interrupted kind the prompts produce.
    if let Err(err) = ctrlc::set_handler(ui::flag_interrupt) {
        eprintln!("Fatal error: {:#}", err);
        return ExitCode::FAILURE;
    }

    let sink = ConsoleSink::default();
    match ui::run(&sink) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) if is_interrupt(&err) => {
            println!();
            println!("Operation cancelled");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Fatal error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn is_interrupt(err: &anyhow::Error) -> bool {
    err.downcast_ref::<io::Error>()
        .map(|io_err| io_err.kind() == io::ErrorKind::Interrupted)
        .unwrap_or(false)
}
