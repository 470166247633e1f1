//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use courier_cli::CliError;

fn main() {
    match courier_cli::run() {
        Ok(()) => {}
        // Help and version requests are reported by clap with its own exit code.
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => {
            eprintln!("courier: {err}");
            std::process::exit(1);
        }
    }
}
