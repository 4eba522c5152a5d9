use std::process::ExitCode;

fn main() -> ExitCode {
    frontdesk_cli::run()
}
