use std::process::ExitCode;

fn main() -> ExitCode {
    papermill::cli::run()
}
