use std::process::ExitCode;

fn main() -> ExitCode {
    match cfgstore::cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
