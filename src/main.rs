use std::process::ExitCode;

fn main() -> ExitCode {
    match releasekit::cli::run() {
        Ok(code) => code,
        Err(e) => {
            releasekit::ui::output::error(format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}
