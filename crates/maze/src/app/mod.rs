mod bootstrap;
mod controls;
mod loop_runner;
mod paths;
mod renderer;
mod tilt;
mod walker;

use std::process::ExitCode;

use tracing::error;

pub(crate) use bootstrap::build_app;
use bootstrap::AppWiring;

pub(crate) fn run(app: AppWiring) -> ExitCode {
    if let Err(err) = loop_runner::run_app(app.config) {
        error!(error = %err, "startup_failed");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
