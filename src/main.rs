#![deny(
    clippy::all,
    missing_debug_implementations,
    missing_copy_implementations
)]
#![warn(clippy::pedantic)]

use std::process::ExitCode;

use confy::ConfyError;

mod app;
mod config;
mod logging;

use app::App;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to load config")]
    Load(#[from] ConfyError),

    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("failed to round balance")]
    Run(#[from] rounder_lib::Error),
}

impl Error {
    fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Run(e) if e.is_auth_failure())
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let app = App::from_cli();
    logging::set_up(app.verbosity());

    match app.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = ?e, "run failed");
            if e.is_auth_failure() {
                eprintln!("Authentication failed");
            }
            eprintln!("{}", report(&e));
            ExitCode::FAILURE
        }
    }
}

/// Render an error and its chain of causes on one line
fn report(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message += &format!(": {}", cause);
        source = cause.source();
    }
    message
}
