//! CLI entry point for the Quip folder exporter.

use std::process::ExitCode;

mod app;
mod app_config;
mod cli;

/// Process outcome of one export run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ProcessExit {
    /// The tree was exported (individual items may have been skipped).
    Success,
    /// Ctrl+C stopped the export; what finished is on disk.
    Interrupted,
    /// Nothing could be exported.
    Failure,
}

impl ProcessExit {
    pub(crate) fn code(self) -> u8 {
        match self {
            Self::Success | Self::Interrupted => 0,
            Self::Failure => 1,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let exit = app::runtime::run_export().await?;
    Ok(ExitCode::from(exit.code()))
}
