//! Exit code logic for the exporter process.
//!
//! Single responsibility: map a session report to the process exit outcome.

use quip_export_core::export::FolderOutcome;
use quip_export_core::{SessionOutcome, SessionReport};

use crate::ProcessExit;

/// Determines the process exit outcome from a finished session.
///
/// Skipped documents and failed attachments do not fail the run; an
/// unreachable root folder does, because nothing was exported.
pub(crate) fn determine_exit_outcome(report: &SessionReport) -> ProcessExit {
    if report.root_folder == FolderOutcome::Skipped {
        ProcessExit::Failure
    } else if report.outcome == SessionOutcome::Interrupted {
        ProcessExit::Interrupted
    } else {
        ProcessExit::Success
    }
}
