use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use anyhow::{Context, Result};
use quip_export_core::export::constants::DEFAULT_OUTPUT_DIR;
use quip_export_core::{
    ClientConfig, ExportConfig, ExportSession, QuipClient, SessionReport, resolve_link,
};
use tracing::{debug, info, warn};

use crate::ProcessExit;
use crate::app::{config_runtime, credentials, exit_handler, progress_manager, terminal};
use crate::app_config;

pub(crate) async fn run_export() -> Result<ProcessExit> {
    let (args, cli_sources) = config_runtime::parse_cli_with_sources();

    let loaded = app_config::load_default_file_config()?;
    let args = config_runtime::apply_config_defaults(args, &cli_sources, loaded.config.as_ref())?;
    let http_timeouts = config_runtime::resolve_http_timeouts(loaded.config.as_ref());

    let default_level = config_runtime::resolve_default_log_level(&args);
    let force_cli_log_level = config_runtime::should_force_cli_log_level(&cli_sources);
    let no_color = terminal::is_no_color_requested(&args);
    terminal::init_tracing(default_level, force_cli_log_level, no_color);

    debug!(?args, "CLI arguments parsed");
    if let (Some(path), Some(_)) = (&loaded.path, &loaded.config) {
        debug!(path = %path.display(), "Loaded config file");
    }

    let token = credentials::resolve_token(&args)?;
    let folder_link = credentials::resolve_folder_link(&args)?;
    let link = resolve_link(&folder_link)
        .context("Expected a folder link such as https://quip.com/AbCdEf123456")?;

    let api_url = config_runtime::resolve_api_url(args.api_url.as_deref(), &link);
    info!(api_url = %api_url, "Using Quip API");

    let client = QuipClient::new(ClientConfig {
        timeouts: http_timeouts,
        ..ClientConfig::new(api_url, token)
    })?;

    let output_root = args
        .output_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));
    if args.rate_limit == 0 {
        debug!("throttling disabled");
    }
    let config = ExportConfig {
        output_root,
        throttle_interval: Duration::from_millis(args.rate_limit),
        http_timeouts,
    };
    let session = ExportSession::new(config, Arc::new(client))?;

    let interrupted_signal = session.interrupt_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            interrupted_signal.store(true, Ordering::SeqCst);
        }
    });

    let use_spinner = terminal::should_use_spinner(
        io::stderr().is_terminal(),
        args.quiet,
        terminal::is_dumb_terminal(),
    );
    let (progress_handle, progress_stop) =
        progress_manager::spawn_progress_ui(use_spinner, session.stats());

    let result = session.run(&folder_link).await;

    progress_stop.store(true, Ordering::SeqCst);
    if let Some(handle) = progress_handle {
        let _ = handle.await;
    }

    let report = result?;
    log_summary(&report);

    let exit = exit_handler::determine_exit_outcome(&report);
    if exit == ProcessExit::Failure {
        warn!(
            folder_id = %report.root_id,
            "Root folder could not be exported. Check the link and access token."
        );
    }
    Ok(exit)
}

fn log_summary(report: &SessionReport) {
    let summary = &report.summary;
    info!(
        items = summary.items_visited,
        folders = summary.folders_exported,
        folders_skipped = summary.folders_skipped,
        documents = summary.documents_written(),
        html_fallbacks = summary.documents_fallback,
        documents_skipped = summary.documents_skipped + summary.documents_without_output,
        attachments = summary.attachments_downloaded,
        attachments_failed = summary.attachments_failed,
        throttled_secs = report.throttled.as_secs(),
        "Export summary"
    );
    if report.is_partial() {
        warn!("Interrupted. Run again to complete the export; finished files are overwritten.");
    }
}
