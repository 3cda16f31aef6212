use anyhow::{Result, bail};
use clap::{ArgMatches, CommandFactory, FromArgMatches, parser::ValueSource};
use quip_export_core::HttpTimeouts;
use quip_export_core::export::ResolvedLink;
use quip_export_core::export::constants::DEFAULT_API_URL;

use crate::app_config::{FileConfig, VerbositySetting};
use crate::cli::Args;

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct CliValueSources {
    pub(crate) output_dir: bool,
    pub(crate) api_url: bool,
    pub(crate) rate_limit: bool,
    pub(crate) token: bool,
    pub(crate) token_file: bool,
    pub(crate) verbose: bool,
    pub(crate) quiet: bool,
}

pub(crate) fn parse_cli_with_sources() -> (Args, CliValueSources) {
    let command = Args::command();
    let matches = command.get_matches();
    let args = Args::from_arg_matches(&matches).unwrap_or_else(|err| err.exit());

    let sources = CliValueSources {
        output_dir: is_commandline_value(&matches, "output_dir"),
        api_url: is_commandline_value(&matches, "api_url"),
        rate_limit: is_commandline_value(&matches, "rate_limit"),
        token: is_commandline_value(&matches, "token"),
        token_file: is_commandline_value(&matches, "token_file"),
        verbose: is_commandline_value(&matches, "verbose"),
        quiet: is_commandline_value(&matches, "quiet"),
    };
    (args, sources)
}

fn is_commandline_value(matches: &ArgMatches, id: &str) -> bool {
    matches.value_source(id) == Some(ValueSource::CommandLine)
}

pub(crate) fn apply_config_defaults(
    mut args: Args,
    cli_sources: &CliValueSources,
    file_config: Option<&FileConfig>,
) -> Result<Args> {
    if let Some(file_config) = file_config {
        if !cli_sources.output_dir
            && args.output_dir.is_none()
            && let Some(output_dir) = &file_config.output_dir
        {
            args.output_dir = Some(output_dir.clone());
        }

        if !cli_sources.api_url
            && args.api_url.is_none()
            && let Some(api_url) = &file_config.api_url
        {
            args.api_url = Some(api_url.clone());
        }

        if !cli_sources.rate_limit
            && let Some(rate_limit) = file_config.rate_limit
        {
            args.rate_limit = rate_limit;
        }

        if !cli_sources.token
            && !cli_sources.token_file
            && args.token.is_none()
            && let Some(token_file) = &file_config.token_file
        {
            args.token_file = Some(token_file.clone());
        }

        if !cli_sources.verbose
            && !cli_sources.quiet
            && let Some(verbosity) = file_config.verbosity
        {
            apply_config_verbosity(&mut args, verbosity);
        }
    }

    if args.rate_limit > 60_000 {
        bail!(
            "Invalid effective rate_limit value: {}. Expected range: 0..=60000",
            args.rate_limit
        );
    }

    Ok(args)
}

fn apply_config_verbosity(args: &mut Args, verbosity: VerbositySetting) {
    match verbosity {
        VerbositySetting::Default => {
            args.quiet = false;
            args.verbose = 0;
        }
        VerbositySetting::Verbose => {
            args.quiet = false;
            args.verbose = 1;
        }
        VerbositySetting::Quiet => {
            args.quiet = true;
            args.verbose = 0;
        }
        VerbositySetting::Debug => {
            args.quiet = false;
            args.verbose = 2;
        }
    }
}

pub(crate) fn resolve_http_timeouts(file_config: Option<&FileConfig>) -> HttpTimeouts {
    let mut timeouts = HttpTimeouts::default();
    let Some(file_config) = file_config else {
        return timeouts;
    };

    if let Some(value) = file_config.connect_timeout_secs {
        timeouts.connect_secs = value;
    }
    if let Some(value) = file_config.read_timeout_secs {
        timeouts.read_secs = value;
    }
    timeouts
}

/// API base URL: explicit setting, else derived from the link's host, else the default.
pub(crate) fn resolve_api_url(configured: Option<&str>, link: &ResolvedLink) -> String {
    let url = configured
        .map(str::to_string)
        .or_else(|| link.api_base_url())
        .unwrap_or_else(|| DEFAULT_API_URL.to_string());
    url.trim_end_matches('/').to_string()
}

pub(crate) fn resolve_default_log_level(args: &Args) -> &'static str {
    if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

pub(crate) fn should_force_cli_log_level(cli_sources: &CliValueSources) -> bool {
    cli_sources.verbose || cli_sources.quiet
}
