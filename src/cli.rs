//! CLI argument definitions using clap derive macros.

use std::fmt;
use std::path::PathBuf;

use clap::Parser;

/// Mirror a Quip folder tree onto the local filesystem.
///
/// Every folder becomes a directory, every document a .docx file (or .html
/// when the export is unavailable), and attachments are saved next to their
/// document in a `<title>_attachments` directory.
#[derive(Parser, Clone)]
#[command(name = "quip-export")]
#[command(author, version, about)]
pub struct Args {
    /// Quip personal access token (prompted for when neither this nor --token-file is given)
    #[arg(short = 't', long = "token", value_name = "TOKEN")]
    pub token: Option<String>,

    /// File containing the access token
    #[arg(long, value_name = "PATH", conflicts_with = "token")]
    pub token_file: Option<PathBuf>,

    /// Link to the Quip folder to export (prompted for when absent)
    #[arg(short = 'f', long = "folder", value_name = "LINK")]
    pub folder: Option<String>,

    /// Output directory [default: ./quip_export]
    #[arg(short = 'o', long = "output", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Quip API base URL [default: derived from the folder link, else https://platform.quip-amazon.com]
    #[arg(long, value_name = "URL")]
    pub api_url: Option<String>,

    /// Minimum delay between items in milliseconds (0 to disable, max 60000)
    #[arg(short = 'l', long, default_value_t = 500, value_parser = clap::value_parser!(u64).range(0..=60000))]
    pub rate_limit: u64,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored log output
    #[arg(long)]
    pub no_color: bool,
}

impl fmt::Debug for Args {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Args")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("token_file", &self.token_file)
            .field("folder", &self.folder)
            .field("output_dir", &self.output_dir)
            .field("api_url", &self.api_url)
            .field("rate_limit", &self.rate_limit)
            .field("verbose", &self.verbose)
            .field("quiet", &self.quiet)
            .field("no_color", &self.no_color)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default_args_parses_successfully() {
        let args = Args::try_parse_from(["quip-export"]).unwrap();
        assert_eq!(args.verbose, 0);
        assert!(!args.quiet);
        assert!(args.token.is_none());
        assert!(args.folder.is_none());
        assert!(args.output_dir.is_none());
        assert_eq!(args.rate_limit, 500);
    }

    #[test]
    fn test_cli_short_flags() {
        let args = Args::try_parse_from([
            "quip-export",
            "-t",
            "abc",
            "-f",
            "https://quip.com/F1",
            "-o",
            "out",
            "-l",
            "250",
        ])
        .unwrap();
        assert_eq!(args.token.as_deref(), Some("abc"));
        assert_eq!(args.folder.as_deref(), Some("https://quip.com/F1"));
        assert_eq!(args.output_dir, Some(PathBuf::from("out")));
        assert_eq!(args.rate_limit, 250);
    }

    #[test]
    fn test_cli_long_flags() {
        let args = Args::try_parse_from([
            "quip-export",
            "--token-file",
            "/tmp/token",
            "--folder",
            "https://quip.com/F1",
            "--output",
            "out",
            "--api-url",
            "https://platform.example.com",
            "--no-color",
        ])
        .unwrap();
        assert_eq!(args.token_file, Some(PathBuf::from("/tmp/token")));
        assert_eq!(args.api_url.as_deref(), Some("https://platform.example.com"));
        assert!(args.no_color);
    }

    #[test]
    fn test_cli_token_and_token_file_conflict() {
        let result = Args::try_parse_from(["quip-export", "-t", "a", "--token-file", "b"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_cli_verbose_flag_increments_count() {
        let args = Args::try_parse_from(["quip-export", "-v"]).unwrap();
        assert_eq!(args.verbose, 1);

        let args = Args::try_parse_from(["quip-export", "-vv"]).unwrap();
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_cli_quiet_flag_sets_quiet() {
        let args = Args::try_parse_from(["quip-export", "--quiet"]).unwrap();
        assert!(args.quiet);
    }

    #[test]
    fn test_cli_help_flag_shows_usage() {
        let result = Args::try_parse_from(["quip-export", "--help"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_cli_rate_limit_zero_disables() {
        let args = Args::try_parse_from(["quip-export", "-l", "0"]).unwrap();
        assert_eq!(args.rate_limit, 0);
    }

    #[test]
    fn test_cli_rate_limit_over_max_rejected() {
        let result = Args::try_parse_from(["quip-export", "-l", "60001"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_cli_debug_output_redacts_token() {
        let args = Args::try_parse_from(["quip-export", "-t", "super-secret"]).unwrap();
        let rendered = format!("{args:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
