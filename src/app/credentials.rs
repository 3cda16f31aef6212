//! Access token and folder link acquisition.
//!
//! Values given on the command line (or through the config file's
//! `token_file`) are used as-is; anything missing is prompted for on stderr
//! and read from stdin.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use crate::cli::Args;

const TOKEN_PROMPT: &str = "Enter your Quip access token (from https://quip.com/dev/token): ";
const FOLDER_PROMPT: &str = "Enter the Quip folder link to export: ";

/// Returns the access token from `--token`, the token file, or a prompt.
pub(crate) fn resolve_token(args: &Args) -> Result<String> {
    if let Some(token) = &args.token {
        return non_empty(token, "access token");
    }
    if let Some(path) = &args.token_file {
        return read_token_file(&expand_home(path));
    }
    let stdin = io::stdin();
    prompt_from(&mut stdin.lock(), &mut io::stderr(), TOKEN_PROMPT)
        .and_then(|token| non_empty(&token, "access token"))
}

/// Returns the folder link from `--folder` or a prompt.
pub(crate) fn resolve_folder_link(args: &Args) -> Result<String> {
    if let Some(folder) = &args.folder {
        return non_empty(folder, "folder link");
    }
    let stdin = io::stdin();
    prompt_from(&mut stdin.lock(), &mut io::stderr(), FOLDER_PROMPT)
        .and_then(|link| non_empty(&link, "folder link"))
}

fn read_token_file(path: &Path) -> Result<String> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read token file '{}'", path.display()))?;
    non_empty(&raw, "access token")
        .with_context(|| format!("Token file '{}' is empty", path.display()))
}

/// Writes `prompt`, then reads one line from `input`.
pub(crate) fn prompt_from<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
) -> Result<String> {
    output.write_all(prompt.as_bytes())?;
    output.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn non_empty(value: &str, what: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        bail!("No {what} provided");
    }
    Ok(trimmed.to_string())
}

fn expand_home(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~")
        && let Some(home) = std::env::var_os("HOME").filter(|home| !home.is_empty())
    {
        return PathBuf::from(home).join(rest);
    }
    path.to_path_buf()
}
