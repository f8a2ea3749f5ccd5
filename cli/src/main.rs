//! Terminal front end: read an update id, print its download link.

mod transport;

use std::io::{self, BufRead, Write};
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use uuid::Uuid;
use wu_core::{ServiceConfig, UpdateClient};

use transport::UreqTransport;

const NOT_FOUND: &str = "Not Found";

#[derive(Parser)]
#[command(
    name = "wu-link",
    about = "Resolve an update id into its download link",
    version
)]
struct Cli {
    /// Update id (UUID). Prompted for when omitted.
    update_id: Option<String>,

    /// Client web service endpoint.
    #[arg(long, env = "WU_ENDPOINT", default_value = wu_core::config::SECURED_ENDPOINT)]
    endpoint: String,

    /// Give up on the request after this many seconds.
    #[arg(long, env = "WU_TIMEOUT_SECS", default_value_t = 30)]
    timeout_secs: u64,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Wait for Enter before exiting.
    #[arg(long)]
    pause: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut stdout = io::stdout();

    let update_id = match cli.update_id {
        Some(id) => id,
        None => prompt_update_id(&mut input, &mut stdout).context("failed to read update id")?,
    };
    if Uuid::parse_str(&update_id).is_err() {
        tracing::warn!(%update_id, "update id is not a UUID; sending it anyway");
    }

    let client = UpdateClient::new(ServiceConfig::with_endpoint(&cli.endpoint));
    let transport = UreqTransport::new(Duration::from_secs(cli.timeout_secs));
    let url = client
        .resolve_download_url(&update_id, &transport)
        .with_context(|| format!("failed to resolve update {update_id}"))?;

    writeln!(stdout, "\nDownload link: {}\n", link_or_not_found(url.as_deref()))?;

    if cli.pause {
        write!(stdout, "Press Enter to close")?;
        stdout.flush()?;
        let mut line = String::new();
        input.read_line(&mut line)?;
    }
    Ok(())
}

/// Ask for an id and return the first whitespace-separated token entered.
fn prompt_update_id<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> anyhow::Result<String> {
    write!(output, "Type update ID (uuid version 4): ")?;
    output.flush()?;

    let mut line = String::new();
    loop {
        line.clear();
        if input.read_line(&mut line)? == 0 {
            anyhow::bail!("no update id entered");
        }
        if let Some(token) = line.split_whitespace().next() {
            return Ok(token.to_string());
        }
    }
}

fn link_or_not_found(url: Option<&str>) -> &str {
    url.unwrap_or(NOT_FOUND)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn prompt_takes_first_token() {
        let mut input = Cursor::new("  6f1d2c3b-4a59-4e7f-9a8b-0c1d2e3f4a5b trailing\n");
        let mut output = Vec::new();
        let id = prompt_update_id(&mut input, &mut output).unwrap();
        assert_eq!(id, "6f1d2c3b-4a59-4e7f-9a8b-0c1d2e3f4a5b");
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "Type update ID (uuid version 4): "
        );
    }

    #[test]
    fn prompt_skips_blank_lines() {
        let mut input = Cursor::new("\n   \nabc\n");
        let id = prompt_update_id(&mut input, &mut Vec::new()).unwrap();
        assert_eq!(id, "abc");
    }

    #[test]
    fn prompt_fails_on_eof() {
        let mut input = Cursor::new("");
        assert!(prompt_update_id(&mut input, &mut Vec::new()).is_err());
    }

    #[test]
    fn missing_link_prints_not_found() {
        assert_eq!(link_or_not_found(None), "Not Found");
        assert_eq!(link_or_not_found(Some("http://x/y")), "http://x/y");
    }

    #[test]
    fn cli_defaults() {
        let cli = Cli::try_parse_from(["wu-link", "abc"]).unwrap();
        assert_eq!(cli.update_id.as_deref(), Some("abc"));
        assert_eq!(cli.timeout_secs, 30);
        assert!(!cli.pause);
    }
}
