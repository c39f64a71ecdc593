//! Log output and error display
//!
//! Verbose runs write one line per event to stdout:
//! `<UTC timestamp> - <level> - <source file>:<line> - <message>`.
//! Quiet runs only surface warnings and errors on stderr.

use std::fmt;
use std::path::Path;

use anyhow::{anyhow, Result};
use time::macros::format_description;
use time::OffsetDateTime;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::EnvFilter;

/// Event format for verbose runs
#[derive(Debug, Clone, Copy, Default)]
pub struct CiLineFormat;

impl<S, N> FormatEvent<S, N> for CiLineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let metadata = event.metadata();
        let timestamp = format_timestamp(OffsetDateTime::now_utc()).map_err(|_| fmt::Error)?;
        write!(
            writer,
            "{}",
            line_prefix(
                &timestamp,
                metadata.level(),
                metadata.file().unwrap_or("<unknown>"),
                metadata.line().unwrap_or(0),
            )
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// `2024-01-31T12:00:00Z`
pub fn format_timestamp(now: OffsetDateTime) -> Result<String, time::error::Format> {
    now.format(format_description!(
        "[year]-[month]-[day]T[hour]:[minute]:[second]Z"
    ))
}

/// Level label as shown in log lines
pub fn level_label(level: &Level) -> &'static str {
    match level.as_str() {
        "WARN" => "WARNING",
        other => other,
    }
}

/// Everything on a log line before the message
pub fn line_prefix(timestamp: &str, level: &Level, file: &str, line: u32) -> String {
    let file = Path::new(file)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(file);
    format!(
        "{timestamp} - {:>7} - {file:>30}:{line:>4} - ",
        level_label(level)
    )
}

/// Send INFO and above to stdout in the verbose line format
pub fn register_log_handler() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_writer(std::io::stdout)
        .event_format(CiLineFormat)
        .try_init()
        .map_err(|e| anyhow!(e))
}

/// Default logging for non-verbose runs
pub fn init_default_logging() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::WARN.into()))
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!(e))
}

/// Print an error and its causes to stderr
pub fn display_error(err: &anyhow::Error) {
    eprintln!("✗ Error: {err}");
    for cause in err.chain().skip(1) {
        eprintln!("  Caused by: {cause}");
    }
}
