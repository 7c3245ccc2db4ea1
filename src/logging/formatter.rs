use std::fmt;
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::{format::Writer, FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

/// Scope shown for events emitted outside any subcommand (startup, config loading)
const NO_COMMAND: &str = "main";

/// One bracketed line per event:
/// `[TIMESTAMP]  [LEVEL] [SUBCOMMAND] [TARGET: FILE:LINE]: MESSAGE`
///
/// Each subcommand runs inside a span named after it, so the third field is
/// the outermost span of the event.
pub struct BracketedFormatter;

impl<S, N> FormatEvent<S, N> for BracketedFormatter
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

        let now = chrono::Local::now();
        write!(writer, "[{}]  ", now.format("%Y-%m-%dT%H:%M:%S%.6f"))?;
        write!(writer, "[{:5}] ", metadata.level())?;

        let command = ctx
            .event_scope()
            .and_then(|scope| scope.from_root().next().map(|span| span.name()))
            .unwrap_or(NO_COMMAND);
        write!(writer, "[{}] ", command)?;

        match (metadata.file(), metadata.line()) {
            (Some(file), Some(line)) => write!(writer, "[{}: {}:{}]: ", metadata.target(), file, line)?,
            _ => write!(writer, "[{}]: ", metadata.target())?,
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

#[cfg(test)]
mod tests {
    use crate::logging::capture::CapturedLog;
    use crate::logging::with_bootstrap_logging;
    use tracing::{info, info_span};

    #[test]
    fn test_scope_is_the_subcommand_span() {
        let log = CapturedLog::default();
        let writer = log.clone();
        with_bootstrap_logging("info", move || writer.clone(), || {
            info!("before");
            let _command = info_span!("split").entered();
            let _inner = info_span!("copy").entered();
            info!("inside");
        });

        let output = log.contents();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2, "{}", output);
        assert!(lines[0].contains("[INFO ] [main] ["), "{}", lines[0]);
        assert!(lines[1].contains("[INFO ] [split] ["), "{}", lines[1]);
        assert!(lines[1].ends_with("]: inside"), "{}", lines[1]);
        assert!(lines[1].contains("formatter.rs:"), "{}", lines[1]);
    }
}
