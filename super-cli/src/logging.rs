use anyhow::Result;
use chrono::Local;
use std::{
    fs::File,
    io::{self, IsTerminal, Write},
    path::Path,
    sync::{Arc, Mutex, MutexGuard, Once, OnceLock, PoisonError},
};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::{
    EnvFilter,
    fmt::{
        FmtContext, MakeWriter,
        format::{FormatEvent, FormatFields, Writer},
    },
    layer::SubscriberExt,
    registry::LookupSpan,
    reload,
    util::SubscriberInitExt,
};

const DEFAULT_FILTER: &str = "info";

// --- Formatter ---

/// `<local timestamp> <LEVEL> <module>: <fields>`, coloured on a terminal.
struct EventLine;

impl<S, N> FormatEvent<S, N> for EventLine
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let meta = event.metadata();
        let ansi = writer.has_ansi_escapes();

        let timestamp = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
        if ansi {
            write!(writer, "\x1b[2m{timestamp}\x1b[0m ")?;
        } else {
            write!(writer, "{timestamp} ")?;
        }

        let colour = match *meta.level() {
            Level::ERROR => "\x1b[1;31m",
            Level::WARN => "\x1b[1;33m",
            Level::INFO => "\x1b[1;32m",
            Level::DEBUG => "\x1b[1;34m",
            Level::TRACE => "\x1b[1;35m",
        };
        if ansi {
            write!(writer, "{colour}{:>5}\x1b[0m ", meta.level())?;
        } else {
            write!(writer, "{:>5} ", meta.level())?;
        }

        if let Some(target) = meta.module_path() {
            write!(writer, "{target}: ")?;
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

// --- Late-bound file writer ---

type FileHandle = Arc<Mutex<Option<File>>>;

/// Writes to the log file once one is set; discards until then.
#[derive(Clone)]
struct LogFileSlot(FileHandle);

struct LogFileGuard<'a>(MutexGuard<'a, Option<File>>);

impl Write for LogFileGuard<'_> {
    fn write(
        &mut self,
        buf: &[u8],
    ) -> io::Result<usize> {
        match &mut *self.0 {
            Some(f) => f.write(buf),
            None => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut *self.0 {
            Some(f) => f.flush(),
            None => Ok(()),
        }
    }
}

impl<'a> MakeWriter<'a> for LogFileSlot {
    type Writer = LogFileGuard<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        LogFileGuard(self.0.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

// --- Statics ---

type SetLevelFn = Box<dyn Fn(&str) -> Result<()> + Send + Sync>;

static SET_LOG_LEVEL: OnceLock<SetLevelFn> = OnceLock::new();
static FILE_SLOT: OnceLock<FileHandle> = OnceLock::new();
static INIT: Once = Once::new();

/// `RUST_LOG` wins over the configured level, which wins over the default.
fn make_filter(configured: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(configured.unwrap_or(DEFAULT_FILTER)))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

// --- Public API ---

/// Initializes logging. Call once at startup; later calls are ignored.
///
/// - Stderr: coloured when attached to a terminal, plain when piped. Stdout
///   is left to the report.
/// - File: inactive until [`enable_file_logging`] is called.
/// - Level: `RUST_LOG`, else `level`, else `info`.
pub fn init_logging(level: Option<&str>) {
    INIT.call_once(|| install(level));
}

fn install(level: Option<&str>) {
    let log_file: FileHandle = Arc::new(Mutex::new(None));

    let (level_filter, level_handle) = reload::Layer::new(make_filter(level));

    let console_layer = tracing_subscriber::fmt::layer()
        .event_format(EventLine)
        .with_ansi(io::stderr().is_terminal())
        .with_writer(io::stderr);

    let file_layer = tracing_subscriber::fmt::layer()
        .event_format(EventLine)
        .with_ansi(false)
        .with_writer(LogFileSlot(log_file.clone()));

    if tracing_subscriber::registry()
        .with(level_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .is_ok()
    {
        let _ = FILE_SLOT.set(log_file);
        let _ = SET_LOG_LEVEL.set(Box::new(move |directive: &str| {
            let filter = EnvFilter::try_new(directive)
                .map_err(|e| anyhow::anyhow!("invalid log level '{directive}': {e}"))?;
            level_handle
                .reload(filter)
                .map_err(|e| anyhow::anyhow!("could not apply log filter: {e}"))
        }));
    }
}

/// Changes the active filter at runtime. Accepts a bare level (`debug`) or
/// any `EnvFilter` directive.
pub fn set_log_level(directive: &str) -> Result<()> {
    match SET_LOG_LEVEL.get() {
        Some(f) => f(directive),
        None => anyhow::bail!("logging not yet initialized"),
    }
}

/// Starts appending log output to `path`, replacing any open log file.
pub fn enable_file_logging(path: &Path) -> Result<()> {
    let file = File::options()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| anyhow::anyhow!("cannot open log file '{}': {e}", path.display()))?;

    match FILE_SLOT.get() {
        Some(slot) => {
            *slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(file);
            Ok(())
        }
        None => anyhow::bail!("logging not yet initialized"),
    }
}
