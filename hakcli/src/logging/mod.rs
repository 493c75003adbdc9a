//! Colour-coded single-line log format for `tracing`.
//!
//! Lines look like
//! `INF 2024-05-01 14:03:07.412B hakcli::config processing config path=main.cfg`:
//! a three-letter level tag, the local time with millisecond precision and the
//! military time-zone letter of the local offset, the event target, then the
//! event fields.

use std::fmt;

use chrono::{Local, Offset};
use colored::{ColoredString, Colorize};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{Registry, reload};

const EAST_ZONES: [char; 12] = ['A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'K', 'L', 'M'];
const WEST_ZONES: [char; 12] = ['N', 'O', 'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y'];
const SECONDS_PER_HOUR: i32 = 3600;

/// Event formatter producing the line layout described in the module docs.
#[derive(Debug, Clone, Copy)]
pub struct LineFormat {
    log_origin: bool,
    log_time: bool,
}

impl Default for LineFormat {
    fn default() -> Self {
        Self::new()
    }
}

impl LineFormat {
    /// Timestamped lines without source locations.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            log_origin: false,
            log_time: true,
        }
    }

    /// Appends `file line` of the emitting call site after the target.
    #[must_use]
    pub const fn with_origin(mut self, enabled: bool) -> Self {
        self.log_origin = enabled;
        self
    }

    /// Toggles the timestamp.
    #[must_use]
    pub const fn with_time(mut self, enabled: bool) -> Self {
        self.log_time = enabled;
        self
    }
}

impl<S, N> FormatEvent<S, N> for LineFormat
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
        let meta = event.metadata();
        write!(writer, "{} ", level_tag(*meta.level()))?;
        if self.log_time {
            let now = Local::now();
            let zone = zone_letter(now.offset().fix().local_minus_utc());
            let stamp = format!("{}{zone}", now.format("%Y-%m-%d %H:%M:%S%.3f"));
            write!(writer, "{} ", stamp.truecolor(120, 120, 200))?;
        }
        write!(writer, "{} ", meta.target())?;
        if self.log_origin
            && let (Some(file), Some(line)) = (meta.file(), meta.line())
        {
            write!(writer, "{} ", format!("{file} {line}").truecolor(120, 120, 200))?;
        }
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

fn level_tag(level: Level) -> ColoredString {
    match level {
        Level::ERROR => "ERR".truecolor(255, 60, 60),
        Level::WARN => "WRN".truecolor(255, 200, 40),
        Level::INFO => "INF".truecolor(40, 255, 255),
        Level::DEBUG => "DBG".truecolor(255, 40, 255),
        _ => "TRC".truecolor(127, 40, 255),
    }
}

/// Military time-zone letter for an offset east of UTC, in seconds.
///
/// Offsets that are not whole hours, or lie beyond twelve hours, map to `J`.
#[must_use]
pub fn zone_letter(offset_seconds: i32) -> char {
    if offset_seconds % SECONDS_PER_HOUR != 0 {
        return 'J';
    }
    let hours = offset_seconds / SECONDS_PER_HOUR;
    let zones = if hours < 0 { &WEST_ZONES } else { &EAST_ZONES };
    match usize::try_from(hours.unsigned_abs()) {
        Ok(0) => 'Z',
        Ok(step) => zones.get(step - 1).copied().unwrap_or('J'),
        Err(_) => 'J',
    }
}

/// Installs [`LineFormat`] on stderr as the global subscriber, recording
/// events up to `level`.
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
pub fn init(level: Level) -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .event_format(LineFormat::new())
        .try_init()
}

/// Adjusts the level of a subscriber installed by [`init_reloadable`].
#[derive(Debug, Clone)]
pub struct LevelHandle(reload::Handle<LevelFilter, Registry>);

impl LevelHandle {
    /// Records events up to `level` from now on.
    ///
    /// # Errors
    ///
    /// Fails if the subscriber has been dropped.
    pub fn set(&self, level: Level) -> Result<(), reload::Error> {
        self.0.reload(LevelFilter::from_level(level))
    }
}

/// Like [`init`], but the level can be changed later through the returned
/// handle. Hosts use this to log config loading before the command line has
/// chosen the final level.
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
pub fn init_reloadable(level: Level) -> Result<LevelHandle, TryInitError> {
    let (filter, handle) = reload::Layer::new(LevelFilter::from_level(level));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .event_format(LineFormat::new()),
        )
        .try_init()?;
    Ok(LevelHandle(handle))
}

#[cfg(test)]
mod tests;
