use std::fmt;

use log::{Level, LevelFilter, Record};
use log4rs::encode::pattern::PatternEncoder;
use log4rs::encode::writer::simple::SimpleWriter;
use log4rs::encode::Encode;

use crate::sink::{Sink, SinkCell, SinkMt, SinkSt};

/// Layout applied to every record unless a logger is given its own.
pub const DEFAULT_PATTERN: &str = "[{d(%Y-%m-%d %H:%M:%S%.3f)}] [{t}] [{l}] {m}{n}";

/// A named logger bound to one sink.
///
/// The logger filters by level, formats the record with a `log4rs` pattern
/// encoder and hands the resulting line to its sink. Formatting happens before
/// the sink cell is entered, so a shared logger only serializes the delivery.
///
/// The type of the sink cell decides where the logger may be used:
///
/// * [`StLogger`] keeps its sink in a `RefCell` and cannot leave its thread.
/// * [`MtLogger`] keeps its sink behind a mutex and is `Sync`.
pub struct Logger<G> {
    name: String,
    level: LevelFilter,
    encoder: PatternEncoder,
    sink: G,
}

/// Logger for use from a single thread.
pub type StLogger = Logger<SinkSt>;

/// Logger that may be shared between threads.
pub type MtLogger = Logger<SinkMt>;

impl<G: SinkCell> Logger<G> {
    /// Creates a logger at `Info` level using [`DEFAULT_PATTERN`].
    pub fn new(name: impl Into<String>, sink: G) -> Self {
        Self {
            name: name.into(),
            level: LevelFilter::Info,
            encoder: PatternEncoder::new(DEFAULT_PATTERN),
            sink,
        }
    }

    /// Replaces the record layout. See `log4rs::encode::pattern` for the syntax.
    pub fn with_pattern(mut self, pattern: &str) -> Self {
        self.encoder = PatternEncoder::new(pattern);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn level(&self) -> LevelFilter {
        self.level
    }

    pub fn set_level(&mut self, level: LevelFilter) {
        self.level = level;
    }

    pub fn enabled(&self, level: Level) -> bool {
        level <= self.level
    }

    /// Formats and delivers one record if `level` passes the filter.
    pub fn log(&self, level: Level, args: fmt::Arguments<'_>) {
        if !self.enabled(level) {
            return;
        }

        let record = Record::builder()
            .args(args)
            .level(level)
            .target(&self.name)
            .build();

        let mut line = SimpleWriter(Vec::with_capacity(128));
        if self.encoder.encode(&mut line, &record).is_err() {
            return;
        }

        let text = String::from_utf8_lossy(&line.0);
        self.sink.with_sink(|sink| sink.log(&text));
    }

    pub fn info(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Info, args);
    }

    pub fn flush(&self) {
        self.sink.with_sink(|sink| sink.flush());
    }
}

impl StLogger {
    pub fn single_threaded(name: impl Into<String>, sink: impl Sink) -> Self {
        let boxed: Box<dyn Sink> = Box::new(sink);
        Self::new(name, SinkSt::new(boxed))
    }
}

impl MtLogger {
    pub fn multi_threaded(name: impl Into<String>, sink: impl Sink) -> Self {
        let boxed: Box<dyn Sink> = Box::new(sink);
        Self::new(name, SinkMt::new(boxed))
    }
}

/// What the benchmark harness needs from a logger.
pub trait LogInfo {
    fn name(&self) -> &str;

    /// Emits one informational record.
    fn info(&self, args: fmt::Arguments<'_>);
}

impl<G: SinkCell> LogInfo for Logger<G> {
    fn name(&self) -> &str {
        Logger::name(self)
    }

    #[inline]
    fn info(&self, args: fmt::Arguments<'_>) {
        Logger::info(self, args)
    }
}
