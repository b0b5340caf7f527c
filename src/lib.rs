//! # Procmon Log Bench
//!
//! Throughput benchmark for loggers, built around a sink that forwards every
//! log line to Sysinternals Process Monitor.
//!
//! Process Monitor exposes a global device, `\\.\Global\ProcmonDebugLogger`,
//! that accepts one line of debug output per I/O control request and shows it
//! in its event list next to the file and registry activity it captures. The
//! [`DiagnosticSink`] writes to that device, and the benchmark measures how it
//! compares with a daily file sink and a sink that discards everything.
//!
//! ## Main Components
//!
//! * `device`: the [`DeviceChannel`] capability and its Win32 implementation
//! * `diagnostic_sink`: the Process Monitor sink, best-effort throughout
//! * `sink`, `daily_file_sink`, `async_sink`: the other sinks and the async front
//! * `logger`, `registry`: named loggers bound to sinks
//! * `bench`: single- and multi-threaded timing loops
//! * `suite`: the full report, as printed by the `procmon_logbench` binary
//!
//! ## Quick Start
//!
//! ```
//! use procmon_logbench::{bench_mt, DiagnosticSink, MtLogger, NullSink};
//!
//! // Without Process Monitor running the diagnostic sink silently drops lines.
//! let monitor = MtLogger::multi_threaded("monitor", DiagnosticSink::system());
//! let null = MtLogger::multi_threaded("null", NullSink);
//!
//! for logger in [&monitor, &null] {
//!     let run = bench_mt(1_000, logger, 4);
//!     println!("{}: {}/sec", logger.name(), run.throughput());
//! }
//! ```

pub mod async_sink;
pub mod bench;
pub mod config;
pub mod daily_file_sink;
pub mod device;
pub mod diagnostic_sink;
pub mod logger;
pub mod number_format;
pub mod registry;
pub mod sink;
pub mod suite;

pub use bench::{bench, bench_mt, BenchmarkRun, MessageCounter};
pub use config::BenchConfig;
pub use device::{DeviceChannel, DeviceError, SystemDevice};
pub use diagnostic_sink::{DiagnosticSink, DiagnosticSinkMt, DiagnosticSinkSt};
pub use logger::{LogInfo, Logger, MtLogger, StLogger};
pub use number_format::{format_number, FormatNumber, NumberLocale};
pub use registry::{RegisteredLogger, Registry, RegistryError};
pub use sink::{NullSink, Sink};
pub use suite::run_suite;
