use std::io::{self, Write};

use crate::bench::{report_mt, report_st};
use crate::config::BenchConfig;
use crate::daily_file_sink::DailyFileSink;
use crate::device::DeviceChannel;
use crate::diagnostic_sink::DiagnosticSink;
use crate::number_format::format_number;
use crate::registry::Registry;
use crate::sink::NullSink;

const RULE: &str = "*******************************************************************************";

/// How many async loggers are created, measured and dropped in turn.
pub const ASYNC_ROUNDS: usize = 3;

/// Runs the complete benchmark and writes the report to `out`.
///
/// Three sections are produced:
///
/// 1. Single thread: diagnostic (`st`), daily file (`daily_st`) and null
///    (`null_st`) loggers.
/// 2. `thread_count` threads sharing one logger: `mt`, `daily_mt`, `null_mt`.
/// 3. Async delivery: the registry is switched to async mode and a diagnostic
///    logger named `as` is created, measured multi-threaded and dropped,
///    [`ASYNC_ROUNDS`] times.
///
/// `new_channel` is called once per diagnostic sink. All loggers created here
/// are dropped from the registry before returning.
pub fn run_suite<W, C, F>(out: &mut W, registry: &mut Registry, config: &BenchConfig, mut new_channel: F) -> io::Result<()>
where
    W: Write + ?Sized,
    C: DeviceChannel,
    F: FnMut() -> C,
{
    let count = config.message_count;
    let threads = config.thread_count;

    banner(out, &format!("Single thread, {} iterations", format_number(&count)), false)?;
    {
        let st = registry.create_st("st", DiagnosticSink::with_channel(new_channel()))?;
        report_st(out, count, &*st)?;

        let daily_st = registry.create_st("daily_st", DailyFileSink::new(&config.log_dir, "daily_st")?)?;
        report_st(out, count, &*daily_st)?;

        let null_st = registry.create_st("null_st", NullSink)?;
        report_st(out, count, &*null_st)?;
    }

    banner(
        out,
        &format!("{} threads sharing same logger, {} iterations", threads, format_number(&count)),
        true,
    )?;
    {
        let mt = registry.create_mt("mt", DiagnosticSink::with_channel(new_channel()))?;
        report_mt(out, count, &*mt, threads)?;

        let daily_mt = registry.create_mt("daily_mt", DailyFileSink::new(&config.log_dir, "daily_mt")?)?;
        report_mt(out, count, &*daily_mt, threads)?;

        let null_mt = registry.create_mt("null_mt", NullSink)?;
        report_mt(out, count, &*null_mt, threads)?;
    }

    banner(
        out,
        &format!(
            "async logging.. {} threads sharing same logger, {} iterations ",
            threads,
            format_number(&count)
        ),
        true,
    )?;

    registry.set_async_mode(config.queue_size);
    for _ in 0..ASYNC_ROUNDS {
        let async_logger = registry.create_mt("as", DiagnosticSink::with_channel(new_channel()))?;
        report_mt(out, count, &*async_logger, threads)?;
        registry.drop_logger("as");
    }
    registry.set_sync_mode();

    registry.drop_all();
    out.flush()
}

fn banner<W: Write + ?Sized>(out: &mut W, title: &str, leading_blank: bool) -> io::Result<()> {
    if leading_blank {
        writeln!(out)?;
    }
    writeln!(out, "{}", RULE)?;
    writeln!(out, "{}", title)?;
    writeln!(out, "{}", RULE)
}
