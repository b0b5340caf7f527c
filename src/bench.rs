//! Throughput measurement for loggers.
//!
//! Two loops are provided:
//!
//! * [`bench`] logs `count` records from the calling thread.
//! * [`bench_mt`] shares one logger between `thread_count` workers that claim
//!   record numbers from a [`MessageCounter`] until `count` have been taken.
//!
//! Both time the whole loop with a monotonic clock and return a
//! [`BenchmarkRun`]. The `report_*` variants also print the familiar
//! `name...\t\t1,234,567/sec` line around the measurement.

use std::io::{self, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use crate::logger::LogInfo;
use crate::number_format::{format_number, process_locale, FormatNumber, NumberLocale};

/// Outcome of one timed loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BenchmarkRun {
    pub count: usize,
    pub threads: usize,
    pub elapsed: Duration,
}

impl BenchmarkRun {
    /// Messages per second, rounded to the nearest integer.
    ///
    /// A run too short for the clock to register counts as one nanosecond.
    pub fn throughput(&self) -> u64 {
        let secs = self.elapsed.as_secs_f64().max(1e-9);
        (self.count as f64 / secs).round() as u64
    }

    /// Throughput rendered with `locale`, e.g. `1,234,567/sec`.
    pub fn format_with(&self, locale: &NumberLocale) -> String {
        format!("{}/sec", self.throughput().format_with(locale))
    }
}

/// Hands out record numbers `1..=limit` to competing workers.
///
/// Every call to [`claim`](Self::claim) increments the shared counter once.
/// Claims past the limit return `None`, so with `t` workers each stopping at
/// their first `None` the counter ends at no more than `limit + t`.
#[derive(Debug)]
pub struct MessageCounter {
    next: AtomicUsize,
    limit: usize,
}

impl MessageCounter {
    pub fn new(limit: usize) -> Self {
        Self {
            next: AtomicUsize::new(0),
            limit,
        }
    }

    /// Takes the next record number, or `None` once `limit` have been handed out.
    #[inline]
    pub fn claim(&self) -> Option<usize> {
        let claimed = self.next.fetch_add(1, Ordering::SeqCst) + 1;
        (claimed <= self.limit).then_some(claimed)
    }

    /// Number of increments performed so far, overshoot included.
    pub fn value(&self) -> usize {
        self.next.load(Ordering::SeqCst)
    }
}

/// Logs `count` records numbered `0..count` from the calling thread.
pub fn bench<L: LogInfo + ?Sized>(count: usize, logger: &L) -> BenchmarkRun {
    let start = Instant::now();
    for i in 0..count {
        logger.info(format_args!("Hello logger: msg number {}", i));
    }
    let elapsed = start.elapsed();

    BenchmarkRun { count, threads: 1, elapsed }
}

/// Logs `count` records numbered `1..=count` from `thread_count` threads.
///
/// The clock stops only after every worker has been joined.
pub fn bench_mt<L: LogInfo + Sync + ?Sized>(count: usize, logger: &L, thread_count: usize) -> BenchmarkRun {
    let counter = MessageCounter::new(count);

    let start = Instant::now();
    thread::scope(|scope| {
        for _ in 0..thread_count {
            scope.spawn(|| {
                while let Some(n) = counter.claim() {
                    logger.info(format_args!("Hello logger: msg number {}", n));
                }
            });
        }
    });
    let elapsed = start.elapsed();

    tracing::trace!(claims = counter.value(), limit = count, "workers joined");

    BenchmarkRun {
        count,
        threads: thread_count,
        elapsed,
    }
}

/// Prints the logger's name, runs [`bench`], then prints the throughput.
pub fn report_st<W, L>(out: &mut W, count: usize, logger: &L) -> io::Result<BenchmarkRun>
where
    W: Write + ?Sized,
    L: LogInfo + ?Sized,
{
    write!(out, "{}...\t\t", logger.name())?;
    out.flush()?;

    let run = bench(count, logger);
    finish_report(out, logger.name(), &run)?;
    Ok(run)
}

/// Prints the logger's name, runs [`bench_mt`], then prints the throughput.
pub fn report_mt<W, L>(out: &mut W, count: usize, logger: &L, thread_count: usize) -> io::Result<BenchmarkRun>
where
    W: Write + ?Sized,
    L: LogInfo + Sync + ?Sized,
{
    write!(out, "{}...\t\t", logger.name())?;
    out.flush()?;

    let run = bench_mt(count, logger, thread_count);
    finish_report(out, logger.name(), &run)?;
    Ok(run)
}

fn finish_report<W: Write + ?Sized>(out: &mut W, name: &str, run: &BenchmarkRun) -> io::Result<()> {
    tracing::debug!(
        logger = name,
        threads = run.threads,
        elapsed_secs = %format_number(&run.elapsed.as_secs_f64()),
        "benchmark run finished"
    );
    writeln!(out, "{}", run.format_with(&process_locale()))
}
