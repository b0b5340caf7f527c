use procmon_logbench::bench::{report_mt, report_st};
use procmon_logbench::{bench, bench_mt, LogInfo, MessageCounter, MtLogger, NullSink, Sink, StLogger};
use parking_lot::Mutex;
use std::cell::RefCell;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Logger that keeps the rendered message of every call.
struct RecordingLogger {
    messages: Mutex<Vec<String>>,
}

impl RecordingLogger {
    fn new() -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
        }
    }

    fn numbers(&self) -> Vec<usize> {
        self.messages
            .lock()
            .iter()
            .map(|m| m.rsplit(' ').next().unwrap().parse().unwrap())
            .collect()
    }
}

impl LogInfo for RecordingLogger {
    fn name(&self) -> &str {
        "recording"
    }

    fn info(&self, args: fmt::Arguments<'_>) {
        self.messages.lock().push(args.to_string());
    }
}

/// Single-threaded logger that only counts, to check `bench` accepts `!Sync` loggers.
struct CountingLogger {
    calls: RefCell<usize>,
}

impl LogInfo for CountingLogger {
    fn name(&self) -> &str {
        "counting"
    }

    fn info(&self, _args: fmt::Arguments<'_>) {
        *self.calls.borrow_mut() += 1;
    }
}

/// Logger whose every call costs one millisecond.
struct SlowLogger {
    calls: AtomicUsize,
}

impl LogInfo for SlowLogger {
    fn name(&self) -> &str {
        "slow"
    }

    fn info(&self, _args: fmt::Arguments<'_>) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        thread::sleep(Duration::from_millis(1));
    }
}

#[test]
fn test_single_thread_indices_in_order() {
    let logger = RecordingLogger::new();
    let run = bench(1000, &logger);

    assert_eq!(run.count, 1000);
    assert_eq!(run.threads, 1);
    assert_eq!(logger.numbers(), (0..1000).collect::<Vec<_>>());
    assert_eq!(logger.messages.lock()[0], "Hello logger: msg number 0");
}

#[test]
fn test_single_thread_zero_messages() {
    let logger = RecordingLogger::new();
    bench(0, &logger);
    assert!(logger.messages.lock().is_empty());
}

#[test]
fn test_single_thread_accepts_unshared_logger() {
    let logger = CountingLogger { calls: RefCell::new(0) };
    bench(250, &logger);
    assert_eq!(*logger.calls.borrow(), 250);
}

#[test]
fn test_multi_thread_covers_every_index_once() {
    for threads in [1, 2, 5, 16] {
        let logger = RecordingLogger::new();
        let run = bench_mt(2000, &logger, threads);

        assert_eq!(run.threads, threads);
        let mut numbers = logger.numbers();
        assert_eq!(numbers.len(), 2000, "{} threads", threads);
        numbers.sort_unstable();
        assert_eq!(numbers, (1..=2000).collect::<Vec<_>>(), "{} threads", threads);
    }
}

#[test]
fn test_multi_thread_more_threads_than_messages() {
    let logger = RecordingLogger::new();
    bench_mt(3, &logger, 10);

    let mut numbers = logger.numbers();
    numbers.sort_unstable();
    assert_eq!(numbers, vec![1, 2, 3]);
}

#[test]
fn test_multi_thread_without_threads_logs_nothing() {
    let logger = RecordingLogger::new();
    bench_mt(100, &logger, 0);
    assert!(logger.messages.lock().is_empty());
}

#[test]
fn test_counter_overshoot_bounded_by_thread_count() {
    let limit = 10_000;
    let threads = 8;
    let counter = MessageCounter::new(limit);
    let claimed = AtomicUsize::new(0);

    thread::scope(|scope| {
        for _ in 0..threads {
            scope.spawn(|| {
                while counter.claim().is_some() {
                    claimed.fetch_add(1, Ordering::Relaxed);
                }
            });
        }
    });

    assert_eq!(claimed.load(Ordering::Relaxed), limit);
    assert!(counter.value() > limit);
    assert!(counter.value() <= limit + threads, "counter ended at {}", counter.value());
}

#[test]
fn test_throughput_sanity_with_slow_logger() {
    let logger = SlowLogger {
        calls: AtomicUsize::new(0),
    };
    let run = bench(1000, &logger);

    assert_eq!(logger.calls.load(Ordering::SeqCst), 1000);
    assert!(run.elapsed >= Duration::from_secs(1));
    assert!(run.throughput() <= 1000, "throughput {}", run.throughput());
    assert!(run.throughput() > 0);
}

/// Sink that only counts what reaches it.
#[derive(Clone, Default)]
struct CountingSink(Arc<AtomicUsize>);

impl Sink for CountingSink {
    fn log(&mut self, _formatted: &str) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    fn flush(&mut self) {}
}

#[test]
fn test_repeated_null_runs_are_independent() {
    let first = MtLogger::multi_threaded("null_mt", NullSink);
    let second = MtLogger::multi_threaded("null_mt", NullSink);

    let a = bench_mt(5000, &first, 4);
    let b = bench_mt(5000, &second, 4);

    assert_eq!(a.count, b.count);
    assert!(a.throughput() > 0);
    assert!(b.throughput() > 0);
}

#[test]
fn test_fresh_loggers_each_receive_exactly_n() {
    let first_sink = CountingSink::default();
    let second_sink = CountingSink::default();
    let first = MtLogger::multi_threaded("first", first_sink.clone());
    let second = MtLogger::multi_threaded("second", second_sink.clone());

    bench_mt(5000, &first, 4);
    assert_eq!(first_sink.0.load(Ordering::SeqCst), 5000);
    assert_eq!(second_sink.0.load(Ordering::SeqCst), 0, "Untouched logger must see nothing");

    bench_mt(3000, &second, 3);
    assert_eq!(first_sink.0.load(Ordering::SeqCst), 5000, "Earlier run must not be affected");
    assert_eq!(second_sink.0.load(Ordering::SeqCst), 3000);

    let single_sink = CountingSink::default();
    let single = StLogger::single_threaded("single", single_sink.clone());
    bench(2000, &single);
    bench(2000, &single);
    assert_eq!(single_sink.0.load(Ordering::SeqCst), 4000, "Each run adds exactly N records");
}

#[test]
fn test_report_line_shape() {
    let logger = StLogger::single_threaded("null_st", NullSink);
    let mut out = Vec::new();

    report_st(&mut out, 100, &logger).unwrap();

    let line = String::from_utf8(out).unwrap();
    assert!(line.starts_with("null_st...\t\t"), "got {:?}", line);
    assert!(line.ends_with("/sec\n"), "got {:?}", line);
}

#[test]
fn test_report_mt_returns_run() {
    let logger = RecordingLogger::new();
    let mut out = Vec::new();

    let run = report_mt(&mut out, 50, &logger, 3).unwrap();

    assert_eq!(run.count, 50);
    assert_eq!(logger.messages.lock().len(), 50);
    assert!(String::from_utf8(out).unwrap().starts_with("recording...\t\t"));
}
