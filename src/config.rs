use std::path::PathBuf;

pub const DEFAULT_MESSAGE_COUNT: usize = 10_000;
pub const DEFAULT_THREAD_COUNT: usize = 5;
pub const DEFAULT_QUEUE_SIZE: usize = 1_048_576;
pub const DEFAULT_LOG_DIR: &str = "logs";

/// Settings for one invocation of the benchmark.
///
/// Built from the positional process arguments:
///
/// ```text
/// procmon_logbench [message-count [thread-count [async-queue-size]]]
/// ```
///
/// A missing argument keeps its default. A present one is read like C's
/// `atoi`, so text that is not a number yields 0. Negative numbers clamp to 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchConfig {
    pub message_count: usize,
    pub thread_count: usize,
    pub queue_size: usize,
    /// Directory receiving the daily file sinks' output.
    pub log_dir: PathBuf,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            message_count: DEFAULT_MESSAGE_COUNT,
            thread_count: DEFAULT_THREAD_COUNT,
            queue_size: DEFAULT_QUEUE_SIZE,
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
        }
    }
}

impl BenchConfig {
    /// Parses the arguments that follow the program name.
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut config = Self::default();
        let mut args = args.into_iter();

        if let Some(arg) = args.next() {
            config.message_count = count_arg(arg.as_ref());
        }
        if let Some(arg) = args.next() {
            config.thread_count = count_arg(arg.as_ref());
        }
        if let Some(arg) = args.next() {
            config.queue_size = count_arg(arg.as_ref());
        }

        config
    }
}

fn count_arg(arg: &str) -> usize {
    usize::try_from(atoi(arg)).unwrap_or(0)
}

/// Lenient integer parse with the semantics of C's `atoi`.
///
/// Skips leading whitespace, accepts one optional sign, then reads decimal
/// digits up to the first non-digit. No digits gives 0. Values beyond the
/// `i64` range saturate.
pub fn atoi(text: &str) -> i64 {
    let text = text.trim_start();
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let mut value: i64 = 0;
    for byte in digits.bytes().take_while(u8::is_ascii_digit) {
        let digit = i64::from(byte - b'0');
        value = value.saturating_mul(10);
        value = if negative {
            value.saturating_sub(digit)
        } else {
            value.saturating_add(digit)
        };
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_arguments() {
        let config = BenchConfig::from_args(Vec::<String>::new());
        assert_eq!(config, BenchConfig::default());
        assert_eq!(config.message_count, 10_000);
        assert_eq!(config.thread_count, 5);
        assert_eq!(config.queue_size, 1_048_576);
    }

    #[test]
    fn test_positional_arguments() {
        let config = BenchConfig::from_args(["200", "3"]);
        assert_eq!(config.message_count, 200);
        assert_eq!(config.thread_count, 3);
        assert_eq!(config.queue_size, DEFAULT_QUEUE_SIZE);

        let config = BenchConfig::from_args(["1", "2", "4096"]);
        assert_eq!(config.queue_size, 4096);
    }

    #[test]
    fn test_malformed_arguments_become_zero() {
        let config = BenchConfig::from_args(["lots", "-4", "12abc"]);
        assert_eq!(config.message_count, 0);
        assert_eq!(config.thread_count, 0);
        assert_eq!(config.queue_size, 12);
    }

    #[test]
    fn test_atoi() {
        assert_eq!(atoi("42"), 42);
        assert_eq!(atoi("  +17 apples"), 17);
        assert_eq!(atoi("-250"), -250);
        assert_eq!(atoi(""), 0);
        assert_eq!(atoi("-"), 0);
        assert_eq!(atoi("x1"), 0);
        assert_eq!(atoi("99999999999999999999999"), i64::MAX);
        assert_eq!(atoi("-99999999999999999999999"), i64::MIN);
    }
}
