use std::env;
use std::io::{self, Write};
use std::process::Command;
use std::time::Instant;

/// Runs the benchmark binary several times and summarizes throughput per logger.
///
/// Usage: `bench_stats [runs [message-count [thread-count [queue-size]]]]`
fn main() -> io::Result<()> {
    let mut args = env::args().skip(1);
    let num_runs = args.next().and_then(|s| s.parse::<usize>().ok()).unwrap_or(10);
    let bench_args: Vec<String> = args.collect();

    println!("Running benchmark {} times...", num_runs);

    // Logger name -> throughput samples, in order of first appearance.
    let mut samples: Vec<(String, Vec<f64>)> = Vec::new();
    let start_time = Instant::now();
    let mut completed = 0;

    for i in 1..=num_runs {
        print!("Run {}/{}... ", i, num_runs);
        io::stdout().flush()?;

        let output = Command::new("cargo")
            .args(["run", "--release", "--quiet", "--bin", "procmon_logbench", "--"])
            .args(&bench_args)
            .output()?;

        if !output.status.success() {
            eprintln!("Benchmark failed on run {}", i);
            continue;
        }

        let output_str = String::from_utf8_lossy(&output.stdout);
        let mut lines = 0;
        for (name, value) in output_str.lines().filter_map(parse_throughput_line) {
            lines += 1;
            match samples.iter_mut().find(|(n, _)| *n == name) {
                Some((_, values)) => values.push(value),
                None => samples.push((name, vec![value])),
            }
        }

        completed += 1;
        println!("{} results", lines);
    }

    let elapsed = start_time.elapsed();
    println!("\nCompleted {} runs in {:.2?}", completed, elapsed);

    println!("\n===== THROUGHPUT SUMMARY (msgs/sec) =====");
    for (name, values) in &samples {
        println!("\n{} ({} samples):", name, values.len());
        print_stats(calculate_stats(values));
    }

    Ok(())
}

/// Splits `name...\t\t1,234,567/sec` into its name and value.
///
/// Group separators of any locale are skipped; only digits are kept.
fn parse_throughput_line(line: &str) -> Option<(String, f64)> {
    let (name, rest) = line.split_once("...")?;
    let number = rest.trim().strip_suffix("/sec")?;
    let digits: String = number.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    Some((name.to_string(), digits.parse().ok()?))
}

struct Stats {
    min: f64,
    max: f64,
    mean: f64,
    median: f64,
    std_dev: f64,
    std_dev_percent: f64,
}

fn calculate_stats(values: &[f64]) -> Stats {
    if values.is_empty() {
        return Stats {
            min: 0.0,
            max: 0.0,
            mean: 0.0,
            median: 0.0,
            std_dev: 0.0,
            std_dev_percent: 0.0,
        };
    }

    let min = values.iter().fold(f64::INFINITY, |a, &b| a.min(b));
    let max = values.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));

    let count = values.len() as f64;
    let mean = values.iter().sum::<f64>() / count;

    let mut sorted_values = values.to_vec();
    sorted_values.sort_by(|a, b| a.total_cmp(b));
    let mid = values.len() / 2;
    let median = if values.len() % 2 == 0 {
        (sorted_values[mid - 1] + sorted_values[mid]) / 2.0
    } else {
        sorted_values[mid]
    };

    let variance = values
        .iter()
        .map(|&value| {
            let diff = mean - value;
            diff * diff
        })
        .sum::<f64>()
        / count;

    let std_dev = variance.sqrt();
    let std_dev_percent = if mean != 0.0 { (std_dev / mean) * 100.0 } else { 0.0 };

    Stats {
        min,
        max,
        mean,
        median,
        std_dev,
        std_dev_percent,
    }
}

fn print_stats(stats: Stats) {
    println!("  Min: {:.0}", stats.min);
    println!("  Max: {:.0}", stats.max);
    println!("  Mean: {:.0}", stats.mean);
    println!("  Median: {:.0}", stats.median);
    println!("  Std Dev: {:.0} ({:.2}% of mean)", stats.std_dev, stats.std_dev_percent);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_throughput_line() {
        assert_eq!(
            parse_throughput_line("null_st...\t\t1,234,567/sec"),
            Some(("null_st".to_string(), 1_234_567.0))
        );
        assert_eq!(
            parse_throughput_line("as...\t\t98\u{a0}765/sec"),
            Some(("as".to_string(), 98_765.0))
        );
        assert_eq!(parse_throughput_line("Single thread, 10,000 iterations"), None);
    }

    #[test]
    fn test_stats_median_even() {
        let stats = calculate_stats(&[4.0, 1.0, 3.0, 2.0]);
        assert_eq!(stats.median, 2.5);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 4.0);
        assert_eq!(stats.mean, 2.5);
    }
}
