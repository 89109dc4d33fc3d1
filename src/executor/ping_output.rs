//! Ping command line construction and reply-line parsing

use crate::models::TestConfig;
use regex::Regex;
use std::sync::OnceLock;

fn reply_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"time=(\d+(?:\.\d+)?)\s*(ms|us|µs|s)?").ok())
        .as_ref()
}

/// Arguments for `ping -w <duration> -s <size> -i <interval> <target>`
pub fn build_ping_args(test: &TestConfig) -> Vec<String> {
    vec![
        "-w".to_string(),
        test.duration_seconds.to_string(),
        "-s".to_string(),
        test.packet_size_bytes.to_string(),
        "-i".to_string(),
        format!("{:.4}", test.interval_seconds),
        test.target_address.clone(),
    ]
}

/// RTT in milliseconds from a ping reply line, `None` for any other line
///
/// Only echo replies count: the line must mention `icmp_seq` and carry a
/// `time=<value><unit>` field. Summary lines such as
/// `rtt min/avg/max/mdev = ...` are therefore skipped.
pub fn parse_rtt(line: &str) -> Option<f64> {
    if !line.contains("icmp_seq") {
        return None;
    }

    let captures = reply_pattern()?.captures(line)?;
    let value: f64 = captures.get(1)?.as_str().parse().ok()?;

    let rtt_ms = match captures.get(2).map(|unit| unit.as_str()) {
        Some("s") => value * 1000.0,
        Some("us") | Some("µs") => value / 1000.0,
        _ => value,
    };

    Some(rtt_ms)
}
