//! Property tests for numeric flag validation and the log header format

use clap::Parser;
use latency_tester::{
    cli::Cli,
    config::{ConfigParser, EnvSettings},
    logfile::{format_header, parse_header},
    privilege::StaticPrivileges,
    LogHeader,
};
use proptest::prelude::*;

fn parse(args: Vec<String>, elevated: bool) -> latency_tester::Result<latency_tester::config::Config> {
    let cli = Cli::try_parse_from(args).expect("clap accepts any integer and float");
    ConfigParser::with_env(cli, EnvSettings::default()).parse(&StaticPrivileges(elevated))
}

fn args(duration: i64, size: i64, interval: f64) -> Vec<String> {
    vec![
        "lt".to_string(),
        "-w".to_string(),
        duration.to_string(),
        "-s".to_string(),
        size.to_string(),
        "-i".to_string(),
        interval.to_string(),
        "-t".to_string(),
        "10.0.0.1".to_string(),
    ]
}

proptest! {
    #[test]
    fn non_positive_packet_sizes_are_rejected(size in -100_000i64..=0) {
        let error = parse(args(10, size, 1.0), true).unwrap_err();
        prop_assert_eq!(error.exit_code(), 2);
    }

    #[test]
    fn positive_packet_sizes_are_accepted(size in 1i64..=65_507) {
        let config = parse(args(10, size, 1.0), true).unwrap();
        prop_assert_eq!(i64::from(config.test.unwrap().packet_size_bytes), size);
    }

    #[test]
    fn non_positive_durations_are_rejected(duration in -100_000i64..=0) {
        let error = parse(args(duration, 64, 1.0), true).unwrap_err();
        prop_assert_eq!(error.exit_code(), 2);
    }

    #[test]
    fn sub_threshold_intervals_need_privilege(interval in 0.001f64..0.2) {
        let error = parse(args(10, 64, interval), false).unwrap_err();
        prop_assert_eq!(error.category(), "PERMISSION");
        prop_assert!(parse(args(10, 64, interval), true).is_ok());
    }

    #[test]
    fn ordinary_intervals_need_no_privilege(interval in 0.2f64..60.0) {
        prop_assert!(parse(args(10, 64, interval), false).is_ok());
    }

    #[test]
    fn header_survives_machine_labels_with_commas(
        duration in 1u32..86_400,
        size in 1u32..65_507,
        interval_ms in 1u32..10_000,
        machine in "[a-zA-Z0-9 ,._-]{0,24}",
    ) {
        let header = LogHeader {
            duration_seconds: duration,
            packet_size_bytes: size,
            interval_seconds: f64::from(interval_ms) / 1000.0,
            target_address: "example.com".to_string(),
            machine_label: machine.trim().to_string(),
        };

        let parsed = parse_header(&format_header(&header)).unwrap().unwrap();
        prop_assert_eq!(parsed.duration_seconds, header.duration_seconds);
        prop_assert_eq!(parsed.packet_size_bytes, header.packet_size_bytes);
        prop_assert!((parsed.interval_seconds - header.interval_seconds).abs() < 1e-4);
        prop_assert_eq!(parsed.machine_label, header.machine_label);
    }
}
