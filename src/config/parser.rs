//! Configuration parsing from CLI arguments and environment variables

use crate::{
    cli::{supports_color, Cli},
    config::{
        env::{EnvManager, EnvSettings},
        validation::ConfigValidator,
    },
    error::{AppError, Result},
    models::{config::default_plot_path, Config, TestConfig},
    privilege::PrivilegeCheck,
    types::RunMode,
};

/// Configuration parser that combines CLI arguments with environment variables
pub struct ConfigParser {
    cli: Cli,
    env: EnvSettings,
}

impl ConfigParser {
    /// Create a parser, loading `.env` and the `LT_*` variables
    pub fn new(cli: Cli) -> Result<Self> {
        EnvManager::load_env_file(cli.debug)?;
        let env = EnvSettings::from_env()?;
        Ok(Self { cli, env })
    }

    /// Create a parser with explicit environment settings
    pub fn with_env(cli: Cli, env: EnvSettings) -> Self {
        Self { cli, env }
    }

    /// Parse and build the complete configuration
    pub fn parse(&self, privileges: &dyn PrivilegeCheck) -> Result<Config> {
        self.cli.validate().map_err(AppError::validation)?;

        let mut config = Config::default();
        self.apply_env(&mut config);
        self.apply_cli_overrides(&mut config);

        config.test = match config.mode {
            RunMode::TestAndPlot => {
                let test = self.build_test_config(&config)?;
                ConfigValidator::check_interval_privilege(test.interval_seconds, privileges)?;
                Some(test)
            }
            // Only a complete parameter set serves as fallback for header-less logs
            RunMode::PlotOnly if self.has_all_test_parameters() => Some(self.build_test_config(&config)?),
            RunMode::PlotOnly => None,
        };

        config.validate()?;

        if config.debug {
            println!("Resolved configuration:");
            println!("{}", display_config_summary(&config));
        }

        Ok(config)
    }

    fn apply_env(&self, config: &mut Config) {
        if let Some(ref log_file) = self.env.log_file {
            config.log_path = log_file.clone();
        }
        if let Some(ref machine) = self.env.machine {
            config.machine_label = machine.clone();
        }
        if let Some(ref ping_bin) = self.env.ping_bin {
            config.ping_bin = ping_bin.clone();
        }
        if let Some(enable_color) = self.env.enable_color {
            config.enable_color = enable_color;
        }
    }

    /// Apply CLI argument overrides to configuration
    fn apply_cli_overrides(&self, config: &mut Config) {
        config.mode = RunMode::from_flag(self.cli.plot_only);
        config.overwrite = self.cli.overwrite;
        config.verbose = self.cli.verbose;
        config.debug = self.cli.debug;

        if let Some(ref log_file) = self.cli.log_file {
            config.log_path = log_file.clone();
        }

        if let Some(ref machine) = self.cli.machine {
            config.machine_label = machine.clone();
        }

        config.plot_path = match self.cli.plot_file {
            Some(ref plot_file) => plot_file.clone(),
            None => default_plot_path(&config.log_path),
        };

        config.enable_color = match self.cli.color_override() {
            Some(forced) => forced,
            None => config.enable_color && supports_color(),
        };
    }

    fn has_all_test_parameters(&self) -> bool {
        self.cli.deadline.is_some()
            && self.cli.packet_size.is_some()
            && self.cli.interval.is_some()
            && self.cli.target.is_some()
    }

    fn build_test_config(&self, config: &Config) -> Result<TestConfig> {
        let duration_seconds =
            ConfigValidator::require_positive_int("test duration", "-w", self.cli.deadline)?;
        let packet_size_bytes =
            ConfigValidator::require_positive_int("packet size", "-s", self.cli.packet_size)?;
        let interval_seconds = ConfigValidator::require_interval(self.cli.interval)?;
        let target_address = ConfigValidator::require_target(self.cli.target.as_deref())?;

        let test = TestConfig {
            duration_seconds,
            packet_size_bytes,
            interval_seconds,
            target_address,
            log_path: config.log_path.clone(),
            machine_label: config.machine_label.clone(),
        };
        test.validate()?;
        Ok(test)
    }
}

/// Convenience function to load complete configuration from CLI arguments
pub fn load_config(cli: Cli, privileges: &dyn PrivilegeCheck) -> Result<Config> {
    ConfigParser::new(cli)?.parse(privileges)
}

/// Display configuration summary for debug purposes
pub fn display_config_summary(config: &Config) -> String {
    let mut summary = Vec::new();

    summary.push(format!("Mode: {:?}", config.mode));
    summary.push(format!("Log file: {}", config.log_path.display()));
    summary.push(format!("Chart file: {}", config.plot_path.display()));
    summary.push(format!("Machine: {}", config.machine_label));
    if let Some(ref test) = config.test {
        summary.push(format!("Target: {}", test.target_address));
        summary.push(format!("Packet size: {}B", test.packet_size_bytes));
        summary.push(format!("Interval: {:.4}s", test.interval_seconds));
        summary.push(format!("Duration: {}s", test.duration_seconds));
    }
    summary.push(format!("Ping executable: {}", config.ping_bin));
    summary.push(format!("Overwrite: {}", config.overwrite));
    summary.push(format!("Color Output: {}", config.enable_color));
    summary.push(format!("Verbose: {}", config.verbose));
    summary.push(format!("Debug: {}", config.debug));

    summary.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::privilege::StaticPrivileges;
    use clap::Parser;
    use std::path::PathBuf;

    const FULL_ARGS: [&str; 9] = ["lt", "-w", "10", "-s", "64", "-i", "1", "-t", "10.0.0.1"];

    fn parse_with(args: &[&str], env: EnvSettings, elevated: bool) -> Result<Config> {
        let cli = Cli::parse_from(args);
        ConfigParser::with_env(cli, env).parse(&StaticPrivileges(elevated))
    }

    fn parse(args: &[&str]) -> Result<Config> {
        parse_with(args, EnvSettings::default(), false)
    }

    #[test]
    fn test_defaults_applied() {
        let config = parse(&FULL_ARGS).unwrap();
        let test = config.test.as_ref().unwrap();

        assert_eq!(config.mode, RunMode::TestAndPlot);
        assert_eq!(config.log_path, PathBuf::from("lt_default.log"));
        assert_eq!(config.plot_path, PathBuf::from("lt_default.svg"));
        assert_eq!(config.machine_label, "unspecified");
        assert_eq!(config.ping_bin, "ping");
        assert_eq!(test.duration_seconds, 10);
        assert_eq!(test.packet_size_bytes, 64);
        assert_eq!(test.interval_seconds, 1.0);
        assert_eq!(test.target_address, "10.0.0.1");
        assert_eq!(test.log_path, config.log_path);
    }

    #[test]
    fn test_missing_parameters_rejected() {
        let error = parse(&["lt", "-w", "10", "-s", "64", "-i", "1"]).unwrap_err();
        assert_eq!(error.exit_code(), 2);
        assert!(error.to_string().contains("-t"));

        let error = parse(&["lt"]).unwrap_err();
        assert_eq!(error.category(), "VALIDATION");
    }

    #[test]
    fn test_non_positive_packet_size_rejected() {
        for size in ["0", "-5"] {
            let mut args = FULL_ARGS.to_vec();
            args[4] = size;
            let error = parse(&args).unwrap_err();
            assert_eq!(error.exit_code(), 2, "packet size {}", size);
        }
    }

    #[test]
    fn test_fast_interval_needs_privilege() {
        let mut args = FULL_ARGS.to_vec();
        args[6] = "0.05";

        let error = parse_with(&args, EnvSettings::default(), false).unwrap_err();
        assert_eq!(error.category(), "PERMISSION");

        let config = parse_with(&args, EnvSettings::default(), true).unwrap();
        assert_eq!(config.test.unwrap().interval_seconds, 0.05);
    }

    #[test]
    fn test_env_then_cli_precedence() {
        let env = EnvSettings {
            log_file: Some(PathBuf::from("env.log")),
            machine: Some("env-machine".to_string()),
            ping_bin: Some("/opt/ping".to_string()),
            enable_color: Some(false),
        };

        let config = parse_with(&FULL_ARGS, env.clone(), false).unwrap();
        assert_eq!(config.log_path, PathBuf::from("env.log"));
        assert_eq!(config.plot_path, PathBuf::from("env.svg"));
        assert_eq!(config.machine_label, "env-machine");
        assert_eq!(config.ping_bin, "/opt/ping");
        assert!(!config.enable_color);

        let mut args = FULL_ARGS.to_vec();
        args.extend(["-l", "cli.log", "-m", "cli-machine", "--color"]);
        let config = parse_with(&args, env, false).unwrap();
        assert_eq!(config.log_path, PathBuf::from("cli.log"));
        assert_eq!(config.machine_label, "cli-machine");
        assert!(config.enable_color);
    }

    #[test]
    fn test_plot_only_without_parameters() {
        let config = parse(&["lt", "--plotonly", "-l", "old.log"]).unwrap();
        assert_eq!(config.mode, RunMode::PlotOnly);
        assert!(config.test.is_none());
        assert_eq!(config.plot_path, PathBuf::from("old.svg"));
    }

    #[test]
    fn test_plot_only_keeps_complete_fallback() {
        let mut args = FULL_ARGS.to_vec();
        args.push("--plotonly");
        let config = parse(&args).unwrap();
        assert!(config.test.is_some());
    }

    #[test]
    fn test_plot_only_skips_privilege_gate() {
        let config = parse(&["lt", "--plotonly", "-w", "10", "-s", "64", "-i", "0.01", "-t", "h"]).unwrap();
        assert_eq!(config.test.unwrap().interval_seconds, 0.01);
    }

    #[test]
    fn test_plot_only_ignores_partial_parameters() {
        let config = parse(&["lt", "--plotonly", "-w", "10"]).unwrap();
        assert!(config.test.is_none());
    }

    #[test]
    fn test_explicit_plot_file() {
        let mut args = FULL_ARGS.to_vec();
        args.extend(["-p", "chart.svg"]);
        let config = parse(&args).unwrap();
        assert_eq!(config.plot_path, PathBuf::from("chart.svg"));
    }

    #[test]
    fn test_conflicting_flags_rejected() {
        let mut args = FULL_ARGS.to_vec();
        args.extend(["--color", "--no-color"]);
        assert_eq!(parse(&args).unwrap_err().category(), "VALIDATION");
    }

    #[test]
    fn test_config_summary() {
        let config = parse(&FULL_ARGS).unwrap();
        let summary = display_config_summary(&config);

        assert!(summary.contains("Log file: lt_default.log"));
        assert!(summary.contains("Target: 10.0.0.1"));
        assert!(summary.contains("Interval: 1.0000s"));
    }
}
