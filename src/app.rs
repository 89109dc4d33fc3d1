//! Main application orchestration and execution

use crate::{
    cli::Cli,
    config::{load_config, validate_config, ValidationLevel},
    error::{AppError, Result},
    executor::{Pinger, SystemPinger, TestRunner},
    logfile::read_log,
    logging::{Logger, RunLogger},
    models::Config,
    output::{ChartSummary, OutputCoordinator, OutputFormatterFactory},
    plot::render_chart,
    privilege::SystemPrivileges,
    stats::{analyze, check_consistency},
    types::RunMode,
};

pub const BUILD_TIME: &str = match option_env!("BUILD_TIME") {
    Some(time) => time,
    None => "unknown",
};

pub const GIT_COMMIT: &str = match option_env!("GIT_COMMIT") {
    Some(commit) => commit,
    None => "unknown",
};

/// Main application struct that coordinates all components
pub struct App {
    cli: Cli,
}

impl App {
    /// Create a new application instance with CLI configuration
    pub fn new(cli: Cli) -> Result<Self> {
        Ok(Self { cli })
    }

    /// Run the application
    pub async fn run(self) -> Result<()> {
        let config = load_config(self.cli.clone(), &SystemPrivileges)?;
        let logger = Logger::with_config("LT", &config);

        logger
            .debug("Starting lt")
            .field("version", crate::VERSION)
            .field("build_time", BUILD_TIME)
            .field("git_commit", GIT_COMMIT)
            .log();

        if config.mode == RunMode::PlotOnly && config.test.is_none() && self.cli.has_test_parameters() {
            logger
                .warn("Incomplete test parameters are ignored in plot-only mode")
                .log();
        }

        let pinger = SystemPinger::new(config.ping_bin.clone());
        let result = execute(&config, pinger, &logger).await;

        if let Err(ref error) = result {
            if config.debug {
                RunLogger::new(&logger).log_error(error);
            }
        }

        result.map(|_| ())
    }
}

/// Run the configured mode: test then plot, or plot only
pub async fn execute<P: Pinger + Sync>(config: &Config, pinger: P, logger: &Logger) -> Result<ChartSummary> {
    let events = RunLogger::new(logger);
    let output = OutputCoordinator::new(OutputFormatterFactory::create_formatter(config.enable_color));

    if config.mode.runs_test() {
        let test = config
            .test
            .as_ref()
            .ok_or_else(|| AppError::internal("test mode without test parameters"))?;

        for warning in validate_config(test)? {
            match warning.level {
                ValidationLevel::Warning => output.display_warning(&warning.message)?,
                ValidationLevel::Info => logger.info(&warning.format()).log(),
            }
        }

        output.display_banner(test)?;
        let warnings = TestRunner::new(pinger, config.overwrite).run(test, &events).await?;
        for warning in &warnings {
            output.display_warning(warning)?;
        }
    }

    let summary = plot_log(config, &events)?;
    output.display_summary(&summary)?;
    Ok(summary)
}

/// Read the log, compute statistics and write the chart
pub fn plot_log(config: &Config, events: &RunLogger) -> Result<ChartSummary> {
    let record = read_log(&config.log_path)?;

    let header = match (record.header, config.test.as_ref()) {
        (Some(header), Some(_)) if !config.mode.runs_test() => {
            events.log_warning(&format!(
                "the header of '{}' overrides the test parameters given on the command line",
                config.log_path.display()
            ));
            header
        }
        (Some(header), _) => header,
        (None, Some(test)) => test.header(),
        (None, None) => {
            return Err(AppError::validation(format!(
                "log file '{}' has no header line; pass -w, -s, -i and -t to describe the test",
                config.log_path.display()
            )))
        }
    };

    if let Some(warning) = check_consistency(&header, record.samples.len()).warning() {
        events.log_warning(&warning);
    }

    let stats = analyze(&record.samples)?;
    events.log_statistics(&stats);

    render_chart(&config.plot_path, &header, &record.samples, &stats)?;
    events.log_chart_written(&config.plot_path);

    Ok(ChartSummary {
        header,
        stats,
        log_path: config.log_path.clone(),
        plot_path: config.plot_path.clone(),
    })
}
