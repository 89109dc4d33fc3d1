//! lt - ping latency tester
//!
//! Runs the system `ping` against a target, logs one RTT sample per reply
//! and renders the samples as an SVG chart.

use clap::Parser;
use latency_tester::{
    app::App,
    cli::{supports_color, Cli},
    error::ErrorReporter,
};
use std::process;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panic: {}", panic_info);
        process::exit(99);
    }));

    let cli = Cli::parse();
    let reporter = ErrorReporter::new(
        cli.color_override().unwrap_or_else(supports_color),
        cli.verbose || cli.debug,
    );

    let result = match App::new(cli) {
        Ok(app) => app.run().await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        reporter.report_error(&e);
        process::exit(e.exit_code());
    }
}
