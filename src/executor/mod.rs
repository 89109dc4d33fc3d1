//! Test execution: drives the external `ping` process and streams its
//! replies into the log file
//!
//! The process boundary sits behind the [`Pinger`] trait so the runner's
//! outcome classification can be exercised without a network.

pub mod ping_output;

pub use ping_output::{build_ping_args, parse_rtt};

use crate::{
    error::{AppError, Result},
    logfile::LogWriter,
    logging::RunLogger,
    models::TestConfig,
};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::Command;

/// How the ping process ended
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PingExit {
    /// Exit code, `None` when terminated by a signal
    pub code: Option<i32>,
    pub success: bool,
    /// Everything ping wrote to stderr
    pub stderr: String,
    /// Stopped early by Ctrl-C or SIGTERM
    pub interrupted: bool,
}

/// Runs ping and hands every stdout line to `on_line` as it arrives
#[async_trait]
pub trait Pinger {
    async fn run(
        &self,
        args: &[String],
        on_line: &mut (dyn for<'l> FnMut(&'l str) -> Result<()> + Send),
    ) -> Result<PingExit>;

    /// Program name for diagnostics
    fn program(&self) -> &str;
}

/// Spawns the system ping executable
#[derive(Debug, Clone)]
pub struct SystemPinger {
    program: String,
}

impl SystemPinger {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

#[async_trait]
impl Pinger for SystemPinger {
    async fn run(
        &self,
        args: &[String],
        on_line: &mut (dyn for<'l> FnMut(&'l str) -> Result<()> + Send),
    ) -> Result<PingExit> {
        let mut child = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| AppError::ping_command(format!("failed to start '{}': {}", self.program, e)))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| AppError::internal("ping stdout was not captured"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| AppError::internal("ping stderr was not captured"))?;

        let stderr_task = tokio::spawn(async move {
            let mut buffer = Vec::new();
            stderr.read_to_end(&mut buffer).await.map(|_| buffer)
        });

        let mut lines = BufReader::new(stdout).lines();
        let shutdown = shutdown_signal();
        tokio::pin!(shutdown);
        let mut signals_armed = true;
        let mut interrupted = false;

        loop {
            tokio::select! {
                line = lines.next_line() => match line? {
                    Some(line) => on_line(&line)?,
                    None => break,
                },
                received = &mut shutdown, if signals_armed => {
                    signals_armed = false;
                    // Without signal handlers the run continues until ping exits
                    if received.is_ok() {
                        interrupted = true;
                        let _ = child.start_kill();
                        break;
                    }
                }
            }
        }

        let status = child.wait().await?;
        let stderr = stderr_task
            .await
            .map_err(|e| AppError::internal(format!("stderr reader failed: {}", e)))??;

        Ok(PingExit {
            code: status.code(),
            success: status.success(),
            stderr: String::from_utf8_lossy(&stderr).into_owned(),
            interrupted,
        })
    }

    fn program(&self) -> &str {
        &self.program
    }
}

/// Resolves on Ctrl-C, or SIGTERM on Unix
async fn shutdown_signal() -> Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut terminate = signal(SignalKind::terminate())?;
        tokio::select! {
            result = tokio::signal::ctrl_c() => result?,
            _ = terminate.recv() => {}
        }
        Ok(())
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await?;
        Ok(())
    }
}

/// Writes the log header, runs ping and appends one sample per reply
pub struct TestRunner<P: Pinger> {
    pinger: P,
    overwrite: bool,
}

impl<P: Pinger + Sync> TestRunner<P> {
    pub fn new(pinger: P, overwrite: bool) -> Self {
        Self { pinger, overwrite }
    }

    /// Run one test and return the warnings worth reporting
    pub async fn run(&self, test: &TestConfig, events: &RunLogger) -> Result<Vec<String>> {
        let mut writer = LogWriter::create(&test.log_path, self.overwrite)?;
        writer.write_header(&test.header())?;

        let args = build_ping_args(test);
        events.log_test_start(test, self.pinger.program());
        events.log_command(self.pinger.program(), &args);

        let exit = {
            let mut on_line = |line: &str| -> Result<()> {
                match parse_rtt(line) {
                    Some(rtt_ms) => writer.append_sample(rtt_ms)?,
                    None => events.log_unparsed_line(line),
                }
                Ok(())
            };
            self.pinger.run(&args, &mut on_line).await?
        };
        let recorded = writer.finish()?;

        events.log_test_end(recorded, exit.code, exit.interrupted);

        classify(recorded, &exit, self.pinger.program())
    }
}

/// Turn a finished ping run into an error or a list of warnings
pub fn classify(recorded: usize, exit: &PingExit, program: &str) -> Result<Vec<String>> {
    let mut warnings = Vec::new();

    if exit.interrupted {
        warnings.push(format!(
            "test interrupted; plotting the {} samples recorded so far",
            recorded
        ));
    }

    if recorded == 0 {
        if exit.interrupted {
            return Err(AppError::no_samples("test interrupted before any reply was recorded"));
        }

        if !exit.success {
            let stderr = exit.stderr.trim();
            let code = exit
                .code
                .map_or_else(|| "a signal".to_string(), |code| format!("code {}", code));
            return Err(AppError::ping_command(if stderr.is_empty() {
                format!("'{}' exited with {} and produced no replies", program, code)
            } else {
                format!("'{}' exited with {}: {}", program, code, stderr)
            }));
        }

        return Err(AppError::no_samples(format!(
            "'{}' finished without any parsable reply",
            program
        )));
    }

    if !exit.success && !exit.interrupted {
        warnings.push(format!(
            "'{}' exited with {} (some probes were lost)",
            program,
            exit.code.map_or_else(|| "a signal".to_string(), |code| format!("code {}", code))
        ));
    }

    Ok(warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logfile::read_log;
    use crate::logging::Logger;
    use tempfile::TempDir;

    struct ScriptedPinger {
        lines: Vec<&'static str>,
        exit: PingExit,
    }

    #[async_trait]
    impl Pinger for ScriptedPinger {
        async fn run(
            &self,
            _args: &[String],
            on_line: &mut (dyn for<'l> FnMut(&'l str) -> Result<()> + Send),
        ) -> Result<PingExit> {
            for line in &self.lines {
                on_line(line)?;
            }
            Ok(self.exit.clone())
        }

        fn program(&self) -> &str {
            "scripted-ping"
        }
    }

    fn exited(code: i32) -> PingExit {
        PingExit {
            code: Some(code),
            success: code == 0,
            ..PingExit::default()
        }
    }

    fn test_config(dir: &TempDir) -> TestConfig {
        TestConfig {
            duration_seconds: 3,
            packet_size_bytes: 64,
            interval_seconds: 1.0,
            target_address: "10.0.0.1".to_string(),
            log_path: dir.path().join("run.log"),
            machine_label: "host1".to_string(),
        }
    }

    fn events() -> RunLogger {
        let mut logger = Logger::new("TEST");
        logger.set_level(crate::logging::LogLevel::Fatal);
        RunLogger::new(&logger)
    }

    #[tokio::test]
    async fn test_run_writes_header_and_samples() {
        let dir = TempDir::new().unwrap();
        let test = test_config(&dir);
        let pinger = ScriptedPinger {
            lines: vec![
                "PING 10.0.0.1 (10.0.0.1) 64(92) bytes of data.",
                "72 bytes from 10.0.0.1: icmp_seq=1 ttl=64 time=10.0 ms",
                "72 bytes from 10.0.0.1: icmp_seq=2 ttl=64 time=20.0 ms",
                "72 bytes from 10.0.0.1: icmp_seq=3 ttl=64 time=30.0 ms",
                "rtt min/avg/max/mdev = 10.0/20.0/30.0/8.1 ms",
            ],
            exit: exited(0),
        };

        let warnings = TestRunner::new(pinger, false).run(&test, &events()).await.unwrap();
        assert!(warnings.is_empty());

        let record = read_log(&test.log_path).unwrap();
        assert_eq!(record.header, Some(test.header()));
        assert_eq!(record.samples.as_slice(), &[10.0, 20.0, 30.0]);
    }

    #[tokio::test]
    async fn test_existing_log_left_untouched() {
        let dir = TempDir::new().unwrap();
        let test = test_config(&dir);
        std::fs::write(&test.log_path, "keep me\n").unwrap();

        let pinger = ScriptedPinger {
            lines: vec!["icmp_seq=1 time=1 ms"],
            exit: exited(0),
        };
        let error = TestRunner::new(pinger, false).run(&test, &events()).await.unwrap_err();

        assert_eq!(error.category(), "FILE");
        assert_eq!(std::fs::read_to_string(&test.log_path).unwrap(), "keep me\n");
    }

    #[tokio::test]
    async fn test_overwrite_replaces_log() {
        let dir = TempDir::new().unwrap();
        let test = test_config(&dir);
        std::fs::write(&test.log_path, "old\n").unwrap();

        let pinger = ScriptedPinger {
            lines: vec!["icmp_seq=1 time=5 ms"],
            exit: exited(0),
        };
        TestRunner::new(pinger, true).run(&test, &events()).await.unwrap();

        let record = read_log(&test.log_path).unwrap();
        assert_eq!(record.samples.as_slice(), &[5.0]);
    }

    #[tokio::test]
    async fn test_ping_failure_without_samples() {
        let dir = TempDir::new().unwrap();
        let test = test_config(&dir);
        let pinger = ScriptedPinger {
            lines: vec![],
            exit: PingExit {
                stderr: "ping: unknown host\n".to_string(),
                ..exited(2)
            },
        };

        let error = TestRunner::new(pinger, false).run(&test, &events()).await.unwrap_err();
        assert_eq!(error.exit_code(), 3);
        assert!(error.to_string().contains("unknown host"));
    }

    #[test]
    fn test_classify_outcomes() {
        assert_eq!(classify(0, &exited(0), "ping").unwrap_err().exit_code(), 4);
        assert_eq!(classify(0, &exited(1), "ping").unwrap_err().exit_code(), 3);
        assert!(classify(1, &exited(0), "ping").unwrap().is_empty());

        let lossy = classify(1, &exited(1), "ping").unwrap();
        assert_eq!(lossy.len(), 1);
        assert!(lossy[0].contains("code 1"));
    }

    #[test]
    fn test_classify_interrupted() {
        let interrupted = PingExit {
            code: None,
            success: false,
            stderr: String::new(),
            interrupted: true,
        };

        let warnings = classify(2, &interrupted, "ping").unwrap();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("2 samples"));

        let error = classify(0, &interrupted, "ping").unwrap_err();
        assert_eq!(error.category(), "SAMPLES");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_system_pinger_streams_lines() {
        let pinger = SystemPinger::new("sh");
        let args = vec![
            "-c".to_string(),
            "echo 'icmp_seq=1 time=4.5 ms'; echo oops >&2; exit 1".to_string(),
        ];
        let mut seen = Vec::new();
        let mut on_line = |line: &str| -> Result<()> {
            seen.push(line.to_string());
            Ok(())
        };

        let exit = pinger.run(&args, &mut on_line).await.unwrap();
        assert_eq!(seen, vec!["icmp_seq=1 time=4.5 ms"]);
        assert_eq!(exit.code, Some(1));
        assert!(!exit.success);
        assert_eq!(exit.stderr.trim(), "oops");
        assert!(!exit.interrupted);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_system_pinger_keeps_non_utf8_stderr() {
        let pinger = SystemPinger::new("sh");
        let args = vec![
            "-c".to_string(),
            "printf 'ping: bad \\377 host\\n' >&2; exit 2".to_string(),
        ];
        let mut on_line = |_: &str| -> Result<()> { Ok(()) };

        let exit = pinger.run(&args, &mut on_line).await.unwrap();
        assert_eq!(exit.code, Some(2));
        assert!(exit.stderr.starts_with("ping: bad "));
        assert!(exit.stderr.contains('\u{FFFD}'));
        assert!(exit.stderr.trim_end().ends_with(" host"));
    }

    #[tokio::test]
    async fn test_system_pinger_missing_program() {
        let pinger = SystemPinger::new("definitely-not-a-ping-binary");
        let mut on_line = |_: &str| -> Result<()> { Ok(()) };
        let error = pinger.run(&[], &mut on_line).await.unwrap_err();
        assert_eq!(error.category(), "PING");
    }
}
