//! Sample log file format
//!
//! A log is plain text: an optional header line
//! `duration,packet_size,interval,target,machine` (interval with four
//! decimals) followed by one RTT sample in milliseconds per line, in the
//! order the replies arrived.

use crate::{
    error::{AppError, ErrorContext, Result},
    models::{LogHeader, SampleSeries},
};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, ErrorKind, Write};
use std::path::Path;

/// Render a header as its log line (without newline)
pub fn format_header(header: &LogHeader) -> String {
    format!(
        "{},{},{:.4},{},{}",
        header.duration_seconds,
        header.packet_size_bytes,
        header.interval_seconds,
        header.target_address,
        header.machine_label
    )
}

/// Parse a header line. Returns `Ok(None)` when the line is not a header
/// at all (sample lines never contain a comma).
pub fn parse_header(line: &str) -> Result<Option<LogHeader>> {
    let line = line.trim();
    if !line.contains(',') {
        return Ok(None);
    }

    let fields: Vec<&str> = line.splitn(5, ',').map(str::trim).collect();
    if fields.len() != 5 {
        return Err(AppError::parse(format!(
            "malformed log header '{}': expected duration,packet_size,interval,target,machine",
            line
        )));
    }

    let duration_seconds: u32 = fields[0]
        .parse()
        .map_err(|e| AppError::parse(format!("invalid duration '{}' in log header: {}", fields[0], e)))?;
    let packet_size_bytes: u32 = fields[1]
        .parse()
        .map_err(|e| AppError::parse(format!("invalid packet size '{}' in log header: {}", fields[1], e)))?;
    let interval_seconds: f64 = fields[2]
        .parse()
        .map_err(|e| AppError::parse(format!("invalid interval '{}' in log header: {}", fields[2], e)))?;

    if duration_seconds == 0 || packet_size_bytes == 0 {
        return Err(AppError::parse(format!("log header '{}' declares a zero duration or packet size", line)));
    }
    if !interval_seconds.is_finite() || interval_seconds <= 0.0 {
        return Err(AppError::parse(format!("log header '{}' declares a non-positive interval", line)));
    }

    Ok(Some(LogHeader {
        duration_seconds,
        packet_size_bytes,
        interval_seconds,
        target_address: unquote(fields[3]).to_string(),
        machine_label: unquote(fields[4]).to_string(),
    }))
}

fn unquote(field: &str) -> &str {
    field
        .strip_prefix('"')
        .and_then(|f| f.strip_suffix('"'))
        .unwrap_or(field)
}

/// A log file read back from disk
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub header: Option<LogHeader>,
    pub samples: SampleSeries,
}

/// Read a log file: optional header, then one sample per line.
/// Blank lines are skipped.
pub fn read_log(path: &Path) -> Result<LogRecord> {
    let file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => AppError::file_state(format!("log file '{}' not found", path.display())),
        _ => AppError::io(format!("cannot open log file '{}': {}", path.display(), e)),
    })?;

    parse_log(BufReader::new(file)).with_context(|| format!("While reading '{}'", path.display()))
}

/// Parse log contents from any reader
pub fn parse_log<R: BufRead>(reader: R) -> Result<LogRecord> {
    let mut header = None;
    let mut samples = SampleSeries::default();
    let mut seen_content = false;

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        // Only the first non-blank line may be a header
        if !std::mem::replace(&mut seen_content, true) {
            if let Some(parsed) = parse_header(trimmed)? {
                header = Some(parsed);
                continue;
            }
        }

        let value: f64 = trimmed.parse().map_err(|_| {
            AppError::parse(format!("line {}: '{}' is not a latency sample", index + 1, trimmed))
        })?;
        if !value.is_finite() || value < 0.0 {
            return Err(AppError::parse(format!(
                "line {}: '{}' is not a valid latency",
                index + 1,
                trimmed
            )));
        }
        samples.push(value);
    }

    Ok(LogRecord { header, samples })
}

/// Append-only writer for a fresh log file. The handle is owned for the
/// writer's lifetime and flushed on drop, so early returns never leave
/// buffered samples behind.
pub struct LogWriter {
    writer: BufWriter<File>,
    samples_written: usize,
}

impl LogWriter {
    /// Create the log. Unless `overwrite` is set an existing file is left
    /// untouched and a file-state error is returned.
    pub fn create(path: &Path, overwrite: bool) -> Result<Self> {
        let mut options = OpenOptions::new();
        options.write(true);
        if overwrite {
            options.create(true).truncate(true);
        } else {
            options.create_new(true);
        }

        let file = options.open(path).map_err(|e| match e.kind() {
            ErrorKind::AlreadyExists => AppError::file_state(format!(
                "log file '{}' already exists (pass --overwrite to replace it)",
                path.display()
            )),
            _ => AppError::io(format!("cannot create log file '{}': {}", path.display(), e)),
        })?;

        Ok(Self {
            writer: BufWriter::new(file),
            samples_written: 0,
        })
    }

    pub fn write_header(&mut self, header: &LogHeader) -> Result<()> {
        writeln!(self.writer, "{}", format_header(header))?;
        self.writer.flush()?;
        Ok(())
    }

    /// Append one sample and flush so the log stays current while a long
    /// test runs
    pub fn append_sample(&mut self, rtt_ms: f64) -> Result<()> {
        writeln!(self.writer, "{}", rtt_ms)?;
        self.writer.flush()?;
        self.samples_written += 1;
        Ok(())
    }

    /// Flush and sync the log, returning the number of samples written
    pub fn finish(mut self) -> Result<usize> {
        self.writer.flush()?;
        self.writer.get_ref().sync_all()?;
        Ok(self.samples_written)
    }
}
