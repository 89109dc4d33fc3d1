//! Validation rules for test parameters

use crate::{
    error::{AppError, Result},
    models::TestConfig,
    privilege::PrivilegeCheck,
};
use std::net::IpAddr;

/// Configuration validator with advanced validation rules
pub struct ConfigValidator;

impl ConfigValidator {
    /// A required flag holding a strictly positive integer that fits `u32`
    pub fn require_positive_int(name: &str, flag: &str, value: Option<i64>) -> Result<u32> {
        let value = value.ok_or_else(|| AppError::validation(format!("{} ({}) is required", name, flag)))?;

        if value <= 0 {
            return Err(AppError::validation(format!(
                "{} ({}) must be a positive integer, got {}",
                name, flag, value
            )));
        }

        u32::try_from(value)
            .map_err(|_| AppError::validation(format!("{} ({}) is too large: {}", name, flag, value)))
    }

    /// The probe interval: present, finite and strictly positive
    pub fn require_interval(value: Option<f64>) -> Result<f64> {
        let value = value.ok_or_else(|| AppError::validation("interval (-i) is required"))?;

        if !value.is_finite() || value <= 0.0 {
            return Err(AppError::validation(format!(
                "interval (-i) must be a positive number of seconds, got {}",
                value
            )));
        }

        if value < crate::defaults::MIN_INTERVAL {
            return Err(AppError::validation(format!(
                "interval (-i) must be at least {}s to be recorded in the log header, got {}",
                crate::defaults::MIN_INTERVAL,
                value
            )));
        }

        Ok(value)
    }

    /// The target host: a plain IP address or domain name that `ping`
    /// cannot mistake for an option
    pub fn require_target(value: Option<&str>) -> Result<String> {
        let target = value
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::validation("target address (-t) is required"))?;

        if target.starts_with('-') {
            return Err(AppError::validation(format!(
                "target address '{}' must not start with '-'",
                target
            )));
        }

        if target.contains(|c: char| c.is_whitespace() || c == ',') {
            return Err(AppError::validation(format!(
                "target address '{}' must not contain whitespace or commas",
                target
            )));
        }

        if target.parse::<IpAddr>().is_err() && url::Host::parse(target).is_err() {
            return Err(AppError::validation(format!(
                "target address '{}' is neither an IP address nor a host name",
                target
            )));
        }

        Ok(target.to_string())
    }

    /// Sub-0.2 s intervals are only allowed with elevated privileges
    pub fn check_interval_privilege(interval_seconds: f64, privileges: &dyn PrivilegeCheck) -> Result<()> {
        if interval_seconds < crate::defaults::MIN_UNPRIVILEGED_INTERVAL && !privileges.is_elevated() {
            return Err(AppError::permission(format!(
                "an interval of {}s is below {}s and requires root/Administrator privileges",
                interval_seconds,
                crate::defaults::MIN_UNPRIVILEGED_INTERVAL
            )));
        }

        Ok(())
    }

    /// Non-fatal observations about a valid configuration
    pub fn validate_comprehensive(config: &TestConfig) -> Result<Vec<ValidationWarning>> {
        config.validate()?;

        let mut warnings = Vec::new();

        if f64::from(config.duration_seconds) < config.interval_seconds {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                format!(
                    "Test duration {}s is shorter than the {}s interval; at most one reply will be recorded",
                    config.duration_seconds, config.interval_seconds
                ),
            ));
        }

        if config.duration_seconds > 3600 {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!("Test will run for {} minutes", config.duration_seconds / 60),
            ));
        }

        if config.packet_size_bytes > 1472 {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!(
                    "Packet size {}B exceeds a 1500-byte MTU and will be fragmented",
                    config.packet_size_bytes
                ),
            ));
        }

        let expected = config.header().expected_replies();
        if expected > 100_000 {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                format!("Test will record about {} samples", expected),
            ));
        }

        Ok(warnings)
    }
}

/// Validation warning levels
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationLevel {
    Info,
    Warning,
}

impl ValidationLevel {
    /// Get display string for level
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
        }
    }
}

/// Configuration validation warning
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub level: ValidationLevel,
    pub message: String,
}

impl ValidationWarning {
    /// Create a new validation warning
    pub fn new(level: ValidationLevel, message: String) -> Self {
        Self { level, message }
    }

    /// Format warning for display
    pub fn format(&self) -> String {
        format!("[{}] {}", self.level.as_str(), self.message)
    }
}

/// Convenience function for comprehensive configuration validation
pub fn validate_config(config: &TestConfig) -> Result<Vec<ValidationWarning>> {
    ConfigValidator::validate_comprehensive(config)
}
