//! Checker configuration
//!
//! Defaults suit library use; `from_env` lets drivers override them with
//! `BASALT_*` environment variables.

use crate::error::{CheckResult, CompilationError};

pub const DEFAULT_MAIN_PACKAGE: &str = "main";

/// Options that change how strictly a program is validated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckerConfig {
    /// Package that is allowed to define `main`
    pub main_package: String,
    /// Reject programs without a `main` function
    pub require_main: bool,
    /// Stop at the first validation error instead of aggregating
    pub fail_fast: bool,
    /// Upper bound on the number of reported diagnostics
    pub max_diagnostics: Option<usize>,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            main_package: DEFAULT_MAIN_PACKAGE.to_string(),
            require_main: false,
            fail_fast: false,
            max_diagnostics: None,
        }
    }
}

impl CheckerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_main_package(mut self, package: impl Into<String>) -> Self {
        self.main_package = package.into();
        self
    }

    pub fn with_require_main(mut self, require_main: bool) -> Self {
        self.require_main = require_main;
        self
    }

    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    pub fn with_max_diagnostics(mut self, max_diagnostics: Option<usize>) -> Self {
        self.max_diagnostics = max_diagnostics;
        self
    }

    /// Default configuration overridden by `BASALT_*` environment variables
    pub fn from_env() -> CheckResult<Self> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key/value source
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> CheckResult<Self> {
        if let Some(package) = lookup("BASALT_MAIN_PACKAGE") {
            let package = package.trim();
            if package.is_empty() {
                return Err(CompilationError::CommandLine {
                    message: "BASALT_MAIN_PACKAGE must not be empty".to_string(),
                });
            }
            self.main_package = package.to_string();
        }
        if let Some(value) = lookup("BASALT_REQUIRE_MAIN") {
            self.require_main = parse_flag("BASALT_REQUIRE_MAIN", &value)?;
        }
        if let Some(value) = lookup("BASALT_FAIL_FAST") {
            self.fail_fast = parse_flag("BASALT_FAIL_FAST", &value)?;
        }
        if let Some(value) = lookup("BASALT_MAX_DIAGNOSTICS") {
            let value = value.trim();
            self.max_diagnostics = if value.is_empty() || value == "none" {
                None
            } else {
                let limit = value.parse::<usize>().map_err(|_| CompilationError::CommandLine {
                    message: format!("BASALT_MAX_DIAGNOSTICS expects a number, got `{value}`"),
                })?;
                Some(limit)
            };
        }
        Ok(self)
    }
}

fn parse_flag(key: &str, value: &str) -> CheckResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(CompilationError::CommandLine {
            message: format!("{key} expects a boolean, got `{other}`"),
        }),
    }
}
