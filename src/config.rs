// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F. (https://github.com/tomtom215/event-patterns)

//! Search configuration.
//!
//! ```toml
//! max_steps_per_attempt = 250000
//! prefilter = true
//! ```
//!
//! Every field is optional; missing fields take their defaults. Without
//! `max_steps_per_attempt` attempts run to completion.

use serde::Deserialize;

use crate::error::ConfigError;

/// Tuning knobs for the search driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    /// Engine steps allowed per start index before the attempt is abandoned.
    ///
    /// `None` (the default) never abandons an attempt. A limit bounds the
    /// time spent on pathological patterns, such as nested unbounded
    /// repetitions over long runs of matching events, at the cost of
    /// reporting an abandoned attempt as no match.
    pub max_steps_per_attempt: Option<usize>,
    /// Test the pattern's leading literal before running a full attempt.
    pub prefilter: bool,
}

impl SearchConfig {
    /// Parses a configuration from TOML text.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Limits each attempt to `steps` engine steps.
    #[must_use]
    pub const fn with_max_steps_per_attempt(mut self, steps: usize) -> Self {
        self.max_steps_per_attempt = Some(steps);
        self
    }

    /// Enables or disables the leading-literal prefilter.
    #[must_use]
    pub const fn with_prefilter(mut self, prefilter: bool) -> Self {
        self.prefilter = prefilter;
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_steps_per_attempt == Some(0) {
            return Err(ConfigError::Invalid(
                "max_steps_per_attempt must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_steps_per_attempt: None,
            prefilter: true,
        }
    }
}
