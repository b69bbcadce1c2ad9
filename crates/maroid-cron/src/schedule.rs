// SPDX-FileCopyrightText: 2026 Maroid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cron expression parsing and next-fire computation.

use std::time::Duration;

use chrono::{DateTime, Utc};
use croner::Cron;
use croner::errors::CronError;
use croner::parser::{CronParser, Seconds};
use maroid_core::MaroidError;

/// Parses a cron expression with an optional leading seconds field.
pub fn parse_schedule(expr: &str) -> Result<Cron, CronError> {
    CronParser::builder()
        .seconds(Seconds::Optional)
        .build()
        .parse(expr)
}

/// Next fire time strictly after `after`.
pub(crate) fn next_after(cron: &Cron, after: DateTime<Utc>) -> Result<DateTime<Utc>, MaroidError> {
    cron.find_next_occurrence(&after, false)
        .map_err(|e| MaroidError::Internal(format!("cannot compute next cron occurrence: {e}")))
}

/// Time left until `at`, zero when it is already due.
pub(crate) fn until(at: DateTime<Utc>, now: DateTime<Utc>) -> Duration {
    (at - now).to_std().unwrap_or(Duration::ZERO)
}
