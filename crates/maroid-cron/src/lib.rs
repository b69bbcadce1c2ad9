// SPDX-FileCopyrightText: 2026 Maroid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cron worker for the Maroid hub.
//!
//! Schedules every job from the cron registry. Expressions take five fields
//! (`min hour dom month dow`) or six with a leading seconds field. A job whose
//! previous run is still executing when it fires again is skipped, and a
//! failing run is logged without affecting the schedule.

pub mod schedule;
pub mod worker;

pub use schedule::parse_schedule;
pub use worker::CronWorker;
