// SPDX-FileCopyrightText: 2026 Maroid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! MQTT worker for the Maroid hub.
//!
//! Subscribes every registered topic subscriber at its effective
//! (plugin-namespaced) topic and hands each inbound message to the matching
//! subscribers on their own tasks, with the namespace stripped off the topic.

pub mod route;
pub mod topic;
pub mod worker;

pub use route::Route;
pub use topic::{shared_subscription, topic_matches};
pub use worker::MqttWorker;
