//! alert-map-bot - region-scoped air-raid alert notifications.
//!
//! This crate provides the alert-subscription and notification-dispatch
//! engine behind the bot:
//! - Per-subscriber region subscriptions backed by SQLite
//! - A supervised poll loop against the alerts.in.ua API
//! - Fanout to the Telegram Bot API with partial-failure tolerance
//! - Operator broadcasts with a truthful delivery ledger

pub mod alert;
pub mod config;
pub mod database;
pub mod error;
pub mod logging;
pub mod notify;
pub mod service;
pub mod task;
