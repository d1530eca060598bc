//! Background tasks.

pub mod alert_poller;
