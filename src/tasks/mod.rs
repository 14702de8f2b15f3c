//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Expiration scan: checks product expiration dates once a day

mod expiry;

pub use expiry::{
    fire_trigger, next_trigger, schedule_after, spawn_expiry_task, MISSED_TRIGGER_GRACE_MINUTES,
};
