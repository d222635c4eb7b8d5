//! Cron jobs for queue housekeeping.

pub mod queue_sweeper;
