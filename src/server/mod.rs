//! Voice speaking-queue bot backend.
//!
//! This module contains the complete bot implementation: in-memory speaking queues,
//! the Discord event handlers feeding them, and the background tasks that carry out
//! their side effects.
//!
//! # Architecture
//!
//! - **Model Layer** (`model/`) - Queue state, outcomes, events and voice transitions
//! - **Service Layer** (`service/`) - Queue logic, activity timers and Discord notifications
//! - **Bot** (`bot/`) - Slash commands and gateway event handlers
//! - **Error Layer** (`error/`) - Application error types
//!
//! # Infrastructure
//!
//! - **Configuration** (`config`) - Environment-based application configuration
//! - **Startup** (`startup`) - Logging setup and shutdown handling
//! - **Scheduler** (`scheduler/`) - Cron jobs for idle queue cleanup
//!
//! # Event Flow
//!
//! 1. **Bot** receives a slash command or voice state update
//! 2. **Service** mutates the channel's queue under its lock and emits `QueueEvent`s
//! 3. **Notification service** edits the display message or sends a reminder DM

pub mod bot;
pub mod config;
pub mod error;
pub mod model;
pub mod scheduler;
pub mod service;
pub mod startup;
