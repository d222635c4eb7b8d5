//! Server-side domain models.
//!
//! This module contains the domain models used by the queue service and the bot
//! adapter: per-channel speaking queues, the outcomes of queue operations, the side
//! effects the service emits, and the voice state transitions it reacts to.

pub mod voice_queue;
pub mod voice_state;
