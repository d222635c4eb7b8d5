//! Service layer for queue logic and Discord side effects.
//!
//! This module contains the service layer of the application, which sits between the
//! bot event handlers and Discord itself. Services are responsible for:
//!
//! - **Queue Logic**: Admission, departure and auto-advancement of speaking queues
//! - **Side Effects**: Turning queue events into Discord message edits and DMs

pub mod queue_notification;
pub mod voice_queue;
