//! Voice Queue Test Utils
//!
//! Provides shared testing utilities for the voice queue bot. The bot reacts to
//! Discord gateway payloads, so this crate focuses on building valid Serenity
//! models without a live connection.
//!
//! # Usage
//!
//! ```rust,ignore
//! use test_utils::serenity::voice_state::create_test_voice_state;
//!
//! #[tokio::test]
//! async fn test_member_unmutes() {
//!     let old = create_test_voice_state(1, Some(900), 42, true);
//!     let new = create_test_voice_state(1, Some(900), 42, false);
//!
//!     // Feed the pair to the voice handler...
//! }
//! ```

pub mod serenity;
