//! Discord bot integration for speaking queues.
//!
//! This module wires the voice queue service into Discord. The bot registers the
//! `/queue` and `/leave` slash commands, turns voice state updates into queue events,
//! and hands its HTTP client to the queue notification service so display edits and
//! reminder DMs share one connection to Discord.
//!
//! The bot is initialized during startup and runs on the main task until its shards
//! shut down.
//!
//! # Gateway Intents
//!
//! The bot requires the following gateway intents:
//! - `GUILDS` - Receive guild data so the cache knows about voice channels
//! - `GUILD_VOICE_STATES` - Receive voice state updates (joins, leaves, mute toggles)
//!
//! Neither intent is privileged.

pub mod command;
pub mod handler;
pub mod start;
