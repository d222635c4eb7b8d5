use crate::server::error::{config::ConfigError, AppError};

const DISCORD_BOT_TOKEN: &str = "DISCORD_BOT_TOKEN";
const DISCORD_GUILD_ID: &str = "DISCORD_GUILD_ID";
const VOICE_QUEUE_IDLE_MINUTES: &str = "VOICE_QUEUE_IDLE_MINUTES";

/// Minutes an empty queue may sit unchanged before the sweeper drops it.
const DEFAULT_IDLE_MINUTES: i64 = 60;

pub struct Config {
    pub discord_bot_token: String,

    /// Guild to register slash commands in. Commands are registered globally when unset.
    pub discord_guild_id: Option<u64>,

    pub queue_idle_expiry: chrono::Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| std::env::var(name).ok()).map_err(AppError::from)
    }

    /// Builds the configuration from an arbitrary variable source.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let discord_bot_token = var(DISCORD_BOT_TOKEN)
            .ok_or_else(|| ConfigError::MissingEnvVar(DISCORD_BOT_TOKEN.to_string()))?;

        let discord_guild_id = var(DISCORD_GUILD_ID)
            .map(|value| parse_var::<u64>(DISCORD_GUILD_ID, value))
            .transpose()?
            .filter(|id| *id != 0);

        let idle_minutes = var(VOICE_QUEUE_IDLE_MINUTES)
            .map(|value| parse_var::<i64>(VOICE_QUEUE_IDLE_MINUTES, value))
            .transpose()?
            .unwrap_or(DEFAULT_IDLE_MINUTES);

        if idle_minutes <= 0 {
            return Err(ConfigError::InvalidEnvVar {
                name: VOICE_QUEUE_IDLE_MINUTES.to_string(),
                value: idle_minutes.to_string(),
            });
        }

        Ok(Self {
            discord_bot_token,
            discord_guild_id,
            queue_idle_expiry: chrono::Duration::minutes(idle_minutes),
        })
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidEnvVar {
            name: name.to_string(),
            value,
        })
}
