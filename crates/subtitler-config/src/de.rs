use std::time::Duration;

use serde::{Deserialize, Deserializer, de::Error};

/// Deserialize a human-readable duration such as `"5s"` or `"30m"`
pub fn duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    duration_str::parse(&raw).map_err(|e| D::Error::custom(format!("invalid duration '{raw}': {e}")))
}
