// ABOUTME: Custom serde deserializers for config types.
// ABOUTME: Validates retention counts and production host names.

use serde::Deserialize;
use std::collections::HashMap;
use std::num::NonZeroUsize;

use crate::types::AppName;

pub fn deserialize_retain<'de, D>(deserializer: D) -> Result<Option<NonZeroUsize>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value: Option<usize> = Option::deserialize(deserializer)?;
    match value {
        None => Ok(None),
        Some(n) => NonZeroUsize::new(n).map(Some).ok_or_else(|| {
            serde::de::Error::custom("retain must be at least 1, or omitted to keep every archive")
        }),
    }
}

pub fn deserialize_hosts<'de, D>(deserializer: D) -> Result<HashMap<String, String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let hosts: HashMap<String, String> = HashMap::deserialize(deserializer)?;

    for (app, host) in &hosts {
        AppName::new(app)
            .map_err(|e| serde::de::Error::custom(format!("hosts key {app:?}: {e}")))?;
        if host.is_empty() || host.contains(char::is_whitespace) || host.contains('.') {
            return Err(serde::de::Error::custom(format!(
                "host for {app} must be a single DNS label, got {host:?}"
            )));
        }
    }

    Ok(hosts)
}
