//! Server configuration from environment variables.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use dettato_core::SelectionPolicy;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    /// JSON or markdown deck; the built-in sample deck when unset.
    pub deck_path: Option<PathBuf>,
    /// JSON diacritics table; the built-in Italian table when unset.
    pub diacritics_path: Option<PathBuf>,
    /// Speech synthesis endpoint; synthesis is disabled when unset.
    pub speech_url: Option<String>,
    pub speech_voice: String,
    pub speech_timeout: Duration,
    /// Seed for masking draws; entropy when unset.
    pub mask_seed: Option<u64>,
    pub selection_policy: SelectionPolicy,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any variable lookup. Unparseable values
    /// fall back to their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = lookup("PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3000);

        let host = lookup("HOST")
            .and_then(|value| value.parse::<IpAddr>().ok())
            .unwrap_or(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)));

        let speech_timeout = lookup("SPEECH_TIMEOUT_SECS")
            .and_then(|value| value.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(10));

        let selection_policy = match lookup("SELECTION_POLICY") {
            Some(name) => SelectionPolicy::from_name(&name).unwrap_or_else(|| {
                tracing::warn!(value = %name, "unknown SELECTION_POLICY, using compatible");
                SelectionPolicy::Compatible
            }),
            None => SelectionPolicy::Compatible,
        };

        Self {
            host,
            port,
            deck_path: non_empty(lookup("DECK_PATH")).map(PathBuf::from),
            diacritics_path: non_empty(lookup("DIACRITICS_PATH")).map(PathBuf::from),
            speech_url: non_empty(lookup("SPEECH_URL")),
            speech_voice: non_empty(lookup("SPEECH_VOICE")).unwrap_or_else(|| "Bianca".to_string()),
            speech_timeout,
            mask_seed: lookup("MASK_SEED").and_then(|value| value.parse::<u64>().ok()),
            selection_policy,
        }
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
