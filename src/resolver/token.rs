use crate::config::ResolverConfig;
use crate::error::UpstreamError;
use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

/// A freshly issued bearer token and its advertised lifetime
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub access_token: String,
    pub expires_in: Duration,
}

/// Performs the client-credentials exchange
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn issue_token(&self) -> Result<IssuedToken, UpstreamError>;
}

#[derive(Debug, Clone)]
pub struct CachedToken {
    pub token: String,
    pub expires_at: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenPolicy {
    /// Reuse the cached token only while more than this remains
    pub refresh_margin: Duration,
    /// Floor for the server-reported lifetime
    pub min_lifetime: Duration,
}

impl From<&ResolverConfig> for TokenPolicy {
    fn from(config: &ResolverConfig) -> Self {
        Self {
            refresh_margin: Duration::from_secs(config.token_refresh_margin_sec),
            min_lifetime: Duration::from_secs(config.token_min_lifetime_sec),
        }
    }
}

impl Default for TokenPolicy {
    fn default() -> Self {
        Self::from(&ResolverConfig::default())
    }
}

/// Single-flight bearer token cache: the slot stays locked for the whole
/// refresh, so concurrent callers on an expired token share one exchange.
#[derive(Debug)]
pub struct TokenCache {
    policy: TokenPolicy,
    slot: Mutex<Option<CachedToken>>,
}

impl TokenCache {
    pub fn new(policy: TokenPolicy) -> Self {
        Self {
            policy,
            slot: Mutex::new(None),
        }
    }

    pub async fn bearer(&self, source: &dyn TokenSource) -> Result<String, UpstreamError> {
        let mut slot = self.slot.lock().await;
        let now = Instant::now();

        if let Some(cached) = slot.as_ref() {
            if cached.expires_at > now + self.policy.refresh_margin {
                return Ok(cached.token.clone());
            }
            debug!("Bearer token within refresh margin, refreshing");
        }

        let issued = source.issue_token().await?;
        let lifetime = issued.expires_in.max(self.policy.min_lifetime);
        *slot = Some(CachedToken {
            token: issued.access_token.clone(),
            expires_at: now + lifetime,
        });

        Ok(issued.access_token)
    }
}
