use crate::config::{Config, SectionBudget, TimeoutPolicy};
use crate::error::{ErrorKind, UpstreamError};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::future::Future;
use std::time::Duration;
use tokio::time::{timeout, Instant};
use tracing::debug;

use super::retry::{retry_with_backoff, Backoff};

/// Per-call limits for one wrapped unit of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskBudget {
    pub timeout: Duration,
    pub retries: u32,
}

impl From<&SectionBudget> for TaskBudget {
    fn from(budget: &SectionBudget) -> Self {
        Self {
            timeout: Duration::from_millis(budget.timeout_ms),
            retries: budget.retries,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionFailure {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&UpstreamError> for SectionFailure {
    fn from(e: &UpstreamError) -> Self {
        Self {
            kind: e.kind(),
            message: e.to_string(),
        }
    }
}

/// Outer result of a wrapped call: either the call produced a value (which may
/// itself report "nothing available"), or it never completed.
#[derive(Debug, Clone)]
pub struct SectionOutcome<T> {
    pub name: String,
    pub elapsed: Duration,
    pub attempts: u32,
    pub result: Result<T, SectionFailure>,
}

impl<T> SectionOutcome<T> {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }

    pub fn data(&self) -> Option<&T> {
        self.result.as_ref().ok()
    }

    pub fn failure(&self) -> Option<&SectionFailure> {
        self.result.as_ref().err()
    }
}

impl<T: Serialize> Serialize for SectionOutcome<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("SectionOutcome", 6)?;
        s.serialize_field("name", &self.name)?;
        s.serialize_field("ok", &self.is_ok())?;
        s.serialize_field("elapsed_ms", &(self.elapsed.as_millis() as u64))?;
        s.serialize_field("attempts", &self.attempts)?;
        match &self.result {
            Ok(data) => {
                s.serialize_field("data", data)?;
                s.skip_field("error")?;
                s.skip_field("error_kind")?;
            }
            Err(failure) => {
                s.skip_field("data")?;
                s.serialize_field("error", &failure.message)?;
                s.serialize_field("error_kind", &failure.kind)?;
            }
        }
        s.end()
    }
}

/// Runs one unit of work with a per-attempt timeout and bounded retries.
/// Never fails: every path ends in a `SectionOutcome`.
#[derive(Debug, Clone, Copy)]
pub struct TaskExecutor {
    backoff: Backoff,
    on_timeout: TimeoutPolicy,
}

impl TaskExecutor {
    pub fn new(backoff: Backoff, on_timeout: TimeoutPolicy) -> Self {
        Self {
            backoff,
            on_timeout,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(Backoff::from(&config.retry), config.on_timeout)
    }

    pub async fn run<F, Fut, T>(
        &self,
        name: &str,
        budget: TaskBudget,
        operation: F,
    ) -> SectionOutcome<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, UpstreamError>> + Send + 'static,
        T: Send + 'static,
    {
        let start = Instant::now();
        let label = name.to_string();
        let limit = budget.timeout;
        let policy = self.on_timeout;

        let attempted = retry_with_backoff(self.backoff, budget.retries, name, move |attempt| {
            debug!("{}: attempt {} (timeout {:?})", label, attempt + 1, limit);
            attempt_once(label.clone(), limit, policy, operation())
        })
        .await;

        SectionOutcome {
            name: name.to_string(),
            elapsed: start.elapsed(),
            attempts: attempted.attempts,
            result: attempted.result.map_err(|e| SectionFailure::from(&e)),
        }
    }
}

/// One attempt runs as its own task so a fired timer can leave it running
/// (or abort it) independently of the caller.
async fn attempt_once<Fut, T>(
    name: String,
    limit: Duration,
    policy: TimeoutPolicy,
    call: Fut,
) -> Result<T, UpstreamError>
where
    Fut: Future<Output = Result<T, UpstreamError>> + Send + 'static,
    T: Send + 'static,
{
    let mut handle = tokio::spawn(call);

    match timeout(limit, &mut handle).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_err)) => {
            debug!("{}: attempt task ended abnormally: {}", name, join_err);
            Err(UpstreamError::Panicked(name))
        }
        Err(_) => {
            if policy == TimeoutPolicy::Abort {
                handle.abort();
            }
            Err(UpstreamError::Timeout {
                label: name,
                after: limit,
            })
        }
    }
}
