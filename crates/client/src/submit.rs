//! Submission state machine.
//!
//! Gate order on each call: single-flight, content validation, cooldown,
//! one-shot marker, minimum attempt interval, warm-up, then the network send
//! with retry. Everything before the send resolves locally without a network
//! call.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, info, warn};
use whisper_core::{validate_content, Error, Result};

use crate::backoff::RetryPolicy;
use crate::clock::Clock;
use crate::session::{SessionState, SessionStore};
use crate::transport::SubmitTransport;

/// Where the machine currently is. `Sending` covers the whole retry loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitState {
    Idle,
    Sending,
    Succeeded,
    Failed,
}

/// Local resolution of one `submit` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The service accepted the message.
    Accepted { message_id: String },
    /// Within the cooldown window after a previous success.
    CooldownActive { remaining: Duration },
    /// The durable one-shot marker is set.
    AlreadySubmitted,
    /// Less than the minimum interval since the previous attempt.
    TooSoon,
    /// Another submission is in flight; this call was a no-op.
    SendInProgress,
}

/// Tunable policy knobs. Defaults come from `whisper_core::limits`.
#[derive(Debug, Clone)]
pub struct SubmitClientConfig {
    pub cooldown: Duration,
    pub min_interval: Duration,
    pub warmup_period: Duration,
    pub retry: RetryPolicy,
}

impl Default for SubmitClientConfig {
    fn default() -> Self {
        use whisper_core::limits::{MIN_ATTEMPT_INTERVAL, SUBMISSION_COOLDOWN, WARMUP_PERIOD};
        Self {
            cooldown: SUBMISSION_COOLDOWN,
            min_interval: MIN_ATTEMPT_INTERVAL,
            warmup_period: WARMUP_PERIOD,
            retry: RetryPolicy::default(),
        }
    }
}

/// Resilient submission client.
pub struct SubmitClient {
    transport: Arc<dyn SubmitTransport>,
    clock: Arc<dyn Clock>,
    store: SessionStore,
    session: Mutex<SessionState>,
    machine: Mutex<SubmitState>,
    is_sending: AtomicBool,
    /// Unix ms of the previous attempt, success or not. In-memory only:
    /// the damper targets double-clicks, not restarts.
    last_attempt_ms: AtomicU64,
    config: SubmitClientConfig,
}

impl SubmitClient {
    /// Open (or create) durable state at `state_path` and build the client.
    pub fn new(
        transport: Arc<dyn SubmitTransport>,
        clock: Arc<dyn Clock>,
        state_path: impl AsRef<std::path::Path>,
        config: SubmitClientConfig,
    ) -> Result<Self> {
        let (store, session) = SessionStore::open(state_path)?;

        Ok(Self {
            transport,
            clock,
            store,
            session: Mutex::new(session),
            machine: Mutex::new(SubmitState::Idle),
            is_sending: AtomicBool::new(false),
            last_attempt_ms: AtomicU64::new(0),
            config,
        })
    }

    /// Current machine state.
    pub fn state(&self) -> SubmitState {
        *self.machine.lock()
    }

    /// The durable session id sent with every submission.
    pub fn session_id(&self) -> String {
        self.session.lock().session_id.clone()
    }

    /// Attempt one submission, resolving the local gates first.
    ///
    /// Returns `Err` only for terminal failures: invalid content, a
    /// non-retryable server rejection, or retry exhaustion (one aggregated
    /// error naming the last cause).
    pub async fn submit(&self, content: &str) -> Result<SubmitOutcome> {
        let content = validate_content(content)?;

        // Single-flight: a second call while sending is a no-op.
        if self.is_sending.swap(true, Ordering::SeqCst) {
            debug!("Submission already in flight, ignoring");
            return Ok(SubmitOutcome::SendInProgress);
        }

        let result = self.submit_inner(&content).await;
        self.is_sending.store(false, Ordering::SeqCst);
        result
    }

    async fn submit_inner(&self, content: &str) -> Result<SubmitOutcome> {
        let now = self.clock.now_ms();

        // Gates over durable state. Lock scope must not cross an await.
        let session_id = {
            let session = self.session.lock();

            if let Some(last) = session.last_submission_ms {
                let cooldown_ms = self.config.cooldown.as_millis() as u64;
                let elapsed = now.saturating_sub(last);
                if elapsed < cooldown_ms {
                    return Ok(SubmitOutcome::CooldownActive {
                        remaining: Duration::from_millis(cooldown_ms - elapsed),
                    });
                }
            }

            if session.has_submitted {
                return Ok(SubmitOutcome::AlreadySubmitted);
            }

            session.session_id.clone()
        };

        // Attempt damper, independent of success.
        let last_attempt = self.last_attempt_ms.load(Ordering::SeqCst);
        if last_attempt != 0
            && now.saturating_sub(last_attempt) < self.config.min_interval.as_millis() as u64
        {
            return Ok(SubmitOutcome::TooSoon);
        }
        self.last_attempt_ms.store(now, Ordering::SeqCst);

        self.ensure_warmed(now).await?;

        self.send_with_retry(content, &session_id).await
    }

    /// Obtain the warm-up signal if the cached one is stale.
    ///
    /// Cached in durable state independent of the cooldown and one-shot
    /// markers.
    async fn ensure_warmed(&self, now: u64) -> Result<()> {
        let warmed_at = self.session.lock().warmed_up_at_ms;
        let period_ms = self.config.warmup_period.as_millis() as u64;

        let stale = match warmed_at {
            Some(at) => now.saturating_sub(at) >= period_ms,
            None => true,
        };
        if !stale {
            return Ok(());
        }

        self.transport.warm_up().await?;

        let snapshot = {
            let mut session = self.session.lock();
            session.warmed_up_at_ms = Some(now);
            session.clone()
        };
        if let Err(e) = self.store.save(&snapshot) {
            warn!(error = %e, "Failed to persist warm-up marker");
        }

        debug!("Warm-up complete");
        Ok(())
    }

    async fn send_with_retry(&self, content: &str, session_id: &str) -> Result<SubmitOutcome> {
        *self.machine.lock() = SubmitState::Sending;

        let max = self.config.retry.max_attempts;
        let mut last_err: Option<Error> = None;

        for attempt in 1..=max {
            match self.transport.send(content, session_id).await {
                Ok(message_id) => {
                    self.record_success();
                    info!(message_id = %message_id, attempt, "Message submitted");
                    return Ok(SubmitOutcome::Accepted { message_id });
                }
                Err(e) if e.is_transient() => {
                    warn!(attempt, error = %e, "Send attempt failed");
                    if attempt < max {
                        let delay = self.config.retry.delay_after(attempt);
                        self.clock.sleep(delay).await;
                    }
                    last_err = Some(e);
                }
                Err(e) => {
                    // Validation, rate-limit, or auth rejection: retrying
                    // cannot change the answer.
                    *self.machine.lock() = SubmitState::Failed;
                    return Err(e);
                }
            }
        }

        *self.machine.lock() = SubmitState::Failed;
        let last = last_err
            .map(|e| e.to_string())
            .unwrap_or_else(|| "unknown error".to_string());
        Err(Error::network(format!(
            "Failed after {} attempts. Last error: {}",
            max, last
        )))
    }

    fn record_success(&self) {
        let snapshot = {
            let mut session = self.session.lock();
            session.has_submitted = true;
            session.last_submission_ms = Some(self.clock.now_ms());
            session.clone()
        };
        if let Err(e) = self.store.save(&snapshot) {
            warn!(error = %e, "Failed to persist submission markers");
        }
        *self.machine.lock() = SubmitState::Succeeded;
    }
}

/// Render a cooldown remainder as minutes and seconds, e.g. `59m 03s`.
pub fn format_remaining(remaining: Duration) -> String {
    let total_secs = remaining.as_secs();
    format!("{}m {:02}s", total_secs / 60, total_secs % 60)
}
