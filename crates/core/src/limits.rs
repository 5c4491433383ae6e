//! Size and timing limits for the submission pipeline.
//!
//! Server-side limits bound what a single anonymous caller can push into the
//! store. Client-side limits shape the resilient submission state machine.
//! Constants are referenced from `crates/api`, `crates/store`, and
//! `crates/client`; keep them here so both sides of the wire agree.

use std::time::Duration;

// === Content Limits ===

/// Maximum message length in characters, measured after trimming.
///
/// Submissions longer than this are rejected with `VALID_002`.
pub const MAX_CONTENT_LEN: usize = 500;

// === Rate Limiting ===

/// Accepted submissions per client address per window.
pub const RATE_LIMIT_QUOTA: u32 = 10;

/// Rate limit window length in seconds.
pub const RATE_LIMIT_WINDOW_SECS: u64 = 60;

/// Idle buckets older than this are evicted by the cleanup sweep.
pub const RATE_LIMIT_BUCKET_MAX_AGE: Duration = Duration::from_secs(600);

// === Admin Exposure ===

/// Maximum records returned by the admin listing, newest first.
pub const ADMIN_LIST_LIMIT: u32 = 50;

// === Analytics ===

/// Upper bound on a best-effort analytics write.
///
/// The write is spawned off the response path; this only bounds how long the
/// detached task may hold a pool connection.
pub const ANALYTICS_WRITE_TIMEOUT: Duration = Duration::from_secs(5);

// === Client Submission Policy ===

/// Cooldown between successful submissions from one client.
pub const SUBMISSION_COOLDOWN: Duration = Duration::from_secs(60 * 60);

/// Minimum interval between submission *attempts*, dampens double-clicks.
pub const MIN_ATTEMPT_INTERVAL: Duration = Duration::from_secs(1);

/// Warm-up is performed at most once per this period.
pub const WARMUP_PERIOD: Duration = Duration::from_secs(60 * 60);

/// Maximum send attempts per logical submission.
pub const MAX_SEND_ATTEMPTS: u32 = 3;

/// Initial retry backoff delay.
pub const RETRY_INITIAL_DELAY: Duration = Duration::from_millis(1000);

/// Cap on the retry backoff delay.
pub const RETRY_MAX_DELAY: Duration = Duration::from_millis(5000);
