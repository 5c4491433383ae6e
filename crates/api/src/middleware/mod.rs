//! Request-path middleware.

pub mod rate_limit;
