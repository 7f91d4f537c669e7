pub mod classify;
pub mod enrich;
pub mod extract;
pub mod filter;
pub mod rate_limiter;
pub mod summary;
