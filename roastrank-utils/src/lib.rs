/// Profanity masking by filter level.
pub mod filter;
/// Pure display formatting helpers (relative time, truncation).
pub mod formatting;
