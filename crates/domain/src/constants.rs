//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// Transient notice durations (milliseconds)
pub const SUCCESS_NOTICE_MS: u64 = 1200;
pub const ERROR_NOTICE_MS: u64 = 2200;

// Algerian landline/mobile numbers: leading zero then 8 or 9 digits
pub const PHONE_PATTERN: &str = r"^0\d{8,9}$";
