//! Client constants
//!
//! Centralized location for wire-level constants shared by the core and
//! infrastructure layers.

// HTTP defaults
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_USER_AGENT: &str = concat!("crewconnect/", env!("CARGO_PKG_VERSION"));
pub const DEFAULT_TOKEN_FILE: &str = ".storage/tokens.json";

// Token store keys
pub const IDENTITY_TOKEN_KEY: &str = "identity";
pub const BACKEND_TOKEN_KEY: &str = "backend";

// Time zone offsets sent to the backend
pub const SCHEDULE_ZONE_OFFSET: &str = "Z";
pub const PAIRING_DETAILS_ZONE_OFFSET: &str = "+0200";

// Default minimum number of ON days for pairing options
pub const DEFAULT_MINIMUM_ON_DAYS: u32 = 1;
