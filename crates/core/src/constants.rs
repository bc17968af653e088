/// Reference token symbol
pub const REFERENCE_TOKEN: &str = "RAI";

/// Literal suffix appended after a converted value
pub const REFERENCE_SUFFIX: &str = " RAI";

/// Currency used when a code is unknown or missing
pub const DEFAULT_CURRENCY: &str = "usd";

/// Decimal precision for display when preferences carry none
pub const DEFAULT_DECIMALS: u32 = 2;

/// Bounds accepted for the display precision
pub const MIN_DECIMALS: u32 = 0;
pub const MAX_DECIMALS: u32 = 18;

/// Bounds accepted for the rate refresh interval, in seconds
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 300;
pub const MIN_REFRESH_INTERVAL_SECS: u64 = 3;
pub const MAX_REFRESH_INTERVAL_SECS: u64 = 3600;

/// Containers whose text is never scanned
pub const AVOIDED_TAGS: [&str; 10] = [
    "html", "head", "script", "noscript", "style", "img", "textarea", "input", "audio", "video",
];

/// Maximum number of pending tree changes before the queue overflows
pub const CHANGE_QUEUE_CAPACITY: usize = 1024;

/// Upper bound on drain rounds per dispatcher pump
pub const MAX_DISPATCH_ROUNDS: usize = 16;

/// Upper bound on rewrite passes over a single segment
pub const MAX_SEGMENT_PASSES: usize = 8;
