/// ======================= Units =======================
/// Smallest integer subunit per KAS
pub const SOMPI_PER_KAS: f64 = 100_000_000.0;

/// ======================= Timestamps =======================
/// 2100-01-01T00:00:00Z, anything past this is treated as a bogus block time
pub const MAX_VALID_TIMESTAMP: i64 = 4_102_444_800;

pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Human-readable date stored for transfers whose timestamp failed validation
pub const INVALID_DATE: &str = "invalid";

/// ======================= Kaspa REST API =======================
pub const KASPA_API_URL: &str = "https://api.kaspa.org";

pub const DEFAULT_MAX_TRANSFERS_PER_ADDRESS: usize = 100;

/// ======================= Presentation =======================
pub const NODE_SIZE_MIN: f64 = 5.0;
pub const NODE_SIZE_RANGE: f64 = 45.0;

/// Floor for the centrality denominator when scaling node sizes
pub const MIN_CENTRALITY_NORMALIZER: f64 = 0.01;

pub const EDGE_WIDTH_BASE: f64 = 1.0;
pub const EDGE_WIDTH_MAX_EXTRA: f64 = 5.0;
pub const EDGE_WIDTH_AMOUNT_DIVISOR: f64 = 100.0;

pub const COLOR_KNOWN_EXCHANGE: &str = "#d62728";
pub const COLOR_POTENTIAL_EXCHANGE: &str = "#ff7f0e";
pub const COLOR_START: &str = "#2ca02c";
pub const COLOR_DEFAULT: &str = "#1f77b4";

/// Addresses at or below this length are shown unabridged
pub const LABEL_MAX_FULL_LENGTH: usize = 15;
pub const LABEL_PREFIX_CHARS: usize = 10;
pub const LABEL_SUFFIX_CHARS: usize = 4;
