pub mod limits {

    /// Maximum records returned by the history endpoint.
    pub const HISTORY_LIMIT: u64 = 50;

    pub const DEFAULT_LOG_PAGE_SIZE: u64 = 20;

    pub const TOP_CLASSES_LIMIT: usize = 10;

    pub const RECENT_CLASSIFICATIONS_LIMIT: u64 = 5;
}

pub mod classification {

    /// How many characters of the encoded image are kept when full-image
    /// retention is disabled.
    pub const IMAGE_PREFIX_LEN: usize = 100;

    /// Confidence assigned when the external predictor omits a score.
    pub const REPORTED_CONFIDENCE_DEFAULT: f64 = 0.95;

    pub const FALLBACK_CONFIDENCE_MIN: f64 = 0.70;

    pub const FALLBACK_CONFIDENCE_MAX: f64 = 0.99;
}
