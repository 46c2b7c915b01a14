/// Local cache key holding the full known record set.
pub const RECORDS_KEY: &str = "records";

/// Local cache key holding the site list.
pub const SITES_KEY: &str = "sites";

/// Local cache key holding the site picked most recently in the add form.
pub const SELECTED_SITE_KEY: &str = "selectedSite";

/// WBGT at or above this value marks a calendar day as a warning.
pub const WBGT_WARNING_THRESHOLD: f64 = 30.0;

/// Accepted temperature range in °C.
pub const TEMPERATURE_RANGE: (f64, f64) = (15.0, 44.0);

/// Accepted relative humidity range in %.
pub const HUMIDITY_RANGE: (f64, f64) = (0.0, 100.0);

/// Accepted WBGT range in °C.
pub const WBGT_RANGE: (f64, f64) = (15.0, 44.0);
