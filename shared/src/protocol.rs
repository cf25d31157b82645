/// Default Mist cloud API root. Regional clouds (EU, GC1, ...) use their own host.
pub const DEFAULT_API_BASE_URL: &str = "https://api.mist.com/api/v1";

/// Authorization header scheme expected by the Mist API
pub const AUTH_SCHEME: &str = "Token";

/// Organization-scoped search endpoints, relative to the API root
pub const ORGS_PATH: &str = "orgs";
pub const CLIENTS_SEARCH_PATH: &str = "clients/search";
pub const DEVICES_SEARCH_PATH: &str = "devices/search";

/// Query parameter names
pub const PARAM_TEXT: &str = "text";
pub const PARAM_MAC: &str = "mac";

/// Value the API (and older exports) use for "no access point"
pub const NO_AP_SENTINEL: &str = "N/A";

/// Display label for a client without an access point
pub const NO_AP_LABEL: &str = "N/A (No AP)";

/// Placeholder shown for missing display values
pub const NOT_AVAILABLE: &str = "N/A";

/// Format used for the "Last Seen" column
pub const LAST_SEEN_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
