/// Top-level keys every fixture must carry, in reporting order.
pub const REQUIRED_TOP_LEVEL_KEYS: [&str; 4] = ["client", "server", "observations", "compat_policy"];

pub const DEFAULT_INPUT: &str = "input.json";
pub const DEFAULT_CONFIG_FILE: &str = "apicompat.toml";
pub const LOG_ENV: &str = "APICOMPAT_LOG";

pub const DEFAULT_DEPRECATED_SAMPLE: &str = "old_client_call_fails_removed_endpoint";
pub const DEFAULT_SUCCESS_SAMPLE: &str = "new_endpoint_success_with_bearer_token";

pub const DEFAULT_CURRENT_PATH: &str = "/api/v2/users/{id}";
pub const DEFAULT_DEPRECATED_PATH: &str = "/api/users/{id}";
pub const DEFAULT_SECURITY_SCHEME: &str = "bearerAuth";
pub const DEFAULT_RESPONSE_SCHEMA: &str = "UserV2";
pub const DEFAULT_REQUIRED_LINKS: [&str; 3] = ["self", "followers", "followed"];
pub const DEFAULT_INTRODUCED_FIELDS: [&str; 2] = ["last_seen", "_links"];
pub const DEFAULT_TIMESTAMP_FIELDS: [&str; 1] = ["last_seen"];

/// Body field types enforced whatever the response schema declares.
pub const FIXED_BODY_TYPES: [(&str, &str); 3] = [
    ("id", "integer"),
    ("username", "string"),
    ("last_seen", "string"),
];

/// Where the relocated field lives when the policy does not say.
pub const DEFAULT_RELOCATED_FIELD: &str = "profile.about_me";
pub const LINKS_FIELD: &str = "_links";

/// The only deprecated-endpoint behavior the checker knows how to verify.
pub const STABLE_ERROR_BEHAVIOR: &str = "stable_error";

pub const EXIT_CHECKS_FAILED: u8 = 1;
pub const EXIT_FIXTURE_MISSING: u8 = 3;
pub const EXIT_FIXTURE_INVALID: u8 = 4;
pub const EXIT_CONFIG_INVALID: u8 = 5;
pub const EXIT_INTERNAL: u8 = 6;
