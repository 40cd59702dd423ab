// Version information for the embedding service

/// Semantic version number
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Name reported by the service banner
pub const SERVICE_NAME: &str = "Local Embedding Service";

/// Returns a formatted version string for logging
pub fn get_version_string() -> String {
    format!("{} v{}", SERVICE_NAME, VERSION)
}
