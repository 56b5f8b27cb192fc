//! API constants for the Auxo Online Web API.

/// Auxo Online Web API version segment.
pub const API_VERSION: &str = "v1";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// User agent attached to every outgoing request.
pub const USER_AGENT: &str = "auxo-api/0.1";

/// Standard headers for Auxo Online requests.
pub mod headers {
    /// Content type for JSON requests.
    pub const CONTENT_TYPE_JSON: &str = "application/json";
}

/// Path prefix shared by all versioned endpoints.
pub fn api_path() -> String {
    format!("/{}", API_VERSION)
}

/// Build a collection endpoint path.
pub fn collection_path(resource: &str) -> String {
    format!("{}/{}", api_path(), resource)
}

/// Build a single-record endpoint path.
pub fn record_path(resource: &str, id: &str) -> String {
    format!("{}/{}/{}", api_path(), resource, id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_building() {
        assert_eq!(collection_path("paymentPlans"), "/v1/paymentPlans");
        assert_eq!(record_path("queries", "42"), "/v1/queries/42");
    }
}
