//! The pagination envelope returned by listing endpoints.

use serde::{Deserialize, Serialize};

/// Wrapper around list responses: the records plus optional pagination
/// bookkeeping. The dispatcher passes this through as-is; it never
/// paginates on its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub items: Vec<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
}

impl<T> ApiResponse<T> {
    /// Total record count. An envelope without `totalCount` reads as 0.
    /// This only ever applies to successful responses; a failed count
    /// query is surfaced as an error, never defaulted.
    pub fn total(&self) -> u64 {
        self.total_count.unwrap_or(0)
    }

    /// Number of records in this page.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn first(&self) -> Option<&T> {
        self.items.first()
    }

    /// Whether the reported total extends past this page.
    pub fn has_more(&self) -> bool {
        self.offset.unwrap_or(0) + (self.items.len() as u64) < self.total()
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    #[test]
    fn test_envelope_from_json() {
        let envelope: ApiResponse<Value> = serde_json::from_value(json!({
            "items": [
                {"code": "Q1", "name": "First"},
                {"code": "Q2", "name": "Second"}
            ],
            "totalCount": 12,
            "offset": 0,
            "limit": 2
        }))
        .unwrap();

        assert_eq!(envelope.len(), 2);
        assert_eq!(envelope.total(), 12);
        assert!(envelope.has_more());
        assert_eq!(envelope.first().unwrap()["code"], json!("Q1"));
    }

    #[test]
    fn test_missing_total_count_reads_as_zero() {
        let envelope: ApiResponse<Value> = serde_json::from_value(json!({
            "items": [{"code": "Q1"}]
        }))
        .unwrap();

        assert_eq!(envelope.total_count, None);
        assert_eq!(envelope.total(), 0);
        assert!(!envelope.has_more());
    }

    #[test]
    fn test_missing_items_is_a_malformed_envelope() {
        let result: Result<ApiResponse<Value>, _> =
            serde_json::from_value(json!({"totalCount": 3}));
        assert!(result.is_err());
    }

    #[test]
    fn test_typed_items() {
        #[derive(Debug, serde::Deserialize)]
        struct PaymentPlan {
            code: String,
        }

        let envelope: ApiResponse<PaymentPlan> = serde_json::from_value(json!({
            "items": [{"code": "PLAN_A"}],
            "totalCount": 1
        }))
        .unwrap();

        assert_eq!(envelope.into_items()[0].code, "PLAN_A");
    }
}
