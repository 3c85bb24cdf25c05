use serde::Deserialize;

/// Reasons the Checkmate service found to block a URL.
///
/// Deserialized from the JSON:API style body of `GET /api/check`. The
/// service answers 204 with no body at all when it has nothing to report,
/// so a `BlockResponse` only ever exists for a blocked URL.
#[derive(Debug, Clone, Deserialize)]
pub struct BlockResponse {
    /// One entry per detection that matched the URL
    #[serde(default)]
    data: Vec<Detection>,

    /// Aggregate information across all detections
    #[serde(default)]
    meta: Meta,
}

/// A single detection reported by the service.
#[derive(Debug, Clone, Deserialize)]
pub struct Detection {
    /// Machine-readable reason code, e.g. "malicious" or "publisher-blocked"
    pub id: String,

    /// Reason-specific details; the shape varies per reason code
    #[serde(default)]
    pub attributes: serde_json::Value,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct Meta {
    #[serde(rename = "maxSeverity", default)]
    max_severity: Option<String>,
}

impl BlockResponse {
    /// Reason codes for every detection, in the order the service returned
    /// them.
    pub fn reason_codes(&self) -> Vec<&str> {
        self.data.iter().map(|detection| detection.id.as_str()).collect()
    }

    /// The worst severity across all detections, when the service reported
    /// one.
    pub fn max_severity(&self) -> Option<&str> {
        self.meta.max_severity.as_deref()
    }

    /// Every detection as returned by the service.
    pub fn detections(&self) -> &[Detection] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_a_blocked_response() {
        let response: BlockResponse = serde_json::from_str(
            r#"{
                "data": [
                    {"type": "reason", "id": "malicious", "attributes": {"source": "urlhaus"}},
                    {"type": "reason", "id": "publisher-blocked", "attributes": {}}
                ],
                "meta": {"maxSeverity": "mandatory"}
            }"#,
        )
        .unwrap();

        assert_eq!(response.reason_codes(), vec!["malicious", "publisher-blocked"]);
        assert_eq!(response.max_severity(), Some("mandatory"));
        assert_eq!(response.detections().len(), 2);
    }

    #[test]
    fn test_parses_an_empty_body() {
        let response: BlockResponse = serde_json::from_str("{}").unwrap();

        assert!(response.reason_codes().is_empty());
        assert_eq!(response.max_severity(), None);
    }
}
