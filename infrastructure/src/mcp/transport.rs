//! Frame classification for the MCP reader loop.

/// Classification of an incoming JSON-RPC frame.
///
/// - `Response` → oneshot correlation for pending requests
/// - `IncomingRequest` → answered directly by the reader loop (e.g. `ping`)
/// - `Notification` → logged
#[derive(Debug, PartialEq, Eq)]
pub enum MessageKind {
    /// A response to a request we sent (has `id`, no `method`).
    Response,
    /// A request from the server (has `id` + `method`).
    IncomingRequest { id: u64 },
    /// A notification (has `method`, no `id`).
    Notification,
    /// Neither shape; ignored.
    Invalid,
}

/// Classify a JSON-RPC message by inspecting `id` and `method` fields.
pub fn classify_message(json: &serde_json::Value) -> MessageKind {
    let id = json.get("id").and_then(|v| v.as_u64());
    let method = json.get("method").and_then(|v| v.as_str());

    match (id, method) {
        (Some(id), Some(_)) => MessageKind::IncomingRequest { id },
        (Some(_), None) => MessageKind::Response,
        (None, Some(_)) => MessageKind::Notification,
        (None, None) => MessageKind::Invalid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn classify_response() {
        let msg = json!({"jsonrpc": "2.0", "id": 1, "result": {}});
        assert_eq!(classify_message(&msg), MessageKind::Response);
    }

    #[test]
    fn classify_incoming_request() {
        let msg = json!({"jsonrpc": "2.0", "id": 42, "method": "ping"});
        assert_eq!(
            classify_message(&msg),
            MessageKind::IncomingRequest { id: 42 }
        );
    }

    #[test]
    fn classify_notification() {
        let msg = json!({"jsonrpc": "2.0", "method": "notifications/message", "params": {}});
        assert_eq!(classify_message(&msg), MessageKind::Notification);
    }

    #[test]
    fn classify_invalid() {
        let msg = json!({"jsonrpc": "2.0", "result": {}});
        assert_eq!(classify_message(&msg), MessageKind::Invalid);
    }
}
