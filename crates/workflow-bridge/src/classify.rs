use serde_json::{Map, Value};

/// Literal acknowledgement the engine sends when it accepted a trigger but
/// runs the workflow asynchronously.
pub const WORKFLOW_STARTED_MESSAGE: &str = "Workflow was started";

/// Recognized shapes of a raw engine reply, in recognition precedence order.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowReply {
    /// Asynchronous acknowledgement; the result must be polled separately.
    Started,
    /// The reply itself carries the result fields.
    Immediate(Map<String, Value>),
    /// The result arrived JSON-encoded inside an `output` string.
    Nested(Map<String, Value>),
    /// Nothing usable; normalization will fall back to defaults.
    Empty,
}

/// Classify a raw engine reply. A `message` of "Workflow was started" wins
/// over everything else, including a reply that also carries result fields.
pub fn classify(body: Value) -> WorkflowReply {
    let Value::Object(map) = body else {
        return WorkflowReply::Empty;
    };

    if map.get("message").and_then(Value::as_str) == Some(WORKFLOW_STARTED_MESSAGE) {
        return WorkflowReply::Started;
    }

    if map.contains_key("data") || map.contains_key("temperature") {
        return WorkflowReply::Immediate(map);
    }

    if let Some(output) = map.get("output").and_then(Value::as_str) {
        // A malformed or non-object `output` is treated as no data at all.
        if let Ok(Value::Object(nested)) = serde_json::from_str::<Value>(output) {
            return WorkflowReply::Nested(nested);
        }
    }

    WorkflowReply::Empty
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn started_message_wins_over_result_fields() {
        let reply = classify(json!({
            "message": "Workflow was started",
            "temperature": 18,
        }));
        assert_eq!(reply, WorkflowReply::Started);
    }

    #[test]
    fn other_messages_do_not_mean_started() {
        let reply = classify(json!({ "message": "Workflow finished" }));
        assert_eq!(reply, WorkflowReply::Empty);
    }

    #[test]
    fn temperature_key_marks_an_immediate_reply() {
        let reply = classify(json!({ "temperature": 18, "city": "Lyon" }));
        match reply {
            WorkflowReply::Immediate(map) => assert_eq!(map["city"], "Lyon"),
            other => panic!("expected immediate reply, got {other:?}"),
        }
    }

    #[test]
    fn data_key_marks_an_immediate_reply() {
        let reply = classify(json!({ "data": { "temperature": 18 } }));
        assert!(matches!(reply, WorkflowReply::Immediate(_)));
    }

    #[test]
    fn output_string_is_unwrapped_when_it_parses() {
        let reply = classify(json!({
            "output": "{\"temperature\":5,\"conditions\":\"Snowy\"}",
        }));
        match reply {
            WorkflowReply::Nested(map) => {
                assert_eq!(map["temperature"], 5);
                assert_eq!(map["conditions"], "Snowy");
            }
            other => panic!("expected nested reply, got {other:?}"),
        }
    }

    #[test]
    fn unparseable_output_degrades_to_empty() {
        assert_eq!(classify(json!({ "output": "not json" })), WorkflowReply::Empty);
    }

    #[test]
    fn non_object_output_degrades_to_empty() {
        assert_eq!(classify(json!({ "output": "42" })), WorkflowReply::Empty);
    }

    #[test]
    fn non_object_bodies_are_empty() {
        assert_eq!(classify(json!([1, 2, 3])), WorkflowReply::Empty);
        assert_eq!(classify(Value::Null), WorkflowReply::Empty);
    }
}
