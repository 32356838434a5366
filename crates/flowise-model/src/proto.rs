use chatflow_model::{PredictionRequest, PredictionResponse};
use serde::Serialize;
use serde_json::Value;

// ------------------------
// Types sent to the server
// ------------------------

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionBody<'a> {
    question: &'a str,
    chat_id: &'a str,
}

#[inline]
pub fn create_body(req: &PredictionRequest) -> PredictionBody<'_> {
    PredictionBody {
        question: &req.question,
        chat_id: &req.chat_id,
    }
}

// ------------------------------
// Types received from the server
// ------------------------------

/// Extracts the answer from a prediction body.
///
/// The server returns more fields than `text` (chat id, message id, used
/// tools, etc.), none of which matter to us.
pub fn parse_answer(body: &[u8]) -> Result<PredictionResponse, String> {
    let value = serde_json::from_slice::<Value>(body)
        .map_err(|err| format!("invalid json: {err}"))?;
    let Value::Object(mut fields) = value else {
        return Err("body is not an object".to_owned());
    };
    match fields.remove("text") {
        Some(Value::String(text)) => Ok(PredictionResponse { text }),
        Some(other) => Err(format!("`text` is not a string: {other}")),
        None => Err("`text` is missing".to_owned()),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_create_body() {
        let req = PredictionRequest::new("Hello", "chatflow-user-1700000000000");
        let body = serde_json::to_value(create_body(&req)).unwrap();
        assert_eq!(
            body,
            json!({
                "question": "Hello",
                "chatId": "chatflow-user-1700000000000"
            })
        );
    }

    #[test]
    fn test_parse_answer() {
        let body = br#"{"text":"Hi there","question":"Hello","chatId":"c","chatMessageId":"m"}"#;
        assert_eq!(parse_answer(body).unwrap().text, "Hi there");
    }

    #[test]
    fn test_parse_malformed_answer() {
        assert!(parse_answer(b"<html>Bad Gateway</html>").is_err());
        assert!(parse_answer(br#"["Hi there"]"#).is_err());
        assert!(parse_answer(br#"{"json":{}}"#).is_err());
        assert!(parse_answer(br#"{"text":null}"#).is_err());
        assert!(parse_answer(br#"{"text":42}"#).is_err());
    }
}
