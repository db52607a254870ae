use serde_json::json;
use tunesweep_core::{Endpoint, NormalizedResult, RawResponse, SweepError};
use tunesweep_llm::normalize;

fn chat() -> Endpoint {
    Endpoint::Chat {
        url: "https://api.openai.com/v1/chat/completions".to_string(),
    }
}

fn edit() -> Endpoint {
    Endpoint::Edit {
        url: "https://api.openai.com/v1/edits".to_string(),
        model: "code-davinci-edit-001".to_string(),
        input: String::new(),
    }
}

fn ok(body: serde_json::Value) -> RawResponse {
    RawResponse::new(200, body.to_string())
}

#[test]
fn chat_response_yields_reported_model_and_first_message() {
    let response = ok(json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "created": 1680000000,
        "model": "m",
        "usage": {"prompt_tokens": 9, "completion_tokens": 12, "total_tokens": 21},
        "choices": [
            {"message": {"role": "assistant", "content": "X"}, "finish_reason": "stop", "index": 0},
            {"message": {"role": "assistant", "content": "ignored"}, "finish_reason": "stop", "index": 1}
        ]
    }));

    let result = normalize(&chat(), &response).expect("normalize");
    assert_eq!(result, NormalizedResult::new("m", "X"));
}

#[test]
fn edit_response_uses_configured_model_not_response_field() {
    let response = ok(json!({
        "object": "edit",
        "created": 1680000000,
        "model": "something-else",
        "choices": [{"text": "Y", "index": 0}],
        "usage": {"prompt_tokens": 30, "completion_tokens": 40, "total_tokens": 70}
    }));

    let result = normalize(&edit(), &response).expect("normalize");
    assert_eq!(result, NormalizedResult::new("code-davinci-edit-001", "Y"));
}

#[test]
fn empty_choices_is_a_parse_error() {
    let response = ok(json!({"model": "m", "choices": []}));
    let err = normalize(&chat(), &response).unwrap_err();
    assert!(matches!(
        err,
        SweepError::Parse { endpoint: "chat", status: 200, ref reason } if reason.contains("no choices")
    ));

    let err = normalize(&edit(), &ok(json!({"choices": []}))).unwrap_err();
    assert!(matches!(err, SweepError::Parse { endpoint: "edit", .. }));
}

#[test]
fn schema_mismatch_is_a_parse_error() {
    // An edit-shaped body sent through the chat schema.
    let response = ok(json!({"object": "edit", "choices": [{"text": "Y", "index": 0}]}));
    assert!(matches!(
        normalize(&chat(), &response),
        Err(SweepError::Parse { .. })
    ));

    let garbage = RawResponse::new(200, "<html>bad gateway</html>");
    assert!(matches!(
        normalize(&edit(), &garbage),
        Err(SweepError::Parse { .. })
    ));
}

#[test]
fn api_error_bodies_surface_the_provider_message() {
    let response = RawResponse::new(
        401,
        json!({
            "error": {
                "message": "Incorrect API key provided",
                "type": "invalid_request_error",
                "code": "invalid_api_key"
            }
        })
        .to_string(),
    );

    let err = normalize(&chat(), &response).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Parsing failed on chat response (status 401): api error: Incorrect API key provided"
    );
}

#[test]
fn non_success_status_with_valid_body_still_normalizes() {
    let response = RawResponse::new(
        503,
        json!({"model": "m", "choices": [{"message": {"content": "late"}}]}).to_string(),
    );
    assert!(!response.is_success());
    assert_eq!(
        normalize(&chat(), &response).unwrap(),
        NormalizedResult::new("m", "late")
    );
}
