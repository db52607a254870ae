use serde_json::Value;
use tunesweep_core::{EndpointKind, KnobRange, KnobValue, SweepConfig};
use tunesweep_llm::{build_request, request_body};

fn chat_config() -> SweepConfig {
    SweepConfig::builder()
        .api_key("sk-test")
        .prompt("write me a hello world program in go")
        .build()
        .expect("config")
}

#[test]
fn chat_body_has_model_single_message_and_knob_key() {
    let body = request_body(&chat_config(), KnobValue(0.6)).expect("body");
    assert_eq!(
        body,
        r#"{"model":"gpt-3.5-turbo","messages":[{"role":"user","content":"write me a hello world program in go"}],"temperature":0.6}"#
    );
}

#[test]
fn knob_value_always_has_one_decimal() {
    let config = chat_config();
    let whole = request_body(&config, KnobValue(1.0)).expect("body");
    assert!(whole.ends_with(r#""temperature":1.0}"#), "{whole}");

    let zero = request_body(&config, KnobValue(0.0)).expect("body");
    assert!(zero.ends_with(r#""temperature":0.0}"#), "{zero}");

    let fine = request_body(&config, KnobValue(0.25)).expect("body");
    assert!(fine.ends_with(r#""temperature":0.3}"#), "{fine}");
}

#[test]
fn knob_name_is_a_dynamic_key() {
    let config = SweepConfig::builder()
        .api_key("sk-test")
        .knob(KnobRange::new("top_p", 0.0, 1.0, 0.5))
        .build()
        .expect("config");

    let body: Value = serde_json::from_str(&request_body(&config, KnobValue(0.5)).unwrap()).unwrap();
    assert_eq!(body["top_p"], 0.5);
    assert!(body.get("temperature").is_none());
}

#[test]
fn newlines_in_free_text_become_backslash_n() {
    let config = SweepConfig::builder()
        .api_key("sk-test")
        .prompt("line one\nline \"two\"")
        .build()
        .expect("config");

    let body = request_body(&config, KnobValue(0.8)).expect("body");
    assert!(body.contains(r#""content":"line one\nline \"two\"""#), "{body}");
}

#[test]
fn edit_body_carries_input_instruction_and_edit_model() {
    let config = SweepConfig::builder()
        .api_key("sk-test")
        .endpoint(EndpointKind::Edit)
        .prompt("fix the indentation")
        .edit_input("service: my-service\n provider:\n     name: aws")
        .build()
        .expect("config");

    let body = request_body(&config, KnobValue(0.8)).expect("body");
    assert_eq!(
        body,
        r#"{"model":"code-davinci-edit-001","input":"service: my-service\n provider:\n     name: aws","instruction":"fix the indentation","temperature":0.8}"#
    );
}

#[test]
fn prepared_request_targets_endpoint_with_bearer_and_json_headers() {
    let config = chat_config();
    let request = build_request(&config, KnobValue(0.8)).expect("request");

    assert_eq!(request.url, "https://api.openai.com/v1/chat/completions");
    let headers = request.headers();
    assert_eq!(headers[0], ("Authorization", "Bearer sk-test".to_string()));
    assert_eq!(headers[1], ("Content-Type", "application/json".to_string()));
}
