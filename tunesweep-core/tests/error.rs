use std::path::PathBuf;

use tunesweep_core::SweepError;

#[test]
fn error_display_for_config() {
    let err = SweepError::config("api key is required");
    assert_eq!(
        format!("{err}"),
        "Invalid configuration: api key is required"
    );
}

#[test]
fn error_display_for_transport() {
    let err = SweepError::Transport("connection refused".to_string());
    assert_eq!(format!("{err}"), "Transport failed: connection refused");
}

#[test]
fn error_display_for_parse() {
    let err = SweepError::Parse {
        endpoint: "chat",
        status: 500,
        reason: "response contained no choices".to_string(),
    };
    assert_eq!(
        format!("{err}"),
        "Parsing failed on chat response (status 500): response contained no choices"
    );
}

#[test]
fn error_display_for_log_write() {
    let err = SweepError::LogWrite {
        path: PathBuf::from("logs/demo/top_p/01-api-log_top_p.txt"),
        reason: "permission denied".to_string(),
    };
    assert_eq!(
        format!("{err}"),
        "Log write failed for 'logs/demo/top_p/01-api-log_top_p.txt': permission denied"
    );
}

#[test]
fn error_display_for_serde() {
    let parse_error = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
    let err = SweepError::Serde(parse_error);
    assert!(format!("{err}").starts_with("Serialization/deserialization error: "));
}

#[test]
fn only_run_level_errors_are_fatal() {
    assert!(SweepError::config("bad").is_fatal());
    assert!(SweepError::Transport("down".to_string()).is_fatal());
    assert!(!SweepError::Parse {
        endpoint: "edit",
        status: 200,
        reason: "missing field `choices`".to_string(),
    }
    .is_fatal());
    assert!(!SweepError::LogWrite {
        path: PathBuf::from("x"),
        reason: "disk full".to_string(),
    }
    .is_fatal());
}
