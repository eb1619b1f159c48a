use hana_executor::{AuditLog, Executor, Outcome};
use hana_policy::SafetyPolicy;
use serde_json::{json, Map, Value};
use tempfile::TempDir;

fn args(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap_or_default()
}

fn executor_for(temp: &TempDir) -> Executor {
    let policy = SafetyPolicy::with_rules(
        vec![temp.path().join("protected")],
        temp.path().to_path_buf(),
    );
    let log = AuditLog::open(temp.path().join("hana.db")).unwrap();
    Executor::new(policy, log, temp.path().join(".trash"))
}

#[tokio::test]
async fn denied_action_logs_and_never_dispatches() {
    let temp = TempDir::new().unwrap();
    let protected = temp.path().join("protected");
    std::fs::create_dir_all(&protected).unwrap();
    let file = protected.join("core.dll");
    std::fs::write(&file, "x").unwrap();

    let executor = executor_for(&temp);
    let outcome = executor
        .execute("file.delete", &args(json!({ "path": file })))
        .await;

    match outcome {
        Outcome::Denied { message } => assert!(message.contains("protected")),
        other => panic!("expected denial, got {other:?}"),
    }
    // The file was not touched and the denial was logged.
    assert!(file.exists());
    let entries = executor.audit_log().recent(10).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].status, "denied");
}

#[tokio::test]
async fn risky_probe_returns_token_without_logging() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("report.txt");
    std::fs::write(&file, "data").unwrap();

    let executor = executor_for(&temp);
    let outcome = executor
        .execute("file.delete", &args(json!({ "path": file })))
        .await;

    assert!(matches!(outcome, Outcome::NeedsConfirmation { .. }));
    assert!(file.exists(), "dry probe must not execute");
    assert!(executor.audit_log().recent(10).unwrap().is_empty());
}

#[tokio::test]
async fn confirmed_delete_lands_in_trash_with_one_log_row() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("report.txt");
    std::fs::write(&file, "data").unwrap();

    let executor = executor_for(&temp);
    let probe = executor
        .execute("file.delete", &args(json!({ "path": file })))
        .await;
    let Outcome::NeedsConfirmation { token, .. } = probe else {
        panic!("expected confirmation request, got {probe:?}");
    };

    let outcome = executor.confirm(token).await;
    let Outcome::Success { result, .. } = outcome else {
        panic!("expected success, got {outcome:?}");
    };

    assert!(!file.exists());
    let trashed = result["trashed"].as_str().unwrap();
    assert!(trashed.starts_with(temp.path().join(".trash").to_str().unwrap()));
    assert!(trashed.contains("report.txt."));

    let entries = executor.audit_log().recent(10).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].status, "success");
    assert_eq!(entries[0].message, "OK");
}

#[tokio::test]
async fn token_is_single_use_and_unknown_tokens_are_denied() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("report.txt");
    std::fs::write(&file, "data").unwrap();

    let executor = executor_for(&temp);
    let probe = executor
        .execute("file.delete", &args(json!({ "path": file })))
        .await;
    let Outcome::NeedsConfirmation { token, .. } = probe else {
        panic!("expected confirmation request");
    };

    assert!(matches!(executor.confirm(token).await, Outcome::Success { .. }));
    // The same token cannot re-run the action.
    assert!(matches!(executor.confirm(token).await, Outcome::Denied { .. }));
    assert!(matches!(
        executor.confirm(uuid::Uuid::new_v4()).await,
        Outcome::Denied { .. }
    ));
}

#[tokio::test]
async fn cancel_drops_pending_without_audit_rows() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("report.txt");
    std::fs::write(&file, "data").unwrap();

    let executor = executor_for(&temp);
    let probe = executor
        .execute("file.delete", &args(json!({ "path": file })))
        .await;
    let Outcome::NeedsConfirmation { token, .. } = probe else {
        panic!("expected confirmation request");
    };

    assert!(executor.cancel(token));
    assert!(matches!(executor.confirm(token).await, Outcome::Denied { .. }));
    assert!(file.exists());
    assert!(executor.audit_log().recent(10).unwrap().is_empty());
}

#[tokio::test]
async fn rename_uses_normalized_paths() {
    let temp = TempDir::new().unwrap();
    std::fs::create_dir_all(temp.path().join("Documents")).unwrap();
    let src = temp.path().join("Documents").join("a.txt");
    std::fs::write(&src, "x").unwrap();
    let dst = temp.path().join("Documents").join("b.txt");

    let executor = executor_for(&temp);
    // Home-relative shorthand goes through the same normalization the
    // policy used.
    let probe = executor
        .execute(
            "file.rename",
            &args(json!({ "src": "~/Documents/a.txt", "dst": dst })),
        )
        .await;
    let Outcome::NeedsConfirmation { token, .. } = probe else {
        panic!("expected confirmation request, got {probe:?}");
    };
    assert!(matches!(executor.confirm(token).await, Outcome::Success { .. }));
    assert!(dst.exists() && !src.exists());
}

#[tokio::test]
async fn tool_failure_becomes_error_outcome_with_log_row() {
    let temp = TempDir::new().unwrap();
    // create_folder over an existing file fails inside the tool.
    let clash = temp.path().join("occupied");
    std::fs::write(&clash, "x").unwrap();

    let executor = executor_for(&temp);
    let outcome = executor
        .execute("file.create_folder", &args(json!({ "path": clash })))
        .await;

    assert!(matches!(outcome, Outcome::Error { .. }));
    let entries = executor.audit_log().recent(10).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].status, "error");
}

#[test]
fn outcome_serializes_with_status_tag() {
    let outcome = Outcome::Success {
        message: "Action executed.".to_string(),
        result: json!({ "opened": "/tmp/x" }),
    };
    let value = serde_json::to_value(&outcome).unwrap();
    assert_eq!(value["status"], "success");
    assert_eq!(value["result"]["opened"], "/tmp/x");

    let denied = Outcome::Denied {
        message: "nope".to_string(),
    };
    assert_eq!(
        serde_json::to_value(&denied).unwrap()["status"],
        "denied"
    );
}
