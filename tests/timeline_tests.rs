use predicates::prelude::*;

use test_env::{pcq_cmd, setup_test_env, StubServer};

const ONE_STAGE: &str = r#"[{"id":"s1","name":"Design","start":"2099-01-01","end":"2099-01-10","progress":50}]"#;

#[test]
fn test_route_path_loads_one_stage() {
    let server = StubServer::with_stages(ONE_STAGE);
    let (temp_dir, _guard) = setup_test_env(&server.base_url);

    pcq_cmd(&temp_dir)
        .args(["timeline", "/projects/42/timeline-interactive", "--scale", "day", "--width", "80"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Project 42 timeline (estimate, Day)"))
        .stdout(predicate::str::contains("Design"))
        .stdout(predicate::str::contains("50%"))
        .stdout(predicate::str::contains("Total: 1"))
        .stderr(predicate::str::contains("Loading timeline for project 42..."));

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "GET");
    assert_eq!(requests[0].path, "/api/task-workflow/stages/overview/project/42");
}

#[test]
fn test_json_output_has_gantt_records() {
    let server = StubServer::with_stages(ONE_STAGE);
    let (temp_dir, _guard) = setup_test_env(&server.base_url);

    let output = pcq_cmd(&temp_dir).args(["timeline", "42", "--json"]).output().unwrap();
    assert!(output.status.success());

    let tasks: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let tasks = tasks.as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["id"], "s1");
    assert_eq!(tasks[0]["name"], "Design");
    assert_eq!(tasks[0]["start"], "2099-01-01");
    assert_eq!(tasks[0]["end"], "2099-01-10");
    assert_eq!(tasks[0]["progress"], 50.0);
}

#[test]
fn test_backend_overview_shape_is_accepted() {
    let body = r#"[{"id":12,"name":"Build","displayOrder":1,"status":"At Risk",
        "startDate":"2099-03-01T00:00:00.000Z","endDate":"2099-03-20T00:00:00.000Z",
        "actualStartDate":null,"actualEndDate":null,"progress":"45.50"}]"#;
    let server = StubServer::with_stages(body);
    let (temp_dir, _guard) = setup_test_env(&server.base_url);

    let output = pcq_cmd(&temp_dir).args(["timeline", "9", "--json"]).output().unwrap();
    assert!(output.status.success());

    let tasks: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(tasks[0]["id"], "12");
    assert_eq!(tasks[0]["start"], "2099-03-01");
    assert_eq!(tasks[0]["progress"], 45.5);
    assert_eq!(tasks[0]["custom_class"], "status-at-risk");
}

#[test]
fn test_invalid_project_id_makes_no_request() {
    let server = StubServer::with_stages("[]");
    let (temp_dir, _guard) = setup_test_env(&server.base_url);

    pcq_cmd(&temp_dir)
        .args(["timeline", "/projects/abc/timeline-interactive"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Cannot show a timeline"))
        .stderr(predicate::str::contains("Loading").not());

    pcq_cmd(&temp_dir).args(["timeline", "0"]).assert().failure().code(1);

    assert!(server.requests().is_empty());
}

#[test]
fn test_unknown_route_is_user_error() {
    let server = StubServer::with_stages("[]");
    let (temp_dir, _guard) = setup_test_env(&server.base_url);

    pcq_cmd(&temp_dir)
        .args(["timeline", "/projects/42/overview"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::starts_with("Error:"))
        .stderr(predicate::str::contains("Unknown route"));
}

#[test]
fn test_empty_overview_renders_notice() {
    let server = StubServer::with_stages("[]");
    let (temp_dir, _guard) = setup_test_env(&server.base_url);

    pcq_cmd(&temp_dir)
        .args(["timeline", "7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No stages in the timeline for project 7."));
}

#[test]
fn test_inverted_stage_is_warned_and_not_drawn() {
    let body = r#"[
        {"id":"ok","name":"Planning","start":"2099-02-01","end":"2099-02-05","progress":10},
        {"id":"bad","name":"Broken","start":"2099-02-10","end":"2099-02-01","progress":0}
    ]"#;
    let server = StubServer::with_stages(body);
    let (temp_dir, _guard) = setup_test_env(&server.base_url);

    pcq_cmd(&temp_dir)
        .args(["timeline", "3", "--width", "80"])
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "Warning: stage bad: estimate start 2099-02-10 is after end 2099-02-01; bar not drawn",
        ))
        .stdout(predicate::str::contains("Planning"))
        .stdout(predicate::str::contains("Broken").not());
}

#[test]
fn test_server_error_is_reported_with_retry_hint() {
    let server = StubServer::start(|_, _| (500, r#"{"error":"boom"}"#.to_string()));
    let (temp_dir, _guard) = setup_test_env(&server.base_url);

    pcq_cmd(&temp_dir)
        .args(["timeline", "5"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Could not load the timeline for project 5"))
        .stderr(predicate::str::contains("500"))
        .stderr(predicate::str::contains("Run the command again to retry."));

    assert_eq!(server.requests().len(), 1);
}

#[test]
fn test_status_filter_and_actual_mode() {
    let body = r#"[
        {"id":"a","name":"Alpha","start":"2099-01-01","end":"2099-01-05","progress":0,"status":"Good"},
        {"id":"b","name":"Bravo","start":"2099-01-02","end":"2099-01-06","progress":0,"status":"At Risk"}
    ]"#;
    let server = StubServer::with_stages(body);
    let (temp_dir, _guard) = setup_test_env(&server.base_url);

    pcq_cmd(&temp_dir)
        .args(["timeline", "1", "--status", "at-risk", "--width", "80"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Bravo"))
        .stdout(predicate::str::contains("Alpha").not());

    pcq_cmd(&temp_dir)
        .args(["timeline", "1", "--mode", "actual"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "No stages with actual dates match the current filters (2 hidden).",
        ));
}

#[test]
fn test_saved_scale_is_used_by_default() {
    let server = StubServer::with_stages(ONE_STAGE);
    let (temp_dir, _guard) = setup_test_env(&server.base_url);

    pcq_cmd(&temp_dir)
        .args(["scale", "month"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Default timeline scale set to Month."));

    pcq_cmd(&temp_dir)
        .args(["timeline", "42", "--width", "80"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(estimate, Month)"));

    pcq_cmd(&temp_dir).args(["scale", "fortnight"]).assert().failure().code(1);
}

#[test]
fn test_stages_table_and_errors() {
    let server = StubServer::with_stages(ONE_STAGE);
    let (temp_dir, _guard) = setup_test_env(&server.base_url);

    pcq_cmd(&temp_dir)
        .args(["stages", "42"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Design"))
        .stdout(predicate::str::contains("2099-01-01 .. 2099-01-10"))
        .stdout(predicate::str::contains("1 stage(s)"));

    pcq_cmd(&temp_dir)
        .args(["stages", "abc"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Invalid project ID: 'abc'"));

    assert_eq!(server.requests().len(), 1);
}

#[test]
fn test_unreachable_server_is_internal_error() {
    let url = format!("http://127.0.0.1:{}/api", test_env::closed_port());
    let (temp_dir, _guard) = setup_test_env(&url);

    pcq_cmd(&temp_dir)
        .args(["stages", "42"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Internal error: Failed to load stages for project 42"));
}
