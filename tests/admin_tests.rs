use assert_cmd::Command;
use predicates::prelude::*;

fn drop_members_cmd(port: u16) -> Command {
    let mut cmd = Command::cargo_bin("drop-members-table").unwrap();
    cmd.env("DB_HOST", "127.0.0.1")
        .env("DB_PORT", port.to_string())
        .env("DB_USER", "postgres")
        .env("DB_PASSWORD", "postgres")
        .env("DB_NAME", "project_cost_quality")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_unreachable_database_exits_with_failure() {
    let _guard = test_env::lock_test_env();

    drop_members_cmd(test_env::closed_port())
        .assert()
        .failure()
        .code(2)
        .stdout(predicate::str::contains("Connecting to database..."))
        .stdout(predicate::str::contains("dropped successfully").not())
        .stderr(predicate::str::contains("Error dropping members table: Connection error"));
}

#[test]
fn test_bad_port_is_rejected_before_connecting() {
    let _guard = test_env::lock_test_env();

    drop_members_cmd(5432)
        .env("DB_PORT", "not-a-port")
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("Connecting").not())
        .stderr(predicate::str::contains("Invalid DB_PORT"));
}

#[test]
fn test_database_settings_are_read_from_dotenv() {
    let _guard = test_env::lock_test_env();
    let work_dir = tempfile::TempDir::new().unwrap();
    std::fs::write(
        work_dir.path().join(".env"),
        format!(
            "DB_HOST=127.0.0.1\nDB_PORT={}\nDB_USER=operator\nDB_NAME=from_dotenv\n",
            test_env::closed_port()
        ),
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("drop-members-table").unwrap();
    cmd.current_dir(work_dir.path());
    for key in ["DB_HOST", "DB_PORT", "DB_USER", "DB_PASSWORD", "DB_NAME", "RUST_LOG"] {
        cmd.env_remove(key);
    }
    cmd.assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("operator@127.0.0.1:"))
        .stderr(predicate::str::contains("/from_dotenv"));
}

#[test]
fn test_exported_variables_win_over_dotenv() {
    let _guard = test_env::lock_test_env();
    let work_dir = tempfile::TempDir::new().unwrap();
    std::fs::write(work_dir.path().join(".env"), "DB_NAME=from_dotenv\n").unwrap();

    drop_members_cmd(test_env::closed_port())
        .current_dir(work_dir.path())
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("/project_cost_quality"))
        .stderr(predicate::str::contains("from_dotenv").not());
}

#[test]
fn test_admin_command_validates_table_name() {
    let _guard = test_env::lock_test_env();
    let temp_dir = tempfile::TempDir::new().unwrap();

    test_env::pcq_cmd(&temp_dir)
        .args(["admin", "drop-table", "--table", "members; DROP DATABASE x"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Invalid table name"));
}

#[test]
fn test_admin_command_connection_failure_is_internal_error() {
    let _guard = test_env::lock_test_env();
    let temp_dir = tempfile::TempDir::new().unwrap();

    test_env::pcq_cmd(&temp_dir)
        .args(["admin", "drop-table", "--table", "public.members"])
        .env("DB_HOST", "127.0.0.1")
        .env("DB_PORT", test_env::closed_port().to_string())
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Internal error: Connection error"));
}
