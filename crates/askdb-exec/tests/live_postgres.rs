//! Live-database integration tests for the executor.
//!
//! These run against a real PostgreSQL instance and are ignored by
//! default. Point ASKDB_TEST_DATABASE_URL at a throwaway database and
//! run with `cargo test -p askdb-exec -- --ignored`.

use askdb_exec::{execute_query, ExecError, MAX_ROWS};

fn target() -> String {
    std::env::var("ASKDB_TEST_DATABASE_URL")
        .expect("ASKDB_TEST_DATABASE_URL must point at a test database")
}

#[actix_rt::test]
#[ignore]
async fn test_row_cap_applies() {
    // generate_series would match 1000 rows; the cap keeps 500
    let result = execute_query(&target(), "SELECT * FROM generate_series(1, 1000)")
        .await
        .unwrap();

    assert_eq!(result.row_count, MAX_ROWS);
    assert_eq!(result.rows.len(), result.row_count);
}

#[actix_rt::test]
#[ignore]
async fn test_statement_timeout_classified_and_connection_released() {
    let err = execute_query(&target(), "SELECT pg_sleep(30)")
        .await
        .unwrap_err();
    assert!(matches!(err, ExecError::Timeout(_)));

    // The timed-out call must not leak its connection: a fresh call to
    // the same target succeeds
    let result = execute_query(&target(), "SELECT 1 AS one").await.unwrap();
    assert_eq!(result.row_count, 1);
    assert_eq!(result.columns, vec!["one"]);
}

#[actix_rt::test]
#[ignore]
async fn test_empty_result_still_has_columns() {
    let result = execute_query(&target(), "SELECT 1 AS id WHERE false")
        .await
        .unwrap();
    assert_eq!(result.row_count, 0);
    assert_eq!(result.columns, vec!["id"]);
}
