//! Source retrieval against a mock HTTP server
//!
//! - Successful downloads feed the readers
//! - Non-2xx statuses and timeouts abort
//! - A broken workbook aborts the whole run before any output is written

use naf_common::NafError;
use naf_extract::config::ExtractConfig;
use naf_extract::pipeline;
use naf_extract::sources::{read_nafa_table, Fetcher, SourceLocation};
use std::time::Duration;
use tempfile::TempDir;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

const NAFA_TABLE: &str = "Département;Code NAFA;Nombre\n92;10.13A Charcuterie;4\n";

fn location(server: &MockServer, file: &str) -> SourceLocation {
    format!("{}/{}", server.uri(), file)
        .parse()
        .expect("mock URL")
}

#[tokio::test]
async fn test_download_returns_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/nafa.csv"))
        .respond_with(ResponseTemplate::new(200).set_body_string(NAFA_TABLE))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = Fetcher::new(Duration::from_secs(5), false).unwrap();
    let bytes = fetcher.load(&location(&server, "nafa.csv")).await.unwrap();
    let rows = read_nafa_table(&bytes).unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].code, "10.13A");
    assert_eq!(rows[0].name, "Charcuterie");
}

#[tokio::test]
async fn test_error_status_is_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing.xls"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let fetcher = Fetcher::new(Duration::from_secs(5), false).unwrap();
    let err = fetcher
        .load(&location(&server, "missing.xls"))
        .await
        .unwrap_err();

    assert!(matches!(err, NafError::HttpStatus { status: 404, .. }));
}

#[tokio::test]
async fn test_slow_server_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow.csv"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(NAFA_TABLE)
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let fetcher = Fetcher::new(Duration::from_millis(200), false).unwrap();
    let err = fetcher
        .load(&location(&server, "slow.csv"))
        .await
        .unwrap_err();

    assert!(matches!(err, NafError::Timeout { .. }), "unexpected error: {}", err);
}

#[tokio::test]
async fn test_unreadable_workbook_aborts_the_run() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/naf.xls"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"not a workbook".to_vec()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/nafa.csv"))
        .respond_with(ResponseTemplate::new(200).set_body_string(NAFA_TABLE))
        .mount(&server)
        .await;

    let out = TempDir::new().unwrap();
    let config = ExtractConfig {
        output_dir: out.path().join("data"),
        naf_source: format!("{}/naf.xls", server.uri()),
        nafa_source: format!("{}/nafa.csv", server.uri()),
        liberal_source: None,
        download_timeout_secs: 5,
        show_progress: false,
    };

    let err = pipeline::run(&config).await.unwrap_err();

    assert!(matches!(
        err.downcast_ref::<NafError>(),
        Some(NafError::Spreadsheet(_))
    ));
    assert!(!out.path().join("data").exists());
}
