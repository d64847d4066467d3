//! Integration tests for detour-rank
//!
//! A wiremock server stands in for the distance-matrix API, so whole runs
//! (CSV in, ranked CSV out) are exercised without network access.

use std::collections::HashMap;
use std::path::Path;
use std::process::Command;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use detour_rank::{rank_file, ChunkSize, Error, GoogleMapsClient, RankConfig, RankOptions, ServiceConfig};
use serde_json::{json, Value};
use tempfile::{tempdir, TempDir};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

const START: &str = "1 Start St";
const END: &str = "9 End Ave";

/// Distances from START and END for each known address
fn distances() -> HashMap<&'static str, (u64, u64)> {
    HashMap::from([("A", (200, 300)), ("B", (40, 60)), ("C", (100, 200))])
}

/// Mount a fake distance-matrix endpoint. Calls whose destinations match
/// `failing_destinations` get a non-OK status. Returns a call counter.
async fn mount_matrix_api(server: &MockServer, failing_destinations: Option<&'static str>) -> Arc<AtomicUsize> {
    let calls = Arc::new(AtomicUsize::new(0));
    let calls_clone = Arc::clone(&calls);
    let table = distances();

    Mock::given(method("GET"))
        .and(path("/maps/api/distancematrix/json"))
        .respond_with(move |req: &Request| {
            calls_clone.fetch_add(1, Ordering::SeqCst);

            let params: HashMap<String, String> = req.url.query_pairs().into_owned().collect();
            let origins: Vec<&str> = params["origins"].split('|').collect();
            let destinations = params["destinations"].as_str();

            if Some(destinations) == failing_destinations {
                return ResponseTemplate::new(200).set_body_json(json!({
                    "status": "UNKNOWN_ERROR",
                    "rows": []
                }));
            }

            let rows: Vec<Value> = origins
                .iter()
                .map(|origin| {
                    let elements: Vec<Value> = destinations
                        .split('|')
                        .map(|dest| match table.get(dest) {
                            Some((from_start, from_end)) => {
                                let value = if *origin == START { from_start } else { from_end };
                                json!({"status": "OK", "distance": {"value": value, "text": "n/a"}})
                            }
                            None => json!({"status": "NOT_FOUND"}),
                        })
                        .collect();
                    json!({ "elements": elements })
                })
                .collect();

            ResponseTemplate::new(200).set_body_json(json!({"status": "OK", "rows": rows}))
        })
        .mount(server)
        .await;

    calls
}

fn write_input(dir: &TempDir, contents: &str) -> std::path::PathBuf {
    let input = dir.path().join("stops.csv");
    std::fs::write(&input, contents).unwrap();
    input
}

fn read_output(path: &Path) -> Vec<Vec<String>> {
    let mut reader = csv::Reader::from_path(path).unwrap();
    let mut rows = vec![reader.headers().unwrap().iter().map(str::to_string).collect()];
    for record in reader.records() {
        rows.push(record.unwrap().iter().map(str::to_string).collect());
    }
    rows
}

fn client_for(server: &MockServer) -> GoogleMapsClient {
    GoogleMapsClient::new(ServiceConfig {
        base_url: server.uri(),
        api_key: "test-key".to_string(),
    })
    .unwrap()
}

#[tokio::test]
async fn test_end_to_end_ranking() {
    let server = MockServer::start().await;
    let calls = mount_matrix_api(&server, None).await;
    let dir = tempdir().unwrap();
    let input = write_input(&dir, "name,address\nAlpha,A\nBravo,B\nCharlie,C\n");

    let config = RankConfig::new(START, END, &input).with_chunk_size(ChunkSize::new(2).unwrap());
    let summary = rank_file(&config, client_for(&server), RankOptions::default()).await.unwrap();

    assert_eq!(summary.output_path, dir.path().join("stops_sorted.csv"));
    assert_eq!(summary.rows, 3);
    assert_eq!(summary.unranked, 0);
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    let rows = read_output(&summary.output_path);
    assert_eq!(
        rows,
        vec![
            vec!["name", "address", "distance_from_start", "distance_from_end", "combined_distance"],
            vec!["Bravo", "B", "40", "60", "100"],
            vec!["Charlie", "C", "100", "200", "300"],
            vec!["Alpha", "A", "200", "300", "500"],
        ]
    );
}

#[tokio::test]
async fn test_end_to_end_failed_chunk() {
    let server = MockServer::start().await;
    mount_matrix_api(&server, Some("A|B")).await;
    let dir = tempdir().unwrap();
    let input = write_input(&dir, "name,address\nAlpha,A\nBravo,B\nCharlie,C\n");

    let config = RankConfig::new(START, END, &input).with_chunk_size(ChunkSize::new(2).unwrap());
    let summary = rank_file(&config, client_for(&server), RankOptions::default()).await.unwrap();

    assert_eq!(summary.unranked, 2);

    let rows = read_output(&summary.output_path);
    assert_eq!(rows[1], vec!["Charlie", "C", "100", "200", "300"]);
    assert_eq!(rows[2], vec!["Alpha", "A", "", "", ""]);
    assert_eq!(rows[3], vec!["Bravo", "B", "", "", ""]);
}

#[tokio::test]
async fn test_end_to_end_unknown_address_kept() {
    let server = MockServer::start().await;
    mount_matrix_api(&server, None).await;
    let dir = tempdir().unwrap();
    let input = write_input(&dir, "address,notes\nNowhere,?\nC,close\n");

    let config = RankConfig::new(START, END, &input);
    let summary = rank_file(&config, client_for(&server), RankOptions::default()).await.unwrap();

    let rows = read_output(&summary.output_path);
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[1], vec!["C", "close", "100", "200", "300"]);
    assert_eq!(rows[2], vec!["Nowhere", "?", "", "", ""]);
}

#[tokio::test]
async fn test_pipe_in_address_never_shifts_distances() {
    let server = MockServer::start().await;
    mount_matrix_api(&server, None).await;
    let dir = tempdir().unwrap();
    let input = write_input(&dir, "name,address\nOdd,\"A|B\"\nCharlie,C\n");

    let config = RankConfig::new(START, END, &input);
    let summary = rank_file(&config, client_for(&server), RankOptions::default()).await.unwrap();

    assert_eq!(summary.unranked, 2);
    let rows = read_output(&summary.output_path);
    assert_eq!(rows[1], vec!["Odd", "A|B", "", "", ""]);
    assert_eq!(rows[2], vec!["Charlie", "C", "", "", ""]);

    let config = config.with_chunk_size(ChunkSize::new(1).unwrap());
    let summary = rank_file(&config, client_for(&server), RankOptions::default()).await.unwrap();

    assert_eq!(summary.unranked, 1);
    let rows = read_output(&summary.output_path);
    assert_eq!(rows[1], vec!["Charlie", "C", "100", "200", "300"]);
    assert_eq!(rows[2], vec!["Odd", "A|B", "", "", ""]);
}

#[tokio::test]
async fn test_progress_reported_per_chunk() {
    let server = MockServer::start().await;
    mount_matrix_api(&server, None).await;
    let dir = tempdir().unwrap();
    let input = write_input(&dir, "address\nA\nB\nC\n");

    let ticks = Arc::new(AtomicUsize::new(0));
    let ticks_clone = Arc::clone(&ticks);
    let options = RankOptions {
        progress: Some(Arc::new(move |_done, total| {
            assert_eq!(total, 3);
            ticks_clone.fetch_add(1, Ordering::SeqCst);
        })),
    };

    let config = RankConfig::new(START, END, &input).with_chunk_size(ChunkSize::new(1).unwrap());
    rank_file(&config, client_for(&server), options).await.unwrap();

    assert_eq!(ticks.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_missing_address_column_makes_no_calls() {
    let server = MockServer::start().await;
    let calls = mount_matrix_api(&server, None).await;
    let dir = tempdir().unwrap();
    let input = write_input(&dir, "name,street\nAlpha,A\n");

    let config = RankConfig::new(START, END, &input);
    let result = rank_file(&config, client_for(&server), RankOptions::default()).await;

    assert!(matches!(result, Err(Error::Configuration(_))));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(!dir.path().join("stops_sorted.csv").exists());
}

#[tokio::test]
async fn test_http_failure_aborts_run() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/maps/api/distancematrix/json"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let dir = tempdir().unwrap();
    let input = write_input(&dir, "address\nA\n");

    let config = RankConfig::new(START, END, &input);
    let result = rank_file(&config, client_for(&server), RankOptions::default()).await;

    assert!(matches!(result, Err(Error::Http(_))));
    assert!(!dir.path().join("stops_sorted.csv").exists());
}

#[test]
fn test_cli_missing_address_column_exits_with_error() {
    let dir = tempdir().unwrap();
    let input = write_input(&dir, "name,Address\nAlpha,A\n");

    let output = Command::new(env!("CARGO_BIN_EXE_detour-rank"))
        .arg(START)
        .arg(END)
        .arg(&input)
        .env("GMAPS_API_KEY", "unused")
        .output()
        .expect("Failed to run detour-rank");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("`address`"), "Expected missing column error in stderr: {stderr}");
    assert!(stderr.contains("did you mean"), "Expected column suggestion in stderr: {stderr}");
    assert!(output.stdout.is_empty());
}

#[test]
fn test_cli_zero_chunk_size_exits_with_error() {
    let dir = tempdir().unwrap();
    let input = write_input(&dir, "address\nA\n");

    let output = Command::new(env!("CARGO_BIN_EXE_detour-rank"))
        .arg(START)
        .arg(END)
        .arg(&input)
        .args(["--chunk-size", "0"])
        .output()
        .expect("Failed to run detour-rank");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("chunk size"), "Expected chunk size error in stderr: {stderr}");
}
