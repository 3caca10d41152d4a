//! Integration tests for the `crawl`, `daily` and `init` commands against a wiremock registry

use camino::{Utf8Path, Utf8PathBuf};
use chrono::{Datelike, Local};
use registry_stats_lib::Host;
use serde_json::{Value, json};
use std::fs;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Test host that captures output to an in-memory buffer.
struct TestHost {
    output_buf: Vec<u8>,
}

impl TestHost {
    const fn new() -> Self {
        Self { output_buf: Vec::new() }
    }

    fn output_str(&self) -> String {
        String::from_utf8_lossy(&self.output_buf).into_owned()
    }
}

impl Host for TestHost {
    fn output(&mut self) -> impl std::io::Write {
        &mut self.output_buf
    }
}

fn utf8_dir(dir: &tempfile::TempDir) -> Utf8PathBuf {
    Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 temp dir")
}

/// Write a configuration pointing at `server` with near-zero pacing and return its path.
fn write_config(dir: &Utf8Path, server: &MockServer, extra: &str) -> Utf8PathBuf {
    let config_path = dir.join("registry-stats.toml");
    let text = format!(
        r#"
base_url = "{}"
page_interval = "1ms"
provider_interval = "1ms"
request_timeout = "5s"
crawl_log_file = "{dir}/crawl.log"
daily_log_file = "{dir}/daily.log"
{extra}
"#,
        server.uri()
    );
    fs::write(&config_path, text).expect("write config");
    config_path
}

async fn mount_provider_pages(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/providers"))
        .and(query_param("page[number]", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                { "id": "10", "attributes": { "namespace": "acme", "name": "five", "downloads": 5, "tier": "community" } },
                { "id": "11", "attributes": { "namespace": "acme", "name": "fifty", "downloads": 50, "tier": "partner" } },
                { "id": "12", "attributes": { "namespace": "acme", "name": "one", "downloads": 1, "tier": "community" } },
            ]
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/providers"))
        .and(query_param("page[number]", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .mount(server)
        .await;
}

fn output_paths(host: &TestHost) -> Vec<Utf8PathBuf> {
    host.output_str().lines().map(Utf8PathBuf::from).collect()
}

#[tokio::test]
async fn test_crawl_writes_json_and_sorted_csv() {
    let server = MockServer::start().await;
    mount_provider_pages(&server).await;

    let temp_dir = tempfile::tempdir().expect("temp dir");
    let dir = utf8_dir(&temp_dir);
    let config_path = write_config(&dir, &server, "");
    let output_dir = dir.join("reports");

    let mut host = TestHost::new();
    let result = registry_stats_lib::run(
        &mut host,
        [
            "registry-stats",
            "crawl",
            "--config",
            config_path.as_str(),
            "--log-level",
            "none",
            "--output-dir",
            output_dir.as_str(),
        ],
    )
    .await;

    assert!(result.is_ok(), "crawl command failed: {result:?}");

    let paths = output_paths(&host);
    assert_eq!(paths.len(), 2);
    assert_eq!(paths[0].extension(), Some("json"));
    assert_eq!(paths[1].extension(), Some("csv"));
    assert_eq!(paths[0].file_stem(), paths[1].file_stem());
    assert!(paths[0].file_name().unwrap().starts_with("terraform_all_providers_"));
    assert_eq!(paths[0].parent(), Some(output_dir.as_path()));

    let json: Value = serde_json::from_str(&fs::read_to_string(&paths[0]).unwrap()).unwrap();
    let names: Vec<&str> = json.as_array().unwrap().iter().map(|r| r["full_name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["acme/five", "acme/fifty", "acme/one"]);

    let csv_text = fs::read_to_string(&paths[1]).unwrap();
    let downloads: Vec<&str> = csv_text.lines().skip(1).map(|line| line.split(',').nth(4).unwrap()).collect();
    assert_eq!(downloads, vec!["50", "5", "1"]);
}

#[tokio::test]
async fn test_crawl_this_year_uses_yearly_counts() {
    let server = MockServer::start().await;
    mount_provider_pages(&server).await;

    let year = Local::now().year().to_string();
    for (id, downloads) in [("10", 500), ("11", 3), ("12", 40)] {
        Mock::given(method("GET"))
            .and(path(format!("/providers/{id}/downloads")))
            .and(query_param("year", year.as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "downloads": downloads })))
            .expect(1)
            .mount(&server)
            .await;
    }

    let temp_dir = tempfile::tempdir().expect("temp dir");
    let dir = utf8_dir(&temp_dir);
    let config_path = write_config(&dir, &server, &format!("output_dir = \"{dir}\""));

    let mut host = TestHost::new();
    let result = registry_stats_lib::run(
        &mut host,
        ["registry-stats", "crawl", "--this-year", "--config", config_path.as_str(), "--log-level", "none"],
    )
    .await;

    assert!(result.is_ok(), "crawl command failed: {result:?}");

    let paths = output_paths(&host);
    let csv_text = fs::read_to_string(&paths[1]).unwrap();
    let rows: Vec<(&str, &str)> = csv_text
        .lines()
        .skip(1)
        .map(|line| {
            let fields: Vec<&str> = line.split(',').collect();
            (fields[3], fields[4])
        })
        .collect();

    assert_eq!(rows, vec![("acme/five", "500"), ("acme/one", "40"), ("acme/fifty", "3")]);
}

#[tokio::test]
async fn test_crawl_with_unusable_output_dir_ends_gracefully() {
    let server = MockServer::start().await;

    let temp_dir = tempfile::tempdir().expect("temp dir");
    let dir = utf8_dir(&temp_dir);
    let config_path = write_config(&dir, &server, "");
    let blocker = dir.join("blocker");
    fs::write(&blocker, "not a directory").unwrap();

    let mut host = TestHost::new();
    let result = registry_stats_lib::run(
        &mut host,
        [
            "registry-stats",
            "crawl",
            "--config",
            config_path.as_str(),
            "--log-level",
            "none",
            "--output-dir",
            blocker.as_str(),
        ],
    )
    .await;

    assert!(result.is_ok(), "unexpected errors are logged, not returned: {result:?}");
    assert!(host.output_str().is_empty());
}

#[tokio::test]
async fn test_invalid_config_is_returned_as_error() {
    let server = MockServer::start().await;

    let temp_dir = tempfile::tempdir().expect("temp dir");
    let dir = utf8_dir(&temp_dir);
    let config_path = write_config(&dir, &server, "page_size = 0");

    let mut host = TestHost::new();
    let result = registry_stats_lib::run(
        &mut host,
        ["registry-stats", "crawl", "--config", config_path.as_str(), "--log-level", "none"],
    )
    .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_daily_once_writes_report() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/providers/hashicorp/aws"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "attributes": { "downloads": 12345 } } })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/providers/elastic/ec"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let temp_dir = tempfile::tempdir().expect("temp dir");
    let dir = utf8_dir(&temp_dir);
    let tracked = r#"
[[tracked]]
key = "aws"
provider = "hashicorp/aws"

[[tracked]]
key = "elastic"
provider = "elastic/ec"
"#;
    let config_path = write_config(&dir, &server, &format!("output_dir = \"{dir}\"\n{tracked}"));

    let mut host = TestHost::new();
    let result = registry_stats_lib::run(
        &mut host,
        ["registry-stats", "daily", "--once", "--config", config_path.as_str(), "--log-level", "none"],
    )
    .await;

    assert!(result.is_ok(), "daily command failed: {result:?}");

    let paths = output_paths(&host);
    assert_eq!(paths.len(), 1);
    assert!(paths[0].file_name().unwrap().starts_with("terraform_downloads_"));
    assert_eq!(paths[0].extension(), Some("json"));

    let text = fs::read_to_string(&paths[0]).unwrap();
    assert!(text.find("\"aws\"").unwrap() < text.find("\"elastic\"").unwrap());

    let json: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(json["aws"]["provider"], "hashicorp/aws");
    assert_eq!(json["aws"]["total_downloads"], 12345);
    assert!(json["aws"].get("error").is_none());
    assert_eq!(json["elastic"]["total_downloads"], 0);
    assert_eq!(json["elastic"]["error"], "Failed to fetch data");
}

#[tokio::test]
async fn test_init_writes_default_config() {
    let temp_dir = tempfile::tempdir().expect("temp dir");
    let dir = utf8_dir(&temp_dir);
    let output = dir.join("generated.toml");

    let mut host = TestHost::new();
    let result = registry_stats_lib::run(&mut host, ["registry-stats", "init", output.as_str()]).await;

    assert!(result.is_ok(), "init command failed: {result:?}");
    assert_eq!(host.output_str(), format!("Generated default configuration file: {output}\n"));

    let text = fs::read_to_string(&output).unwrap();
    assert!(text.contains("base_url = \"https://registry.terraform.io/v2\""));
    assert!(text.contains("provider = \"hashicorp/aws\""));
}
