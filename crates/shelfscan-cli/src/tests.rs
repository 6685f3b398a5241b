use super::*;
use crate::crawl::{redact_api_key, run_crawl, select_categories};

use serde_json::{json, Value};
use shelfscan_core::{AppConfig, CatalogueFile, CategorySpec, PricingPolicy};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn category(name: &str, id: &str) -> CategorySpec {
    CategorySpec {
        name: name.to_string(),
        id: id.to_string(),
        path: Vec::new(),
    }
}

#[test]
fn parses_crawl_with_defaults() {
    let cli = Cli::try_parse_from(["shelfscan-cli", "crawl"]).expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Commands::Crawl {
            category: None,
            output: None,
            dry_run: false
        }
    ));
}

#[test]
fn parses_crawl_with_category_filter() {
    let cli = Cli::try_parse_from(["shelfscan-cli", "crawl", "--category", "Clearance"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::Crawl {
            category: Some(ref c),
            ..
        } if c == "Clearance"
    ));
}

#[test]
fn parses_crawl_output_and_dry_run() {
    let cli = Cli::try_parse_from([
        "shelfscan-cli",
        "crawl",
        "--output",
        "/tmp/out.csv",
        "--dry-run",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Commands::Crawl {
            output: Some(ref p),
            dry_run: true,
            ..
        } if p == std::path::Path::new("/tmp/out.csv")
    ));
}

#[test]
fn parses_categories_command() {
    let cli = Cli::try_parse_from(["shelfscan-cli", "categories"]).unwrap();
    assert!(matches!(cli.command, Commands::Categories));
}

#[test]
fn missing_subcommand_is_rejected() {
    assert!(Cli::try_parse_from(["shelfscan-cli"]).is_err());
}

#[test]
fn unknown_flag_is_rejected() {
    assert!(Cli::try_parse_from(["shelfscan-cli", "crawl", "--brand", "x"]).is_err());
}

#[test]
fn select_without_filter_returns_all() {
    let all = [category("Clearance", "a1"), category("Kitchen", "b2")];
    let selected = select_categories(&all, None).unwrap();
    assert_eq!(selected.len(), 2);
}

#[test]
fn select_matches_name_case_insensitively_or_id() {
    let all = [category("Clearance", "a1"), category("Kitchen", "b2")];
    let by_name = select_categories(&all, Some("kitchen")).unwrap();
    assert_eq!(by_name[0].id, "b2");
    let by_id = select_categories(&all, Some("a1")).unwrap();
    assert_eq!(by_id[0].name, "Clearance");
}

#[test]
fn select_unknown_category_errors() {
    let all = [category("Clearance", "a1")];
    let err = select_categories(&all, Some("Garden")).unwrap_err();
    assert!(err.to_string().contains("Garden"));
}

#[test]
fn redact_replaces_only_the_key() {
    let url = reqwest::Url::parse(
        "https://ac.cnstrc.com/browse/group_id/a1?c=client&key=secret&page=1",
    )
    .unwrap();
    let redacted = redact_api_key(&url);
    assert_eq!(
        redacted.as_str(),
        "https://ac.cnstrc.com/browse/group_id/a1?c=client&key=REDACTED&page=1"
    );
}

// ---------------------------------------------------------------------------
// run_crawl against a local browse server
// ---------------------------------------------------------------------------

fn temp_output(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "shelfscan-cli-{}-{name}.csv",
        std::process::id()
    ));
    let _ = std::fs::remove_file(&path);
    path
}

fn test_config(server: &MockServer, output_path: PathBuf, max_pages: u32) -> AppConfig {
    AppConfig {
        api_key: "test-key".to_string(),
        client_id: "test-client".to_string(),
        api_base_url: server.uri(),
        site_base_url: "https://www.kmart.co.nz".to_string(),
        catalogue_path: PathBuf::from("config/catalogue.yaml"),
        output_path,
        log_level: "info".to_string(),
        page_size: 2,
        max_pages,
        inter_page_delay_ms: 0,
        request_timeout_secs: 5,
        user_agent: "shelfscan-test/0.1".to_string(),
        sort_by: "relevance".to_string(),
        sort_order: "descending".to_string(),
        max_concurrent_categories: 1,
    }
}

fn catalogue(categories: Vec<CategorySpec>) -> CatalogueFile {
    CatalogueFile {
        categories,
        pricing: PricingPolicy::default(),
    }
}

fn item(id: &str, price: f64) -> Value {
    json!({
        "data": {"id": id, "url": format!("/product/{id}/"), "price": price},
        "value": format!("Item {id}")
    })
}

fn page(results: Vec<Value>) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"response": {"results": results}}))
}

async fn mount_page(server: &MockServer, category_id: &str, page_no: u32, body: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(format!("/browse/group_id/{category_id}")))
        .and(query_param("page", page_no.to_string()))
        .respond_with(body)
        .expect(1)
        .mount(server)
        .await;
}

fn data_lines(path: &std::path::Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .expect("dataset should exist")
        .lines()
        .skip(1)
        .map(str::to_string)
        .collect()
}

#[tokio::test]
async fn aborted_category_still_writes_rows_from_earlier_pages() {
    let server = MockServer::start().await;
    mount_page(&server, "a1", 1, page(vec![item("1", 10.0)])).await;
    mount_page(&server, "a1", 2, ResponseTemplate::new(500)).await;

    let out = temp_output("partial-abort");
    let config = test_config(&server, out.clone(), 10);
    let result = run_crawl(
        &config,
        &catalogue(vec![category("Clearance", "a1")]),
        None,
        None,
        false,
    )
    .await;

    let err = result.expect_err("every category aborted");
    assert!(err.to_string().contains("aborted"));
    let lines = data_lines(&out);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("1|Item 1|"));
    let _ = std::fs::remove_file(&out);
}

#[tokio::test]
async fn all_aborted_without_rows_fails_and_writes_nothing() {
    let server = MockServer::start().await;
    mount_page(&server, "a1", 1, ResponseTemplate::new(500)).await;
    mount_page(&server, "b2", 1, ResponseTemplate::new(404)).await;

    let out = temp_output("all-aborted");
    let config = test_config(&server, out.clone(), 10);
    let result = run_crawl(
        &config,
        &catalogue(vec![category("Clearance", "a1"), category("Kitchen", "b2")]),
        None,
        None,
        false,
    )
    .await;

    let err = result.expect_err("every category aborted");
    assert!(err.to_string().contains("failed to crawl"));
    assert!(!out.exists());
}

#[tokio::test]
async fn zero_rows_leaves_existing_dataset_untouched() {
    let server = MockServer::start().await;
    mount_page(&server, "a1", 1, page(vec![])).await;

    let out = temp_output("empty");
    std::fs::write(&out, "previous run\n").expect("seed dataset");
    let config = test_config(&server, out.clone(), 10);
    run_crawl(
        &config,
        &catalogue(vec![category("Clearance", "a1")]),
        None,
        None,
        false,
    )
    .await
    .expect("an empty category is not a failure");

    assert_eq!(std::fs::read_to_string(&out).unwrap(), "previous run\n");
    let _ = std::fs::remove_file(&out);
}

#[tokio::test]
async fn output_override_wins_over_configured_path() {
    let server = MockServer::start().await;
    mount_page(&server, "a1", 1, page(vec![item("1", 10.0), item("2", 12.0)])).await;
    mount_page(&server, "a1", 2, page(vec![])).await;

    let configured = temp_output("configured");
    let override_path = temp_output("override");
    let config = test_config(&server, configured.clone(), 10);
    run_crawl(
        &config,
        &catalogue(vec![category("Clearance", "a1")]),
        None,
        Some(&override_path),
        false,
    )
    .await
    .expect("crawl should succeed");

    assert!(!configured.exists());
    assert_eq!(data_lines(&override_path).len(), 2);
    let _ = std::fs::remove_file(&override_path);
}

#[tokio::test]
async fn truncated_category_is_written_and_not_an_error() {
    let server = MockServer::start().await;
    mount_page(&server, "a1", 1, page(vec![item("1", 10.0)])).await;

    let out = temp_output("truncated");
    let config = test_config(&server, out.clone(), 1);
    run_crawl(
        &config,
        &catalogue(vec![category("Clearance", "a1")]),
        None,
        None,
        false,
    )
    .await
    .expect("a truncated category is not a failure");

    assert_eq!(data_lines(&out).len(), 1);
    let _ = std::fs::remove_file(&out);
}

#[tokio::test]
async fn dry_run_fetches_and_writes_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(page(vec![item("1", 10.0)]))
        .expect(0)
        .mount(&server)
        .await;

    let out = temp_output("dry-run");
    let config = test_config(&server, out.clone(), 10);
    run_crawl(
        &config,
        &catalogue(vec![category("Clearance", "a1")]),
        None,
        None,
        true,
    )
    .await
    .expect("dry run should succeed");

    assert!(!out.exists());
}
