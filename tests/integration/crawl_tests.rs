//! Integration tests for the crawler
//!
//! These tests use wiremock to serve listing pages and drive the full
//! navigate / scrape / paginate / append cycle through the HTTP engine.

use listing_harvester::browser::HttpBrowser;
use listing_harvester::config::{build_field_map, parse_config, parse_targets, Config};
use listing_harvester::crawler::{CrawlRunner, DelayPolicy, SleepPacer};
use listing_harvester::output::{CsvSinkFactory, TargetOutcome};
use listing_harvester::state::PaginationEnd;
use listing_harvester::HarvestError;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CONFIG: &str = r#"
[crawler]
item-locator = ".item"
next-page-locator = "a.next"
initial-load-ms = 0
page-settle-ms = { min = 0, max = 0 }
between-targets-ms = { min = 0, max = 0 }

[browser]
engine = "http"
timeout-secs = 5

[[selectors]]
name = "title"
locator = ".t"

[[selectors]]
name = "price"
locator = ".p"

[[selectors]]
name = "url"
locator = "a.link"
"#;

const PAGE_ONE: &str = r#"<html><body>
<div class="item"><span class="t">Bike</span><span class="p">1 234 567</span><a class="link" href="/ad/1">open</a></div>
<div class="item"><span class="t">Lamp</span><a class="link" href="/ad/2">open</a></div>
<a class="next" href="/siteA/2">next</a>
</body></html>"#;

const PAGE_TWO: &str = r#"<html><body>
<div class="item"><span class="t">Desk</span><span class="p">500</span><a class="link" href="/ad/3">open</a></div>
<div class="item"><span class="t">Chair</span><a class="link" href="/ad/4">open</a></div>
</body></html>"#;

/// Creates a test configuration writing into `output`
fn create_test_config(output: &Path) -> Config {
    let mut config = parse_config(CONFIG).expect("test config should parse");
    config.output.directory = output.to_path_buf();
    config
}

async fn mount_page(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html; charset=utf-8")
                .set_body_string(body),
        )
        .mount(server)
        .await;
}

async fn harvest(
    config: &Config,
    targets_toml: &str,
) -> Result<listing_harvester::RunSummary, HarvestError> {
    let targets = parse_targets(targets_toml)?;
    let field_map = build_field_map(config)?;
    let browser = HttpBrowser::new(&config.browser)?;
    let pacer = SleepPacer::new(DelayPolicy::from_settings(&config.crawler));
    let sinks = CsvSinkFactory::new(&config.output.directory, &config.output.extension);

    let mut runner = CrawlRunner::new(browser, pacer, sinks, &config.crawler)?;
    runner.run(&targets, &field_map).await
}

fn read_rows(file: &Path) -> (Vec<String>, Vec<Vec<String>>) {
    let mut reader = csv::Reader::from_path(file).expect("output file should exist");
    let header = reader
        .headers()
        .unwrap()
        .iter()
        .map(str::to_string)
        .collect();
    let rows = reader
        .records()
        .map(|r| r.unwrap().iter().map(str::to_string).collect())
        .collect();
    (header, rows)
}

#[tokio::test]
async fn test_full_harvest_two_pages() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_page(&server, "/siteA", PAGE_ONE).await;
    mount_page(&server, "/siteA/2", PAGE_TWO).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(dir.path());
    let targets = format!("[[target]]\nname = \"siteA\"\nurl = \"{}/siteA\"\n", base);

    let summary = harvest(&config, &targets).await.unwrap();

    assert_eq!(summary.targets.len(), 1);
    assert_eq!(summary.total_pages(), 2);
    assert_eq!(summary.total_rows(), 4);
    assert_eq!(
        summary.targets[0].outcome,
        TargetOutcome::Completed(PaginationEnd::LastPage)
    );

    let (header, rows) = read_rows(&dir.path().join("siteA.csv"));
    assert_eq!(header, vec!["title", "price", "url"]);
    assert_eq!(
        rows,
        vec![
            vec!["Bike".to_string(), "1.234.567".to_string(), format!("{}/ad/1", base)],
            vec!["Lamp".to_string(), String::new(), format!("{}/ad/2", base)],
            vec!["Desk".to_string(), "500".to_string(), format!("{}/ad/3", base)],
            vec!["Chair".to_string(), String::new(), format!("{}/ad/4", base)],
        ]
    );
}

#[tokio::test]
async fn test_unreachable_target_is_skipped() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_page(&server, "/siteB", PAGE_TWO).await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(dir.path());
    let targets = format!(
        "[[target]]\nname = \"siteA\"\nurl = \"{base}/gone\"\n\n[[target]]\nname = \"siteB\"\nurl = \"{base}/siteB\"\n"
    );

    let summary = harvest(&config, &targets).await.unwrap();

    assert!(summary.targets[0].outcome.is_failed());
    assert_eq!(summary.targets[1].rows, 2);
    assert!(!dir.path().join("siteA.csv").exists());

    let (_, rows) = read_rows(&dir.path().join("siteB.csv"));
    assert_eq!(rows.len(), 2);
}

#[tokio::test]
async fn test_rerun_appends_without_second_header() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_page(&server, "/siteB", PAGE_TWO).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(dir.path());
    let targets = format!("[[target]]\nname = \"siteB\"\nurl = \"{}/siteB\"\n", base);

    harvest(&config, &targets).await.unwrap();
    harvest(&config, &targets).await.unwrap();

    let content = std::fs::read_to_string(dir.path().join("siteB.csv")).unwrap();
    assert_eq!(content.matches("title,price,url").count(), 1);

    let (_, rows) = read_rows(&dir.path().join("siteB.csv"));
    assert_eq!(rows.len(), 4);
}

#[tokio::test]
async fn test_all_targets_failing_is_an_error() {
    let server = MockServer::start().await;
    let base = server.uri();

    let dir = TempDir::new().unwrap();
    let config = create_test_config(dir.path());
    let targets = format!("[[target]]\nname = \"siteA\"\nurl = \"{}/missing\"\n", base);

    let result = harvest(&config, &targets).await;

    assert!(matches!(
        result,
        Err(HarvestError::AllTargetsFailed { failed: 1 })
    ));
}
