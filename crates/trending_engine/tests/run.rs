use std::fs;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone, Utc};
use pretty_assertions::assert_eq;
use tempfile::TempDir;
use trending_core::{Category, Host};
use trending_engine::{
    load_instances, run, ConfigError, FetchSettings, LogSink, Orchestrator, Outcome,
    OutcomeRecord, ReqwestFetcher, RunConfig, RunError, TrendingConfig,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct TestSink {
    records: Arc<Mutex<Vec<OutcomeRecord>>>,
}

impl TestSink {
    fn take(&self) -> Vec<OutcomeRecord> {
        self.records.lock().unwrap().drain(..).collect()
    }
}

impl LogSink for TestSink {
    fn record(&self, record: OutcomeRecord) {
        self.records.lock().unwrap().push(record);
    }
}

fn init_logging() {
    engine_logging::initialize_for_tests();
}

fn at(second: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 5, 6, 7, 8, second).unwrap()
}

fn http_fetcher() -> ReqwestFetcher {
    ReqwestFetcher::new(FetchSettings {
        scheme: "http".to_string(),
        ..FetchSettings::default()
    })
}

fn local_host(server: &MockServer) -> Host {
    Host::parse(&format!("127.0.0.1:{}", server.address().port())).unwrap()
}

fn categories(csv: &str) -> Vec<Category> {
    Category::parse_list(csv).unwrap()
}

fn run_config(root: &std::path::Path, csv: &str, when: DateTime<Utc>) -> RunConfig {
    RunConfig::new(root.to_path_buf(), categories(csv)).with_clock(Arc::new(move || when))
}

async fn mount_json(server: &MockServer, category: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/api/trending/{category}/")))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body.to_string(), "application/json"))
        .mount(server)
        .await;
}

#[tokio::test]
async fn two_runs_append_two_sections_and_keep_both_snapshots() {
    init_logging();
    let server = MockServer::start().await;
    mount_json(
        &server,
        "book",
        r#"{"results":[{"title":"Dune","cover_image_url":"/c/dune.jpg","id":"42"}]}"#,
    )
    .await;
    mount_json(&server, "movie", r#"[{"name":"Heat","url":"/movie/heat"}]"#).await;

    let temp = TempDir::new().unwrap();
    let host = local_host(&server);
    let fetcher = http_fetcher();
    let sink = TestSink::default();

    for second in [1, 2] {
        let config = run_config(temp.path(), "book,movie", at(second));
        let summary = Orchestrator::new(config, &fetcher, &sink)
            .run_hosts(std::slice::from_ref(&host))
            .await;
        assert_eq!(summary.fetched, 2);
        assert_eq!(summary.payload_files, 2);
        assert_eq!(summary.summaries, 1);
        assert_eq!(summary.readme_sections, 1);
        assert_eq!(summary.failed, 0);
    }

    let day = temp.path().join(host.slug()).join("2025/05/06");
    let readme = fs::read_to_string(day.join("README.md")).unwrap();
    assert_eq!(readme.matches("# NeoDB Trending History for").count(), 1);
    let first = readme.find("## 2025-05-06T07:08:01.000000000Z").unwrap();
    let second = readme.find("## 2025-05-06T07:08:02.000000000Z").unwrap();
    assert!(first < second);
    assert!(readme.contains(&format!(
        "| books | [![](https://{h}/c/dune.jpg)<br/>Dune](https://{h}/book/42) |",
        h = host.as_str()
    )));
    assert!(readme.contains(&format!(
        "| movies | [Heat](https://{h}/movie/heat) |",
        h = host.as_str()
    )));

    for (dir, second) in [("07-08-01", "01"), ("07-08-02", "02")] {
        let run_dir = day.join(dir);
        let mut names: Vec<String> = fs::read_dir(&run_dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        let token = format!("2025-05-06T07-08-{second}.000000000Z-{}", host.slug());
        assert_eq!(
            names,
            vec![
                format!("{token}-trending-book.json"),
                format!("{token}-trending-movie.json"),
                format!("{token}-trending.json"),
            ]
        );
    }

    let records = sink.take();
    assert!(records.iter().all(|r| r.outcome == Outcome::Ok));
}

#[tokio::test]
async fn failing_category_does_not_block_others() {
    init_logging();
    let failing = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/trending/book/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&failing)
        .await;
    mount_json(&failing, "tv", r#"[{"title":"Show","id":"7"}]"#).await;

    let healthy = MockServer::start().await;
    mount_json(&healthy, "book", r#"[{"title":"Book","id":"1"}]"#).await;
    mount_json(&healthy, "tv", r#"{"data":[]}"#).await;

    let temp = TempDir::new().unwrap();
    let hosts = vec![local_host(&failing), local_host(&healthy)];
    let fetcher = http_fetcher();
    let sink = TestSink::default();

    let summary = Orchestrator::new(run_config(temp.path(), "book,tv", at(0)), &fetcher, &sink)
        .run_hosts(&hosts)
        .await;
    assert_eq!(summary.hosts, 2);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.fetched, 3);
    assert_eq!(summary.summaries, 2);
    assert_eq!(summary.readme_sections, 2);

    let records = sink.take();
    let warning = records
        .iter()
        .find(|r| r.outcome == Outcome::Warn)
        .expect("warning for 500");
    assert_eq!(warning.host.as_deref(), Some(hosts[0].as_str()));
    assert_eq!(warning.category.as_deref(), Some("book"));

    let failing_readme =
        fs::read_to_string(temp.path().join(hosts[0].slug()).join("2025/05/06/README.md")).unwrap();
    assert!(failing_readme.contains("| tv | "));
    assert!(!failing_readme.contains("| books |"));

    // The healthy host's tv payload had no entries: no row, but the payload is kept.
    let healthy_day = temp.path().join(hosts[1].slug()).join("2025/05/06");
    let healthy_readme = fs::read_to_string(healthy_day.join("README.md")).unwrap();
    assert!(healthy_readme.contains("| books | "));
    assert!(!healthy_readme.contains("| tv |"));
    assert!(healthy_day
        .join("07-08-00")
        .join(format!(
            "2025-05-06T07-08-00.000000000Z-{}-trending-tv.json",
            hosts[1].slug()
        ))
        .exists());
}

#[tokio::test]
async fn host_without_entries_gets_summary_but_no_readme() {
    init_logging();
    let server = MockServer::start().await;
    mount_json(&server, "music", "not json at all").await;

    let temp = TempDir::new().unwrap();
    let host = local_host(&server);
    let fetcher = http_fetcher();
    let sink = TestSink::default();

    let summary = Orchestrator::new(run_config(temp.path(), "music", at(3)), &fetcher, &sink)
        .run_hosts(std::slice::from_ref(&host))
        .await;
    assert_eq!(summary.payload_files, 1);
    assert_eq!(summary.summaries, 1);
    assert_eq!(summary.readme_sections, 0);

    let day = temp.path().join(host.slug()).join("2025/05/06");
    assert!(!day.join("README.md").exists());
    let records = sink.take();
    assert!(records
        .iter()
        .any(|r| r.outcome == Outcome::Warn && r.category.as_deref() == Some("music")));
}

#[tokio::test]
async fn missing_instance_list_is_a_soft_no_op() {
    init_logging();
    let temp = TempDir::new().unwrap();
    let config = TrendingConfig {
        instances_file: temp.path().join("missing.txt"),
        output_root: temp.path().to_path_buf(),
        ..TrendingConfig::default()
    };
    let sink = TestSink::default();

    let summary = run(&config, &http_fetcher(), &sink).await.unwrap();
    assert_eq!(summary.hosts, 0);
    assert_eq!(sink.take()[0].outcome, Outcome::Warn);
}

#[tokio::test]
async fn malformed_instance_list_fails_before_fetching() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let list = temp.path().join("instance.txt");
    fs::write(
        &list,
        format!("127.0.0.1:{}\nhttps://bad.example\n", server.address().port()),
    )
    .unwrap();
    let config = TrendingConfig {
        instances_file: list,
        output_root: temp.path().to_path_buf(),
        scheme: "http".to_string(),
        ..TrendingConfig::default()
    };

    let err = run(&config, &http_fetcher(), &TestSink::default())
        .await
        .unwrap_err();
    match err {
        RunError::Config(ConfigError::InvalidInstances { source, .. }) => {
            assert_eq!(source.line, 2)
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn colliding_slugs_are_rejected_at_load() {
    let temp = TempDir::new().unwrap();
    let list = temp.path().join("instance.txt");
    fs::write(&list, "# two spellings\nexample.org\nexample-org\n").unwrap();

    let err = load_instances(&list).unwrap_err();
    assert!(matches!(err, ConfigError::SlugCollision(c) if c.slug == "example-org"));
}

#[test]
fn instance_list_loads_in_order() {
    let temp = TempDir::new().unwrap();
    let list = temp.path().join("instance.txt");
    fs::write(&list, "neodb.social\n\n# comment\nEggplant.Place\n").unwrap();

    let hosts = load_instances(&list).unwrap().unwrap();
    let names: Vec<&str> = hosts.iter().map(Host::as_str).collect();
    assert_eq!(names, vec!["neodb.social", "eggplant.place"]);
}

#[tokio::test]
async fn blocked_snapshot_dir_still_appends_readme() {
    init_logging();
    let server = MockServer::start().await;
    mount_json(&server, "book", r#"[{"title":"Kept","id":"9"}]"#).await;

    let temp = TempDir::new().unwrap();
    let host = local_host(&server);
    let day = temp.path().join(host.slug()).join("2025/05/06");
    fs::create_dir_all(&day).unwrap();
    // A plain file where the run directory should go.
    fs::write(day.join("07-08-00"), "occupied").unwrap();

    let fetcher = http_fetcher();
    let sink = TestSink::default();
    let summary = Orchestrator::new(run_config(temp.path(), "book", at(0)), &fetcher, &sink)
        .run_hosts(std::slice::from_ref(&host))
        .await;

    assert_eq!(summary.fetched, 1);
    assert_eq!(summary.payload_files, 0);
    assert_eq!(summary.summaries, 0);
    assert_eq!(summary.readme_sections, 1);

    let readme = fs::read_to_string(day.join("README.md")).unwrap();
    assert!(readme.contains("| books | [Kept]("));

    let records = sink.take();
    let errors: Vec<&str> = records
        .iter()
        .filter(|r| r.outcome == Outcome::Err)
        .map(|r| r.message.as_str())
        .collect();
    assert_eq!(errors.len(), 2);
    assert!(errors[0].starts_with("write payload"));
    assert!(errors[1].starts_with("write summary"));
    assert!(records
        .iter()
        .any(|r| r.outcome == Outcome::Ok && r.message.starts_with("appended")));
}

#[tokio::test]
async fn truncated_body_is_persisted_and_left_out_of_summary() {
    init_logging();
    let server = MockServer::start().await;
    let body = r#"[{"title":"Long enough to be cut"}]"#;
    mount_json(&server, "game", body).await;
    mount_json(&server, "tv", "[]").await;

    let temp = TempDir::new().unwrap();
    let host = local_host(&server);
    let fetcher = ReqwestFetcher::new(FetchSettings {
        scheme: "http".to_string(),
        max_bytes: 12,
        ..FetchSettings::default()
    });
    let sink = TestSink::default();

    let summary = Orchestrator::new(run_config(temp.path(), "game,tv", at(4)), &fetcher, &sink)
        .run_hosts(std::slice::from_ref(&host))
        .await;
    assert_eq!(summary.fetched, 2);
    assert_eq!(summary.payload_files, 2);
    assert_eq!(summary.summaries, 1);
    assert_eq!(summary.readme_sections, 0);

    let run_dir = temp.path().join(host.slug()).join("2025/05/06/07-08-04");
    let token = format!("2025-05-06T07-08-04.000000000Z-{}", host.slug());
    let saved = fs::read(run_dir.join(format!("{token}-trending-game.json"))).unwrap();
    assert_eq!(saved, &body.as_bytes()[..12]);

    let doc: serde_json::Value =
        serde_json::from_slice(&fs::read(run_dir.join(format!("{token}-trending.json"))).unwrap())
            .unwrap();
    assert!(doc["types"].get("game").is_none());
    assert_eq!(doc["types"]["tv"], serde_json::json!([]));

    let warnings: Vec<OutcomeRecord> = sink
        .take()
        .into_iter()
        .filter(|r| r.outcome == Outcome::Warn)
        .collect();
    assert_eq!(warnings.len(), 2);
    assert!(warnings
        .iter()
        .all(|r| r.category.as_deref() == Some("game")));
    assert!(warnings[0].message.starts_with("body truncated at 12 bytes"));
    assert!(warnings[1].message.contains("left out of summary"));
}
