use std::path::PathBuf;
use std::time::Duration;

use psalter::tools::{colors, scrape};
use tokio_test::{assert_err, assert_ok};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

// ============================================================================
// Helper Functions
// ============================================================================

/// Encode Ukrainian text as windows-1251, the charset allbible.info serves.
fn cp1251(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            'А'..='я' => (c as u32 - 'А' as u32 + 0xC0) as u8,
            'І' => 0xB2,
            'і' => 0xB3,
            'Ї' => 0xAF,
            'ї' => 0xBF,
            'Є' => 0xAA,
            'є' => 0xBA,
            'Ґ' => 0xA5,
            'ґ' => 0xB4,
            c if c.is_ascii() => c as u8,
            _ => b'?',
        })
        .collect()
}

const JEREMIAH_17: &str = "<html><body><div class=\"text\"><p>\
<sup>7</sup> Благословенний той муж, що надіється на Господа\
<sup>8</sup> І він буде, як дерево, над водою посаджене\
</p></div></body></html>";

async fn mount_chapter(server: &MockServer, chapter: &str, html: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/{chapter}/")))
        .respond_with(ResponseTemplate::new(200).set_body_raw(cp1251(html), "text/html"))
        .mount(server)
        .await;
}

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("psalter-{}-{}", std::process::id(), name))
}

// ============================================================================
// Scraper Tests
// ============================================================================

#[tokio::test]
async fn test_scrape_decodes_and_extracts_verse_ranges() {
    let mock_server = MockServer::start().await;
    mount_chapter(&mock_server, "jer/17", JEREMIAH_17).await;

    let scraper = assert_ok!(scrape::Scraper::new(&mock_server.uri())).with_pause(Duration::ZERO);
    let results = scraper.scrape(["Jeremiah 17:7-8", "Jeremiah 17:8"]).await;

    let range = results.get("Jeremiah 17:7-8").expect("range scraped");
    assert_eq!(range.verses.len(), 2);
    assert_eq!(
        range.verses[0].text,
        "Благословенний той муж, що надіється на Господа"
    );
    assert_eq!(
        range.full_text,
        "7. Благословенний той муж, що надіється на Господа 8. І він буде, як дерево, над водою посаджене"
    );

    let single = results.get("Jeremiah 17:8").expect("single verse scraped");
    assert_eq!(single.verses.len(), 1);
    assert_eq!(single.verses[0].verse, 8);
}

#[tokio::test]
async fn test_scrape_fetches_each_chapter_once() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/jer/17/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(cp1251(JEREMIAH_17), "text/html"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let scraper = assert_ok!(scrape::Scraper::new(&mock_server.uri())).with_pause(Duration::ZERO);
    let results = scraper
        .scrape(["Jeremiah 17:7", "Jeremiah 17:8", "Jeremiah 17:7-8"])
        .await;
    assert_eq!(results.len(), 3);
}

#[tokio::test]
async fn test_scrape_skips_failed_chapters() {
    let mock_server = MockServer::start().await;
    mount_chapter(&mock_server, "jer/17", JEREMIAH_17).await;
    Mock::given(method("GET"))
        .and(path("/jos/1/"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let scraper = assert_ok!(scrape::Scraper::new(&mock_server.uri())).with_pause(Duration::ZERO);
    let results = scraper
        .scrape(["Joshua 1:8", "Jeremiah 17:7", "Unknownbook 1:1"])
        .await;

    assert!(results.contains_key("Jeremiah 17:7"));
    assert!(!results.contains_key("Joshua 1:8"));
    assert!(!results.contains_key("Unknownbook 1:1"));
}

#[tokio::test]
async fn test_fetch_chapter_reports_status() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let scraper = assert_ok!(scrape::Scraper::new(&mock_server.uri()));
    let error = assert_err!(scraper.fetch_chapter("ps/119").await);
    assert!(error.to_string().ends_with("answered 503"));
}

#[tokio::test]
async fn test_run_writes_the_ukrainian_table() {
    let mock_server = MockServer::start().await;
    mount_chapter(&mock_server, "jer/17", JEREMIAH_17).await;

    let input = temp_path("refs.json");
    let output = temp_path("refs_uk.json");
    std::fs::write(
        &input,
        r#"{"verses": {"3": {"crossReferences": ["Jeremiah 17:8"]}}}"#,
    )
    .unwrap();

    let written = assert_ok!(scrape::run(&input, &output, &mock_server.uri()).await);
    assert_eq!(written, 1);

    let table: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    let entry = &table["Jeremiah 17:8"];
    assert_eq!(entry["reference"], "Jeremiah 17:8");
    assert_eq!(entry["verses"][0]["verse"], 8);
    assert_eq!(
        entry["fullText"],
        "8. І він буде, як дерево, над водою посаджене"
    );

    let _ = std::fs::remove_file(&input);
    let _ = std::fs::remove_file(&output);
}

#[tokio::test]
async fn test_run_with_missing_input() {
    let missing = temp_path("does-not-exist.json");
    let output = temp_path("never-written.json");
    let error = assert_err!(scrape::run(&missing, &output, "http://127.0.0.1:9").await);
    assert!(error.to_string().contains("does-not-exist.json"));
    assert!(!output.exists());
}

// ============================================================================
// Colour Tool Tests
// ============================================================================

#[tokio::test]
async fn test_colors_ranks_page_literals() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/reviews/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<style>a{color:#fff}b{color:#FFF}i{color:#1a2b3c}u{border:#000}</style>",
        ))
        .mount(&mock_server)
        .await;

    let url = format!("{}/reviews/", mock_server.uri());
    let lines = assert_ok!(colors::run(&url, 2).await);
    assert_eq!(lines, vec!["#FFF: 2", "#000: 1"]);
}

#[tokio::test]
async fn test_colors_http_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let result = colors::fetch_page(&mock_server.uri()).await;
    let error = assert_err!(result);
    assert!(error.to_string().ends_with("answered 404"));
}
