//! Integration tests for the crawler
//!
//! These tests use wiremock to serve unit and lecturer pages and test
//! the full crawl cycle end-to-end.

use campus_atlas::config::{Config, CrawlerConfig, SourceConfig};
use campus_atlas::crawler::{Coordinator, StopReason};
use campus_atlas::output::Category;
use campus_atlas::state::{ItemKey, ItemState};
use campus_atlas::storage::{PlaceStore, SqliteStorage};
use encoding_rs::WINDOWS_1252;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing both page types at the mock server
fn create_test_config(base_url: &str, max_items_to_visit: usize) -> Config {
    Config {
        crawler: CrawlerConfig {
            max_items_to_visit,
            max_concurrent_fetches: 4,
            request_timeout_secs: 1,
            connect_timeout_secs: 1,
        },
        source: SourceConfig {
            unit_url_prefix: format!("{}/unit.asp?gguid=", base_url),
            lecturer_url_prefix: format!("{}/lecturer.asp?gguid=", base_url),
            root_key: "0xROOT".to_string(),
            root_name: "Fachgruppe Informatik".to_string(),
        },
        ..Config::default()
    }
}

fn coordinator(config: &Config) -> Coordinator {
    Coordinator::from_config(config).unwrap()
}

/// Encodes a page the way the directory serves it
fn latin1(page: &str) -> Vec<u8> {
    let (bytes, _, had_errors) = WINDOWS_1252.encode(page);
    assert!(!had_errors);
    bytes.into_owned()
}

fn unit_page(building: &str, room: &str, links: &str) -> String {
    format!(
        concat!(
            "<html><body><table>",
            r#"<tr><td class="default">Gebäude:</td><td class="default"><span>{}</span></td></tr>"#,
            r#"<tr><td class="default">Raum:</td><td class="default"><span>{}</span></td></tr>"#,
            "</table>{}</body></html>"
        ),
        building, room, links
    )
}

fn lecturer_page(building: &str, room: &str) -> String {
    format!(
        concat!(
            r#"<p class="address">Gebäude<img src="arrow.gif" alt="">{}</p>"#,
            r#"<p class="address">Raum<img src="arrow.gif" alt="">{}</p>"#,
        ),
        building, room
    )
}

fn unit_link(key: &str, name: &str) -> String {
    format!(r#"<a href="unit.asp?gguid={}&amp;tguid=0xT">{}</a>"#, key, name)
}

fn lecturer_link(key: &str, name: &str) -> String {
    format!(r#"<a href="lecturer.asp?gguid={}&amp;tguid=0xT">{}</a>"#, key, name)
}

const EMPTY_PAGE: &str = "<html><body><h1>Empty unit</h1></body></html>";

async fn mount_page(server: &MockServer, kind: &str, key: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/{}.asp", kind)))
        .and(query_param("gguid", key))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(latin1(body)))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_crawl_single_chair() {
    let mock_server = MockServer::start().await;
    let links = format!("{}{}", unit_link("0xA", "Unit A"), unit_link("0xB", "Unit B"));

    mount_page(
        &mock_server,
        "unit",
        "0xROOT",
        &unit_page("2350 Hauptgebäude", "2222", &links),
    )
    .await;
    mount_page(&mock_server, "unit", "0xA", EMPTY_PAGE).await;
    mount_page(&mock_server, "unit", "0xB", EMPTY_PAGE).await;

    let config = create_test_config(&mock_server.uri(), 1000);
    let outcome = coordinator(&config).run_with_report().await;

    assert_eq!(outcome.report.visited, 3);
    assert_eq!(outcome.report.parsed, 3);
    assert_eq!(outcome.report.without_location, 2);
    assert_eq!(outcome.report.stop_reason, StopReason::FrontierExhausted);

    assert_eq!(outcome.places.len(), 1);
    let chair = &outcome.places[0];
    assert_eq!(chair.name, "Fachgruppe Informatik");
    assert_eq!(chair.category, Category::Chair);
    assert_eq!(chair.building, "Hauptbau");
    assert_eq!(chair.floor, 2);
    assert_eq!(chair.latitude, 50.779119421686843);
    assert_eq!(
        chair.url.as_deref(),
        Some(format!("{}/unit.asp?gguid=0xROOT", mock_server.uri()).as_str())
    );
}

#[tokio::test]
async fn test_each_item_is_visited_once() {
    let mock_server = MockServer::start().await;

    // A cycle through every item, plus repeated links
    let root_links = format!(
        "{}{}{}",
        unit_link("0xA", "Unit A"),
        unit_link("0xB", "Unit B"),
        unit_link("0xA", "Unit A again")
    );
    let a_links = format!("{}{}", unit_link("0xB", "B"), unit_link("0xROOT", "Root"));
    let b_links = format!("{}{}", unit_link("0xA", "A"), lecturer_link("0xL", "Prof. L"));

    mount_page(&mock_server, "unit", "0xROOT", &unit_page("", "", &root_links)).await;
    mount_page(&mock_server, "unit", "0xA", &unit_page("", "", &a_links)).await;
    mount_page(&mock_server, "unit", "0xB", &unit_page("", "", &b_links)).await;
    mount_page(&mock_server, "lecturer", "0xL", &lecturer_page("2356", "5052")).await;

    let config = create_test_config(&mock_server.uri(), 1000);
    let outcome = coordinator(&config).run_with_report().await;

    assert_eq!(outcome.report.visited, 4);
    assert_eq!(outcome.places.len(), 1);

    let person = &outcome.places[0];
    assert_eq!(person.name, "Prof. L");
    assert_eq!(person.category, Category::Person);
    assert_eq!(person.building, "E2");
    assert_eq!(person.floor, 0);

    // Dropping the server verifies every page was requested exactly once
}

#[tokio::test]
async fn test_cap_is_respected() {
    let mock_server = MockServer::start().await;

    let links: String = (0..8)
        .map(|i| unit_link(&format!("0xC{}", i), &format!("Child {}", i)))
        .collect();

    mount_page(&mock_server, "unit", "0xROOT", &unit_page("", "", &links)).await;
    Mock::given(method("GET"))
        .and(path("/unit.asp"))
        .respond_with(ResponseTemplate::new(200).set_body_string(EMPTY_PAGE))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), 3);
    let outcome = coordinator(&config).run_with_report().await;

    assert_eq!(outcome.report.visited, 3);
    assert_eq!(outcome.report.stop_reason, StopReason::CapReached);
}

#[tokio::test]
async fn test_failures_do_not_stall_the_crawl() {
    let mock_server = MockServer::start().await;

    let links = format!(
        "{}{}{}{}",
        unit_link("0xMISSING", "Gone"),
        unit_link("0xBROKEN", "Broken"),
        unit_link("0xSLOW", "Slow"),
        lecturer_link("0xL", "Prof. L")
    );

    mount_page(&mock_server, "unit", "0xROOT", &unit_page("", "", &links)).await;
    Mock::given(method("GET"))
        .and(path("/unit.asp"))
        .and(query_param("gguid", "0xBROKEN"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/unit.asp"))
        .and(query_param("gguid", "0xSLOW"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(EMPTY_PAGE)
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "lecturer", "0xL", &lecturer_page("2353 Erweiterungsbau 1", "4201")).await;
    // 0xMISSING has no mock and gets a 404

    let config = create_test_config(&mock_server.uri(), 1000);
    let mut coordinator = coordinator(&config);
    let outcome = coordinator.run_with_report().await;

    assert_eq!(outcome.report.visited, 5);
    assert_eq!(outcome.report.fetch_failures, 3);
    assert_eq!(outcome.report.parsed, 2);
    assert_eq!(
        coordinator.item_state(&ItemKey::unit("0xSLOW")),
        Some(ItemState::FetchFailed)
    );
    assert_eq!(
        coordinator.item_state(&ItemKey::lecturer("0xL")),
        Some(ItemState::Parsed)
    );

    assert_eq!(outcome.places.len(), 1);
    assert_eq!(outcome.places[0].building, "E1");
    assert_eq!(outcome.places[0].floor, 2);
}

#[tokio::test]
async fn test_extern_and_unknown_locations_are_dropped() {
    let mock_server = MockServer::start().await;

    let links = format!(
        "{}{}",
        lecturer_link("0xEXT", "Prof. Extern"),
        lecturer_link("0xUNK", "Prof. Unknown")
    );

    mount_page(&mock_server, "unit", "0xROOT", &unit_page("", "", &links)).await;
    mount_page(&mock_server, "lecturer", "0xEXT", &lecturer_page("1095", "430")).await;
    mount_page(&mock_server, "lecturer", "0xUNK", &lecturer_page("2350", "0000")).await;

    let config = create_test_config(&mock_server.uri(), 1000);
    let outcome = coordinator(&config).run_with_report().await;

    assert_eq!(outcome.report.visited, 3);
    assert_eq!(outcome.report.extern_dropped, 1);
    assert_eq!(outcome.report.unresolved, 1);
    assert!(outcome.places.is_empty());
}

#[tokio::test]
async fn test_crawled_places_can_be_stored() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "unit",
        "0xROOT",
        &unit_page("2359", "9U07", &lecturer_link("0xL", "Prof. L")),
    )
    .await;
    mount_page(&mock_server, "lecturer", "0xL", &lecturer_page("2356", "5052")).await;

    let config = create_test_config(&mock_server.uri(), 1000);
    let mut coordinator = coordinator(&config);
    let rooms = coordinator.resolver().table().room_places();
    let outcome = coordinator.run_with_report().await;

    let dir = tempfile::tempdir().unwrap();
    let mut storage = SqliteStorage::new(&dir.path().join("atlas.db")).unwrap();
    let run_id = storage.create_run("test").unwrap();
    storage.upsert_places(&rooms).unwrap();
    storage.upsert_places(&outcome.places).unwrap();
    storage
        .complete_run(
            run_id,
            outcome.report.visited as u64,
            outcome.report.places_emitted as u64,
        )
        .unwrap();

    assert_eq!(storage.count_places().unwrap(), rooms.len() as u64 + 2);

    let chair = storage.get_place("Fachgruppe Informatik").unwrap().unwrap();
    assert_eq!(chair.building, "E3");
    assert_eq!(chair.floor, -1);

    let counts = storage.count_by_category().unwrap();
    assert_eq!(counts.get(&Category::Person), Some(&1));
    assert_eq!(counts.get(&Category::Chair), Some(&1));

    let run = storage.get_latest_run().unwrap().unwrap();
    assert_eq!(run.items_visited, 2);
    assert_eq!(run.places_located, 2);
}

#[test]
fn test_run_blocking() {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let mock_server = runtime.block_on(async {
        let server = MockServer::start().await;
        mount_page(&server, "unit", "0xROOT", &unit_page("2350", "2222", "")).await;
        server
    });

    let config = create_test_config(&mock_server.uri(), 10);
    let places = coordinator(&config).run_blocking().unwrap();

    assert_eq!(places.len(), 1);
    assert_eq!(places[0].building, "Hauptbau");
}
