//! Integration tests for the harvester
//!
//! These tests use wiremock to serve a fake search site and exercise
//! pagination discovery, extraction, aggregation and enrichment end-to-end.

use search_harvester::config::Config;
use search_harvester::crawler::{build_http_client, Fetcher, PageDiscoverer};
use search_harvester::{Dataset, HarvestError, Harvester, SearchQuery};
use std::time::Duration;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at the mock server
fn create_test_config(server: &MockServer) -> Config {
    let mut config = Config::default();
    config.search.base_url = format!("{}/search/", server.uri());
    config.http.timeout_secs = 5;
    config.http.connect_timeout_secs = 2;
    config
}

/// Renders one product card in the target site's markup
fn product_card(id: &str, name: &str, price: &str, rating: Option<&str>) -> String {
    let rating = rating
        .map(|r| format!(r#"<div class="ac-star-rating" data-star-rating="{}"></div>"#, r))
        .unwrap_or_default();

    format!(
        r#"<div class="ac-product-card">
            <a class="ac-product-link" href="/product/{id}">
                <div class="ac-product-name">{name}</div>
            </a>
            {rating}
            <div class="ac-product-price">{price}</div>
        </div>"#
    )
}

fn results_page(cards: &[String]) -> String {
    format!(
        r#"<html><head><title>Search results</title></head><body>
        <div class="search-results">{}</div>
        </body></html>"#,
        cards.join("\n")
    )
}

fn no_results_page() -> String {
    r#"<html><body><div class="search-no-results">Sorry, we couldn't find any matches</div></body></html>"#
        .to_string()
}

async fn mount_search_landing(server: &MockServer, keyword: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/search/{}", keyword)))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>landing</html>"))
        .mount(server)
        .await;
}

async fn mount_page(server: &MockServer, keyword: &str, index: u32, body: String, calls: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/search/{}/opt/page:{}/", keyword, index)))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(calls)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_end_to_end_ipad() {
    let mock_server = MockServer::start().await;
    mount_search_landing(&mock_server, "ipad").await;

    mount_page(
        &mock_server,
        "ipad",
        1,
        results_page(&[
            product_card("111", "Apple iPad 9.7 Inch", "£339.00", Some("4.5")),
            product_card("222", "Apple iPad Pro", "£619.00", None),
        ]),
        1,
    )
    .await;
    mount_page(&mock_server, "ipad", 2, no_results_page(), 1).await;
    mount_page(&mock_server, "ipad", 3, results_page(&[]), 0).await;

    let config = create_test_config(&mock_server);
    let query = SearchQuery::new("ipad", &config.search.base_url).unwrap();
    let harvester = Harvester::new(&config).expect("Failed to create harvester");

    let report = harvester.harvest(&query).await.expect("Harvest failed");

    assert_eq!(report.pages.len(), 1);
    assert_eq!(report.dataset.len(), 2);
    assert_eq!(report.dataset.ids().collect::<Vec<_>>(), vec!["111", "222"]);

    for (_, record) in report.dataset.iter() {
        assert_eq!(record.search_term, "ipad");
    }

    let first = report.dataset.get("111").unwrap();
    assert_eq!(first.name, "Apple iPad 9.7 Inch");
    assert_eq!(first.price, "£339.00");
    assert_eq!(first.rating, 4.5);
    assert_eq!(first.link, format!("{}/product/111", mock_server.uri()));

    assert_eq!(report.dataset.get("222").unwrap().rating, 0.0);
}

#[tokio::test]
async fn test_discovery_stops_at_end_marker() {
    let mock_server = MockServer::start().await;
    mount_search_landing(&mock_server, "ipad").await;

    mount_page(&mock_server, "ipad", 1, results_page(&[product_card("1", "A", "£1", None)]), 1).await;
    mount_page(&mock_server, "ipad", 2, results_page(&[product_card("2", "B", "£2", None)]), 1).await;
    mount_page(&mock_server, "ipad", 3, no_results_page(), 1).await;
    // Nothing past the end-of-results page may be requested
    mount_page(&mock_server, "ipad", 4, results_page(&[]), 0).await;

    let config = create_test_config(&mock_server);
    let query = SearchQuery::new("ipad", &config.search.base_url).unwrap();
    let discoverer = PageDiscoverer::new(Fetcher::new(&config.http).unwrap(), &config.pagination);

    let pages = discoverer
        .discover(query.search_url())
        .await
        .expect("Discovery failed");

    let indices: Vec<u32> = pages.iter().map(|p| p.index).collect();
    assert_eq!(indices, vec![1, 2]);
    assert_eq!(
        pages[1].url.as_str(),
        format!("{}/search/ipad/opt/page:2/", mock_server.uri())
    );
}

#[tokio::test]
async fn test_zero_results_when_first_page_is_error_page() {
    let mock_server = MockServer::start().await;
    mount_search_landing(&mock_server, "unicorn").await;

    mount_page(
        &mock_server,
        "unicorn",
        1,
        r#"<html><body class="Error-Page">Page not found</body></html>"#.to_string(),
        1,
    )
    .await;
    mount_page(&mock_server, "unicorn", 2, results_page(&[]), 0).await;

    let config = create_test_config(&mock_server);
    let query = SearchQuery::new("unicorn", &config.search.base_url).unwrap();
    let report = Harvester::new(&config)
        .unwrap()
        .harvest(&query)
        .await
        .expect("Zero results is not an error");

    assert!(report.pages.is_empty());
    assert!(report.dataset.is_empty());
}

#[tokio::test]
async fn test_redirected_search_url_becomes_pagination_base() {
    let mock_server = MockServer::start().await;
    let location = format!("{}/browse/tv/", mock_server.uri());

    Mock::given(method("GET"))
        .and(path("/search/tv"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", location.as_str()))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/browse/tv/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>tv</html>"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/browse/tv/opt/page:1/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(results_page(&[product_card("555", "Telly", "£199", None)])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/browse/tv/opt/page:2/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(no_results_page()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server);
    let query = SearchQuery::new("tv", &config.search.base_url).unwrap();
    let report = Harvester::new(&config).unwrap().harvest(&query).await.unwrap();

    assert_eq!(report.pages.len(), 1);
    assert_eq!(
        report.pages[0].url.as_str(),
        format!("{}/browse/tv/opt/page:1/", mock_server.uri())
    );
    assert!(report.dataset.contains("555"));
}

#[tokio::test]
async fn test_later_page_wins_on_duplicate_id() {
    let mock_server = MockServer::start().await;
    mount_search_landing(&mock_server, "ipad").await;

    mount_page(
        &mock_server,
        "ipad",
        1,
        results_page(&[
            product_card("111", "Page one listing", "£10.00", Some("3")),
            product_card("333", "Other", "£1.00", None),
        ]),
        1,
    )
    .await;
    mount_page(
        &mock_server,
        "ipad",
        2,
        results_page(&[product_card("111", "Page two listing", "£9.00", Some("4"))]),
        1,
    )
    .await;
    mount_page(&mock_server, "ipad", 3, no_results_page(), 1).await;

    let config = create_test_config(&mock_server);
    let query = SearchQuery::new("ipad", &config.search.base_url).unwrap();
    let report = Harvester::new(&config).unwrap().harvest(&query).await.unwrap();

    assert_eq!(report.records_extracted, 3);
    assert_eq!(report.records_replaced, 1);
    assert_eq!(report.dataset.len(), 2);

    let merged = report.dataset.get("111").unwrap();
    assert_eq!(merged.name, "Page two listing");
    assert_eq!(merged.price, "£9.00");
    assert_eq!(merged.rating, 4.0);
}

#[tokio::test]
async fn test_lookahead_keeps_page_order_and_boundary() {
    let mock_server = MockServer::start().await;
    mount_search_landing(&mock_server, "ipad").await;

    mount_page(
        &mock_server,
        "ipad",
        1,
        results_page(&[product_card("111", "First", "£1", None)]),
        1,
    )
    .await;
    mount_page(
        &mock_server,
        "ipad",
        2,
        results_page(&[product_card("111", "Second", "£2", None)]),
        1,
    )
    .await;
    mount_page(&mock_server, "ipad", 3, no_results_page(), 1).await;

    // Speculative probes past the boundary find a page full of products
    Mock::given(method("GET"))
        .and(path_regex(r"^/search/ipad/opt/page:\d+/$"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(results_page(&[product_card("999", "Leaked", "£9", None)])),
        )
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&mock_server);
    config.pagination.lookahead = 4;

    let query = SearchQuery::new("ipad", &config.search.base_url).unwrap();
    let report = Harvester::new(&config).unwrap().harvest(&query).await.unwrap();

    let indices: Vec<u32> = report.pages.iter().map(|p| p.index).collect();
    assert_eq!(indices, vec![1, 2]);
    assert!(!report.dataset.contains("999"));
    assert_eq!(report.dataset.get("111").unwrap().name, "Second");
}

#[tokio::test]
async fn test_page_cap_is_enforced() {
    let mock_server = MockServer::start().await;
    mount_search_landing(&mock_server, "ipad").await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/search/ipad/opt/page:\d+/$"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(results_page(&[product_card("1", "Forever", "£1", None)])),
        )
        .expect(3)
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&mock_server);
    config.pagination.max_pages = 2;

    let query = SearchQuery::new("ipad", &config.search.base_url).unwrap();
    let result = Harvester::new(&config).unwrap().harvest(&query).await;

    match result {
        Err(HarvestError::PaginationLimitExceeded { limit }) => assert_eq!(limit, 2),
        other => panic!("expected PaginationLimitExceeded, got {:?}", other.map(|r| r.pages)),
    }
}

#[tokio::test]
async fn test_exactly_max_pages_of_results_is_fine() {
    let mock_server = MockServer::start().await;
    mount_search_landing(&mock_server, "ipad").await;

    mount_page(&mock_server, "ipad", 1, results_page(&[product_card("1", "A", "£1", None)]), 1).await;
    mount_page(&mock_server, "ipad", 2, results_page(&[product_card("2", "B", "£2", None)]), 1).await;
    mount_page(&mock_server, "ipad", 3, no_results_page(), 1).await;

    let mut config = create_test_config(&mock_server);
    config.pagination.max_pages = 2;

    let query = SearchQuery::new("ipad", &config.search.base_url).unwrap();
    let report = Harvester::new(&config).unwrap().harvest(&query).await.unwrap();

    assert_eq!(report.pages.len(), 2);
    assert_eq!(report.dataset.len(), 2);
}

#[tokio::test]
async fn test_network_failure_aborts_harvest() {
    let mock_server = MockServer::start().await;
    mount_search_landing(&mock_server, "ipad").await;

    mount_page(&mock_server, "ipad", 1, results_page(&[product_card("1", "A", "£1", None)]), 1).await;

    Mock::given(method("GET"))
        .and(path("/search/ipad/opt/page:2/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(no_results_page())
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&mock_server);
    config.http.timeout_secs = 1;

    let query = SearchQuery::new("ipad", &config.search.base_url).unwrap();
    let result = Harvester::new(&config).unwrap().harvest(&query).await;

    match result {
        Err(HarvestError::Network { url, .. }) => assert!(url.ends_with("/opt/page:2/")),
        other => panic!("expected network error, got {:?}", other.map(|r| r.pages)),
    }
}

#[tokio::test]
async fn test_error_status_body_is_passed_through() {
    let mock_server = MockServer::start().await;
    mount_search_landing(&mock_server, "ipad").await;

    Mock::given(method("GET"))
        .and(path("/search/ipad/opt/page:1/"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_string(results_page(&[product_card("1", "Still listed", "£1", None)])),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/search/ipad/opt/page:2/"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_string(r#"<html><body class="error-page">Not found</body></html>"#),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server);
    let query = SearchQuery::new("ipad", &config.search.base_url).unwrap();
    let report = Harvester::new(&config).unwrap().harvest(&query).await.unwrap();

    assert_eq!(report.pages.len(), 1);
    assert!(report.dataset.contains("1"));
}

#[tokio::test]
async fn test_harvester_with_shared_client() {
    let mock_server = MockServer::start().await;
    mount_search_landing(&mock_server, "ipad").await;

    mount_page(
        &mock_server,
        "ipad",
        1,
        results_page(&[product_card("42", "iPad Case", "£19.99", Some("3.5"))]),
        1,
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/search/ipad/opt/page:2/"))
        .respond_with(ResponseTemplate::new(404).set_body_string(no_results_page()))
        .expect(2)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server);
    let client = build_http_client(&config.http).unwrap();
    let fetcher = Fetcher::with_client(client);

    let end_page =
        url::Url::parse(&format!("{}/search/ipad/opt/page:2/", mock_server.uri())).unwrap();
    let fetched = fetcher.fetch(&end_page).await.unwrap();
    assert_eq!(fetched.status_code, 404);
    assert!(fetched.body.contains("search-no-results"));

    let harvester = Harvester::with_fetcher(fetcher, &config).unwrap();
    let query = SearchQuery::new("ipad", &config.search.base_url).unwrap();
    let report = harvester.harvest(&query).await.unwrap();

    assert_eq!(report.pages.len(), 1);
    assert_eq!(report.dataset.get("42").unwrap().rating, 3.5);
}

#[tokio::test]
async fn test_malformed_entries_are_counted() {
    let mock_server = MockServer::start().await;
    mount_search_landing(&mock_server, "ipad").await;

    let broken = r#"<div class="ac-product-card">
            <div class="ac-product-name">No link here</div>
            <div class="ac-product-price">£5</div>
        </div>"#
        .to_string();

    mount_page(
        &mock_server,
        "ipad",
        1,
        results_page(&[product_card("1", "Good", "£1", None), broken]),
        1,
    )
    .await;
    mount_page(&mock_server, "ipad", 2, no_results_page(), 1).await;

    let config = create_test_config(&mock_server);
    let query = SearchQuery::new("ipad", &config.search.base_url).unwrap();
    let report = Harvester::new(&config).unwrap().harvest(&query).await.unwrap();

    assert_eq!(report.entries_skipped, 1);
    assert_eq!(report.records_extracted, 1);
    assert_eq!(report.dataset.len(), 1);
}

/// Harvests a single product `111` so enrichment has something to work on
async fn harvest_one(mock_server: &MockServer, harvester: &Harvester, config: &Config) -> Dataset {
    mount_search_landing(mock_server, "ipad").await;
    mount_page(
        mock_server,
        "ipad",
        1,
        results_page(&[product_card("111", "Apple iPad", "£339.00", None)]),
        1,
    )
    .await;
    mount_page(mock_server, "ipad", 2, no_results_page(), 1).await;

    let query = SearchQuery::new("ipad", &config.search.base_url).unwrap();
    harvester.harvest(&query).await.unwrap().dataset
}

#[tokio::test]
async fn test_enrich_sets_description() {
    let mock_server = MockServer::start().await;
    let config = create_test_config(&mock_server);
    let harvester = Harvester::new(&config).unwrap();
    let mut dataset = harvest_one(&mock_server, &harvester, &config).await;

    Mock::given(method("GET"))
        .and(path("/product/111"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><body>
                <h1 class="h1 product-name-main">Apple iPad</h1>
                <div itemprop="description"><p>Thin, light and powerful.</p></div>
                <li itemprop="price">£339.00</li>
            </body></html>"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let link = format!("{}/product/111", mock_server.uri());
    harvester.enrich(&mut dataset, &link).await.expect("Enrichment failed");

    assert_eq!(
        dataset.get("111").unwrap().description.as_deref(),
        Some("Thin, light and powerful.")
    );
}

#[tokio::test]
async fn test_enrich_unknown_product_fails_without_fetching() {
    let mock_server = MockServer::start().await;
    let config = create_test_config(&mock_server);
    let harvester = Harvester::new(&config).unwrap();
    let mut dataset = harvest_one(&mock_server, &harvester, &config).await;

    Mock::given(method("GET"))
        .and(path("/product/999"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let link = format!("{}/product/999", mock_server.uri());
    let result = harvester.enrich(&mut dataset, &link).await;

    match result {
        Err(HarvestError::RecordNotFound { id }) => assert_eq!(id, "999"),
        other => panic!("expected RecordNotFound, got {:?}", other),
    }
}

#[tokio::test]
async fn test_enrich_rejects_non_product_link() {
    let mock_server = MockServer::start().await;
    let config = create_test_config(&mock_server);
    let harvester = Harvester::new(&config).unwrap();
    let mut dataset = harvest_one(&mock_server, &harvester, &config).await;

    let link = format!("{}/search/ipad", mock_server.uri());
    let result = harvester.enrich(&mut dataset, &link).await;

    assert!(matches!(result, Err(HarvestError::InvalidLink { .. })));
}

#[tokio::test]
async fn test_enrich_without_description_leaves_record_untouched() {
    let mock_server = MockServer::start().await;
    let config = create_test_config(&mock_server);
    let harvester = Harvester::new(&config).unwrap();
    let mut dataset = harvest_one(&mock_server, &harvester, &config).await;

    Mock::given(method("GET"))
        .and(path("/product/111"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body></body></html>"))
        .mount(&mock_server)
        .await;

    let link = format!("{}/product/111", mock_server.uri());
    let result = harvester.enrich(&mut dataset, &link).await;

    assert!(matches!(
        result,
        Err(HarvestError::DetailFieldMissing { field: "description", .. })
    ));
    assert!(dataset.get("111").unwrap().description.is_none());
}
