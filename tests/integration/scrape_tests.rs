use songbook_scraper::config::{Config, OutputConfig, RetryConfig, SourceConfig};
use songbook_scraper::output::write_json;
use songbook_scraper::{build_service, CatalogEntry, Group, Item, Service, Tag};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Encodes markup the way gr-oborona.ru serves it
fn windows_1251(markup: &str) -> Vec<u8> {
    let (bytes, _, had_errors) = encoding_rs::WINDOWS_1251.encode(markup);
    assert!(!had_errors, "markup must be representable in windows-1251");
    bytes.into_owned()
}

fn catalog_page(entries: &[(&str, &str)]) -> String {
    let links: String = entries
        .iter()
        .map(|(id, title)| format!(r#"<li><a href="/texts/{}.html">{}</a></li>"#, id, title))
        .collect();
    format!(
        r#"<html><body><h1>Тексты</h1><ul id="abc_list">{}</ul></body></html>"#,
        links
    )
}

fn song_page(title: &str, author: &str, album: &str, body: &str) -> String {
    format!(
        r#"<html><body>
        <h2>{}</h2>
        <p><strong>Автор:</strong> {}</p>
        <p><strong>Альбом:</strong> {}</p>
        <p>{}</p>
        </body></html>"#,
        title, author, album, body
    )
}

async fn mount_catalog(server: &MockServer, entries: &[(&str, &str)]) {
    let body = windows_1251(&catalog_page(entries));
    Mock::given(method("GET"))
        .and(path("/texts"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body))
        .mount(server)
        .await;
}

async fn mount_song(server: &MockServer, id: &str, markup: &str) {
    Mock::given(method("GET"))
        .and(path("/text_print.php"))
        .and(query_param("area", "go_texts"))
        .and(query_param("id", id))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(windows_1251(markup)))
        .mount(server)
        .await;
}

/// Mounts a two-song site
async fn mount_grob_site(server: &MockServer) {
    mount_catalog(
        server,
        &[("42", "Всё идёт по плану"), ("7", "Армагеддон-попс")],
    )
    .await;

    mount_song(
        server,
        "42",
        &song_page(
            "Всё идёт по плану",
            "Е. Летов",
            "Все идет по плану",
            "Границы ключ переломлен пополам<br>\n\
             А наш батюшка Ленин совсем усоп<br>\n<br>&nbsp;<br>\n\
             Всё идёт по плану<br>\nВсё идёт по плану",
        ),
    )
    .await;

    mount_song(
        server,
        "7",
        &song_page(
            "Армагеддон-попс",
            "Е. Летов",
            "Армагедон-попс",
            "Мы идём по следу<br>Мы поём",
        ),
    )
    .await;
}

fn source_config(name: &str, base_url: &str) -> SourceConfig {
    SourceConfig {
        name: name.to_string(),
        base_url: base_url.to_string(),
        user_agent: "SongbookTest/1.0".to_string(),
        retry: RetryConfig {
            enabled: false,
            ..RetryConfig::default()
        },
        ..SourceConfig::default()
    }
}

fn config_for(sources: Vec<SourceConfig>) -> Config {
    Config {
        output: OutputConfig::default(),
        sources,
    }
}

#[tokio::test]
async fn test_list_catalog_end_to_end() {
    let server = MockServer::start().await;
    mount_grob_site(&server).await;

    let service = build_service(&config_for(vec![source_config("grob", &server.uri())])).unwrap();
    let entries = service
        .list_catalog(&CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(
        entries,
        vec![
            CatalogEntry {
                id: "7".to_string(),
                title: "Армагеддон-попс".to_string(),
            },
            CatalogEntry {
                id: "42".to_string(),
                title: "Всё идёт по плану".to_string(),
            },
        ]
    );
}

#[tokio::test]
async fn test_requests_carry_configured_user_agent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/texts"))
        .and(header("user-agent", "SongbookTest/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(windows_1251(&catalog_page(&[]))))
        .expect(1)
        .mount(&server)
        .await;

    let service = build_service(&config_for(vec![source_config("grob", &server.uri())])).unwrap();
    let items = service.get_items(&CancellationToken::new()).await.unwrap();

    assert!(items.is_empty());
}

#[tokio::test]
async fn test_get_items_end_to_end() {
    let server = MockServer::start().await;
    mount_grob_site(&server).await;

    let service = build_service(&config_for(vec![source_config("grob", &server.uri())])).unwrap();
    let items = service.get_items(&CancellationToken::new()).await.unwrap();

    let titles: Vec<&str> = items.iter().map(|item| item.title.as_str()).collect();
    assert_eq!(titles, vec!["Армагеддон-попс", "Всё идёт по плану"]);

    let song = &items[1];
    assert_eq!(song.id, "42");
    assert_eq!(
        song.tags,
        vec![
            Tag::new("author", "Е. Летов"),
            Tag::new("artist", "Гражданская Оборона"),
            Tag::new("album", "Всё идёт по плану"),
        ]
    );
    assert_eq!(
        song.body,
        vec![
            Group {
                lines: vec![
                    "Границы ключ переломлен пополам".to_string(),
                    "А наш батюшка Ленин совсем усоп".to_string(),
                ],
            },
            Group {
                lines: vec![
                    "Всё идёт по плану".to_string(),
                    "Всё идёт по плану".to_string(),
                ],
            },
        ]
    );

    assert_eq!(items[0].id, "7");
    assert_eq!(items[0].tag("album"), Some("Армагеддон-попс"));
}

#[tokio::test]
async fn test_scraped_items_written_as_json() {
    let server = MockServer::start().await;
    mount_grob_site(&server).await;

    let service = build_service(&config_for(vec![source_config("grob", &server.uri())])).unwrap();
    let items = service.get_items(&CancellationToken::new()).await.unwrap();

    let dir = tempfile::TempDir::new().unwrap();
    let output = dir.path().join("out").join("songs.json");
    write_json(&output, &items).unwrap();

    let written: Vec<Item> =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(written, items);
}

#[tokio::test]
async fn test_get_item_end_to_end() {
    let server = MockServer::start().await;
    mount_grob_site(&server).await;

    let service = build_service(&config_for(vec![source_config("grob", &server.uri())])).unwrap();
    let item = service
        .get_item(&CancellationToken::new(), "7")
        .await
        .unwrap();

    assert_eq!(item.id, "7");
    assert_eq!(item.title, "Армагеддон-попс");
    assert_eq!(item.lines().collect::<Vec<_>>(), vec!["Мы идём по следу", "Мы поём"]);
}

#[tokio::test]
async fn test_get_item_reports_every_source_failure() {
    let first = MockServer::start().await;
    let second = MockServer::start().await;

    let service = build_service(&config_for(vec![
        source_config("first", &first.uri()),
        source_config("second", &second.uri()),
    ]))
    .unwrap();

    let err = service
        .get_item(&CancellationToken::new(), "99")
        .await
        .unwrap_err();
    let message = err.to_string();

    assert!(message.starts_with("failed to get the item with id=99 from any source: ["));
    assert!(message.contains("fetch from source 0 failed"));
    assert!(message.contains("fetch from source 1 failed"));
    assert!(message.contains("status code 404"));
}

#[tokio::test]
async fn test_get_item_falls_back_to_next_source() {
    let empty = MockServer::start().await;
    let full = MockServer::start().await;
    mount_grob_site(&full).await;

    let service = build_service(&config_for(vec![
        source_config("empty", &empty.uri()),
        source_config("full", &full.uri()),
    ]))
    .unwrap();

    let item = service
        .get_item(&CancellationToken::new(), "42")
        .await
        .unwrap();
    assert_eq!(item.title, "Всё идёт по плану");
}

#[tokio::test]
async fn test_get_items_merges_sources() {
    let first = MockServer::start().await;
    let second = MockServer::start().await;
    mount_grob_site(&first).await;

    mount_catalog(&second, &[("3", "Вечная весна")]).await;
    mount_song(
        &second,
        "3",
        &song_page(
            "Вечная весна",
            "Е. Летов",
            "Сто лет одиночества",
            "Вечная весна в одиночной камере",
        ),
    )
    .await;

    let service = build_service(&config_for(vec![
        source_config("first", &first.uri()),
        source_config("second", &second.uri()),
    ]))
    .unwrap();
    let items = service.get_items(&CancellationToken::new()).await.unwrap();

    let titles: Vec<&str> = items.iter().map(|item| item.title.as_str()).collect();
    assert_eq!(
        titles,
        vec!["Армагеддон-попс", "Вечная весна", "Всё идёт по плану"]
    );
    assert_eq!(items[1].tag("artist"), Some("Егор и Опизденевшие"));
}

#[tokio::test]
async fn test_get_items_is_all_or_nothing() {
    let healthy = MockServer::start().await;
    let broken = MockServer::start().await;
    mount_grob_site(&healthy).await;

    Mock::given(method("GET"))
        .and(path("/texts"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&broken)
        .await;

    let service = build_service(&config_for(vec![
        source_config("healthy", &healthy.uri()),
        source_config("broken", &broken.uri()),
    ]))
    .unwrap();

    let err = service
        .get_items(&CancellationToken::new())
        .await
        .unwrap_err();
    let message = err.to_string();

    assert!(message.starts_with("failed to aggregate items: ["));
    assert!(message.contains("fetch from source 1 failed"));
    assert!(message.contains("status code 500"));
    assert!(!message.contains("fetch from source 0 failed"));
}

#[tokio::test]
async fn test_invalid_item_fails_only_with_validation() {
    let server = MockServer::start().await;
    mount_catalog(&server, &[("5", "Пустая")]).await;
    mount_song(&server, "5", "<html><body><h2>Пустая</h2></body></html>").await;

    let validating =
        build_service(&config_for(vec![source_config("grob", &server.uri())])).unwrap();
    let err = validating
        .get_items(&CancellationToken::new())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("failed to validate item id=5"));

    let lenient = build_service(&config_for(vec![SourceConfig {
        validation: false,
        ..source_config("grob", &server.uri())
    }]))
    .unwrap();
    let items = lenient.get_items(&CancellationToken::new()).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, "5");
    assert!(items[0].body.is_empty());
}

#[tokio::test]
async fn test_retry_recovers_from_transient_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/texts"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_grob_site(&server).await;

    let source = SourceConfig {
        retry: RetryConfig {
            enabled: true,
            attempts: 3,
            min_interval_ms: 10,
            max_interval_ms: 50,
            factor: 1.5,
        },
        ..source_config("grob", &server.uri())
    };

    let service = build_service(&config_for(vec![source])).unwrap();
    let entries = service
        .list_catalog(&CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(entries.len(), 2);
}

#[tokio::test]
async fn test_cancelled_token_stops_every_operation() {
    let server = MockServer::start().await;
    mount_grob_site(&server).await;

    let service = build_service(&config_for(vec![source_config("grob", &server.uri())])).unwrap();
    let cancel = CancellationToken::new();
    cancel.cancel();

    assert!(service.list_catalog(&cancel).await.unwrap_err().is_cancelled());
    assert!(service.get_items(&cancel).await.unwrap_err().is_cancelled());
    assert!(service.get_item(&cancel, "42").await.unwrap_err().is_cancelled());
}
