use axum::http::StatusCode;
use axum_test::TestServer;
use dategallery::{Config, api::PageResponse, create_app};
use tempfile::TempDir;

/// Helper to create a test configuration rooted in a temp directory
fn create_test_config(temp_dir: &TempDir, threshold: usize) -> Config {
    let mut config = Config::default();

    let photos_dir = temp_dir.path().join("photos");
    std::fs::create_dir_all(&photos_dir).unwrap();

    config.photos.source_directory = photos_dir;
    config.photos.pagination_threshold = threshold;
    config.thumbnails.directory = temp_dir.path().join("thumbnails");
    config.thumbnails.width = 50;
    config.thumbnails.height = 50;
    config.app.base_url = Some("https://example.com".to_string());

    config
}

/// Helper to create real JPEG files in a date folder
fn create_test_images(config: &Config, date: &str, names: &[&str]) {
    use image::{ImageBuffer, Rgb};

    let dir = config.photos.source_directory.join(date);
    std::fs::create_dir_all(&dir).unwrap();

    for (i, name) in names.iter().enumerate() {
        let img = ImageBuffer::from_fn(120, 80, |x, y| {
            Rgb([(x * 2) as u8, (y * 2) as u8, (i * 50) as u8])
        });
        img.save(dir.join(name)).unwrap();
    }
}

async fn setup(threshold: usize) -> (TempDir, TestServer) {
    let temp_dir = TempDir::new().unwrap();
    let config = create_test_config(&temp_dir, threshold);

    create_test_images(&config, "20230101", &["a.jpg", "b.jpg"]);
    create_test_images(&config, "20230102", &["c.jpg"]);

    let app = create_app(config).await;
    let server = TestServer::new(app).unwrap();
    (temp_dir, server)
}

#[tokio::test]
async fn test_latest_defaults_to_three() {
    let (_temp_dir, server) = setup(2).await;

    let response = server.get("/latest").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let json = response.json::<serde_json::Value>();
    let latest = json["latest"].as_array().unwrap();
    assert_eq!(latest.len(), 3);
    assert_eq!(latest[0]["filename"], "c.jpg");
    assert_eq!(latest[0]["display_date"], "2023-01-02");
    assert_eq!(latest[0]["url"], "/view/20230102/c.jpg");
    assert_eq!(latest[0]["thumbnail"], "/thumbnails/20230102/c.jpg");
    assert_eq!(latest[1]["filename"], "b.jpg");
    assert_eq!(latest[2]["filename"], "a.jpg");
}

#[tokio::test]
async fn test_latest_amount() {
    let (_temp_dir, server) = setup(2).await;

    let response = server.get("/latest").add_query_param("amount", "1").await;
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["latest"].as_array().unwrap().len(), 1);

    let response = server.get("/latest").add_query_param("amount", "lots").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_index_returns_first_page() {
    let (_temp_dir, server) = setup(2).await;

    let response = server.get("/").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let page = response.json::<PageResponse>();
    assert_eq!(page.current_page, 1);
    assert_eq!(page.total_pages, 1);
    assert_eq!(page.dates.len(), 2);
    assert_eq!(page.dates[0].date, "20230102");
    assert_eq!(page.dates[1].pictures.len(), 2);
}

#[tokio::test]
async fn test_pages_are_one_indexed() {
    let (_temp_dir, server) = setup(1).await;

    let first = server.get("/1").await.json::<PageResponse>();
    assert_eq!(first.total_pages, 2);
    assert_eq!(first.dates[0].date, "20230102");

    let second = server.get("/2").await.json::<PageResponse>();
    assert_eq!(second.current_page, 2);
    assert_eq!(second.dates[0].date, "20230101");

    assert_eq!(server.get("/0").await.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(server.get("/3").await.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(server.get("/abc").await.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_view_includes_neighbors() {
    let (_temp_dir, server) = setup(2).await;

    let response = server.get("/view/20230101/b.jpg").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["photo"]["filename"], "b.jpg");
    assert_eq!(json["previous_photo"]["filename"], "c.jpg");
    assert_eq!(json["next_photo"]["filename"], "a.jpg");
    assert_eq!(
        json["absolute_thumbnail"],
        "https://example.com/thumbnails/20230101/b.jpg"
    );

    let newest = server.get("/view/20230102/c.jpg").await.json::<serde_json::Value>();
    assert!(newest["previous_photo"].is_null());
}

#[tokio::test]
async fn test_view_not_found() {
    let (_temp_dir, server) = setup(2).await;

    assert_eq!(
        server.get("/view/20230101/missing.jpg").await.status_code(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        server.get("/view/20230199/a.jpg").await.status_code(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        server.get("/view/20230101/.hidden").await.status_code(),
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn test_date_neighbors() {
    let (_temp_dir, server) = setup(2).await;

    let response = server.get("/dates/20230102").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let json = response.json::<serde_json::Value>();
    assert!(json["previous"].is_null());
    assert_eq!(json["next"], "20230101");
    assert_eq!(json["picture_count"], 1);

    assert_eq!(
        server.get("/dates/20240101").await.status_code(),
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn test_thumbnail_generation() {
    let (temp_dir, server) = setup(2).await;

    let response = server.get("/thumbnails/20230101/a.jpg").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.header("content-type"), "image/jpeg");

    let thumbnail = image::load_from_memory(response.as_bytes()).unwrap();
    assert!(thumbnail.width() <= 50 && thumbnail.height() <= 50);
    assert!(temp_dir.path().join("thumbnails/20230101/a.jpg").exists());
}

#[tokio::test]
async fn test_thumbnail_errors() {
    let temp_dir = TempDir::new().unwrap();
    let config = create_test_config(&temp_dir, 2);
    create_test_images(&config, "20230101", &["a.jpg"]);
    std::fs::write(
        config.photos.source_directory.join("20230101/clip.jpg"),
        "not an image",
    )
    .unwrap();

    let server = TestServer::new(create_app(config).await).unwrap();

    let missing = server.get("/thumbnails/20230101/missing.jpg").await;
    assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);

    let invalid_date = server.get("/thumbnails/2023-01-01/a.jpg").await;
    assert_eq!(invalid_date.status_code(), StatusCode::NOT_FOUND);

    let broken = server.get("/thumbnails/20230101/clip.jpg").await;
    assert_eq!(broken.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(broken.text().contains("not an image file"));
}

#[tokio::test]
async fn test_originals_are_served() {
    let (_temp_dir, server) = setup(2).await;

    let response = server.get("/photos/20230101/a.jpg").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(image::load_from_memory(response.as_bytes()).is_ok());
}

#[tokio::test]
async fn test_malformed_folder_surfaces_error() {
    let temp_dir = TempDir::new().unwrap();
    let config = create_test_config(&temp_dir, 2);
    create_test_images(&config, "20230101", &["a.jpg"]);
    std::fs::create_dir(config.photos.source_directory.join("misc")).unwrap();

    let server = TestServer::new(create_app(config).await).unwrap();

    let response = server.get("/").await;
    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
}
