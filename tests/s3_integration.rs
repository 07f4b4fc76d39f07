//! Gateway tests against a real S3 API, using MinIO via testcontainers
//!
//! These tests require Docker and are skipped when it is not available.
//!
//! Run with: cargo test --test s3_integration

use aws_sdk_s3::primitives::ByteStream;
use std::time::Duration;
use testcontainers::{runners::AsyncRunner, ContainerAsync, ImageExt};
use testcontainers_modules::minio::MinIO;

use s3_navigator::app::{App, Command};
use s3_navigator::classify::FileCategory;
use s3_navigator::gateway::{self, Gateway, GatewayError, ObjectStore};
use s3_navigator::s3::{ObjectPayload, S3Client, S3ClientConfig};
use s3_navigator::settings::Settings;
use s3_navigator::workspace::PaneKind;

/// MinIO default credentials
const MINIO_ACCESS_KEY: &str = "minioadmin";
const MINIO_SECRET_KEY: &str = "minioadmin";

const BUCKET: &str = "navigator-test";

fn docker_available() -> bool {
    std::process::Command::new("docker")
        .arg("info")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

async fn get_minio_endpoint(container: &ContainerAsync<MinIO>) -> String {
    let host = container.get_host().await.expect("Failed to get container host");
    let port = container.get_host_port_ipv4(9000).await.expect("Failed to get MinIO port");
    format!("http://{}:{}", host, port)
}

async fn start_minio() -> (ContainerAsync<MinIO>, S3Client) {
    let container = MinIO::default()
        .with_env_var("MINIO_ROOT_USER", MINIO_ACCESS_KEY)
        .with_env_var("MINIO_ROOT_PASSWORD", MINIO_SECRET_KEY)
        .start()
        .await
        .expect("Failed to start MinIO container");

    let endpoint = get_minio_endpoint(&container).await;

    // Wait for MinIO to be ready
    tokio::time::sleep(Duration::from_secs(2)).await;

    let client = S3Client::with_config(S3ClientConfig {
        endpoint_url: Some(endpoint),
        force_path_style: true,
        region: Some("us-east-1".to_string()),
        access_key_id: Some(MINIO_ACCESS_KEY.to_string()),
        secret_access_key: Some(MINIO_SECRET_KEY.to_string()),
        ..Default::default()
    })
    .await
    .expect("Failed to create MinIO client");

    (container, client)
}

async fn seed(client: &S3Client, objects: &[(&str, &str, Option<&str>)]) {
    let sdk = client.sdk();
    sdk.create_bucket().bucket(BUCKET).send().await.expect("Failed to create bucket");
    for (key, body, content_type) in objects {
        sdk.put_object()
            .bucket(BUCKET)
            .key(*key)
            .body(ByteStream::from(body.as_bytes().to_vec()))
            .set_content_type(content_type.map(str::to_string))
            .send()
            .await
            .expect("Failed to put object");
    }
}

#[tokio::test]
async fn test_list_one_level() {
    if !docker_available() {
        eprintln!("Skipping test: Docker not available");
        return;
    }
    let (_container, client) = start_minio().await;
    seed(
        &client,
        &[
            ("readme.md", "# Hi", None),
            ("a/one.txt", "1", None),
            ("a/deep/two.txt", "2", None),
            ("b/three.txt", "3", None),
        ],
    )
    .await;
    let gateway = Gateway::new(client);

    let root = gateway.list_objects(BUCKET, "").await.expect("list root");
    let folders: Vec<&str> = root.folders.iter().map(|f| f.key.as_str()).collect();
    assert_eq!(folders, vec!["a/", "b/"]);
    assert_eq!(root.files.len(), 1);
    assert_eq!(root.files[0].category, FileCategory::Markdown);
    assert_eq!(root.files[0].size_bytes, 4);
    assert!(root.files[0].last_modified.is_some());

    let a = gateway.list_objects(BUCKET, "a/").await.expect("list a/");
    assert_eq!(a.folders[0].key, "a/deep/");
    assert_eq!(a.files[0].name, "one.txt");
}

#[tokio::test]
async fn test_get_object_classifies_payload() {
    if !docker_available() {
        eprintln!("Skipping test: Docker not available");
        return;
    }
    let (_container, client) = start_minio().await;
    seed(
        &client,
        &[
            ("data.json", r#"{"ok": true}"#, Some("application/json")),
            ("broken.json", "{oops", None),
            ("page.html", "<p>x</p>", Some("text/html")),
        ],
    )
    .await;
    let gateway = Gateway::new(client);

    let json = gateway.get_object(BUCKET, "data.json").await.unwrap();
    assert_eq!(json.category, FileCategory::Json);
    assert!(matches!(json.payload, ObjectPayload::Json(_)));

    let broken = gateway.get_object(BUCKET, "broken.json").await.unwrap();
    assert_eq!(broken.category, FileCategory::Other);
    assert!(broken.parse_error.is_some());

    let html = gateway.get_object(BUCKET, "page.html").await.unwrap();
    assert_eq!(html.category, FileCategory::Html);
    assert_eq!(html.content_type.as_deref(), Some("text/html"));
}

#[tokio::test]
async fn test_missing_key_and_bucket_errors() {
    if !docker_available() {
        eprintln!("Skipping test: Docker not available");
        return;
    }
    let (_container, client) = start_minio().await;
    seed(&client, &[("logs/app.log", "up", None)]).await;
    let gateway = Gateway::new(client);

    let err = gateway.get_object(BUCKET, "logs").await.unwrap_err();
    assert!(err.is_not_found(), "got {:?}", err);

    let err = gateway.list_objects("no-such-bucket", "").await.unwrap_err();
    assert!(matches!(err, GatewayError::Unknown(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_search_collects_matches() {
    if !docker_available() {
        eprintln!("Skipping test: Docker not available");
        return;
    }
    let (_container, client) = start_minio().await;
    let keys: Vec<String> = (0..120).map(|i| format!("logs/run-{:03}.log", i)).collect();
    let mut objects: Vec<(&str, &str, Option<&str>)> = keys.iter().map(|k| (k.as_str(), "x", None)).collect();
    objects.push(("other/run-999.log", "x", None));
    seed(&client, &objects).await;
    let gateway = Gateway::new(client);

    let found = gateway.search_objects(BUCKET, "RUN", "logs/").await.unwrap();
    assert_eq!(found.results.len(), 100);
    assert_eq!(found.total_found, 120);
    assert!(found.results.iter().all(|r| r.key.starts_with("logs/")));
}

#[tokio::test]
async fn test_app_falls_back_to_folder_over_channel() {
    if !docker_available() {
        eprintln!("Skipping test: Docker not available");
        return;
    }
    let (_container, client) = start_minio().await;
    seed(&client, &[("reports/q1.md", "# Q1", None)]).await;
    let (store, _task) = gateway::channel::spawn(Gateway::new(client));
    let mut app = App::new(store, Settings::default());

    app.dispatch(Command::SelectLocation {
        bucket: BUCKET.to_string(),
        key: "reports".to_string(),
    })
    .await;

    let pane = app.workspace().active_pane();
    assert_eq!(pane.kind, PaneKind::Browser);
    assert_eq!(pane.prefix, "reports/");
    assert_eq!(app.folder_table().unwrap().rows[0].name, "q1.md");
}
