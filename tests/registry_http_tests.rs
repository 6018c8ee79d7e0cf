use std::io::Write;

use mockito::{Matcher, Server, ServerGuard};
use ros_cuda_base::registry::{FetchError, HttpTagSource, TagSource};
use ros_cuda_base::{BaseImageResolver, ResolveError, ResolveOptions, ResolverSettings};
use serde_json::json;
use tempfile::NamedTempFile;
use url::Url;

const TAGS_PATH: &str = "/v2/repositories/nvidia/cuda/tags";

const DISTROS: &str = r#"
ros_versions:
  default:
    ubuntu: "24.04"
  noetic:
    ubuntu: "20.04"
  humble:
    ubuntu: "22.04"
"#;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp config");
    file.write_all(contents.as_bytes()).expect("write temp config");
    file
}

fn settings(server: &ServerGuard, config: &NamedTempFile) -> ResolverSettings {
    ResolverSettings {
        config_path: config.path().to_path_buf(),
        registry_url: format!("{}{TAGS_PATH}", server.url()),
        ..ResolverSettings::default()
    }
}

fn page_body(names: &[&str], next: Option<String>) -> String {
    let results: Vec<_> = names.iter().map(|name| json!({ "name": name })).collect();
    json!({ "count": names.len(), "next": next, "previous": null, "results": results }).to_string()
}

fn resolver(settings: ResolverSettings) -> BaseImageResolver {
    BaseImageResolver::from_settings(settings)
        .expect("build resolver")
        .with_validator(ros_cuda_base::helpers::VersionValidator::new(true))
}

#[tokio::test]
async fn follows_next_links_across_pages() {
    let mut server = Server::new_async().await;
    let page2 = format!("{}{TAGS_PATH}?page=2&page_size=100", server.url());
    let page3 = format!("{}{TAGS_PATH}?page=3&page_size=100", server.url());

    let first = server
        .mock("GET", TAGS_PATH)
        .match_query(Matcher::Exact("page_size=100".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(page_body(
            &["12.6.1-devel-ubuntu24.04", "12.6.3-runtime-ubuntu24.04"],
            Some(page2),
        ))
        .expect(1)
        .create_async()
        .await;
    let second = server
        .mock("GET", TAGS_PATH)
        .match_query(Matcher::Exact("page=2&page_size=100".to_string()))
        .with_status(200)
        .with_body(page_body(
            &["12.6.3-devel-ubuntu24.04", "12.6.2-devel-ubuntu20.04"],
            Some(page3),
        ))
        .expect(1)
        .create_async()
        .await;
    let third = server
        .mock("GET", TAGS_PATH)
        .match_query(Matcher::Exact("page=3&page_size=100".to_string()))
        .with_status(200)
        .with_body(page_body(&["11.8.0-base-ubuntu22.04"], None))
        .expect(1)
        .create_async()
        .await;

    let config = write_config(DISTROS);
    let resolver = resolver(settings(&server, &config));

    let default = resolver
        .resolve(Some("12.6"), None, ResolveOptions::default())
        .await
        .unwrap();
    let noetic = resolver
        .resolve(Some("12.6"), Some("noetic"), ResolveOptions::default())
        .await
        .unwrap();
    let humble = resolver
        .resolve(Some("11.8"), Some("humble"), ResolveOptions::default())
        .await
        .unwrap();

    assert_eq!(default.to_string(), "nvidia/cuda:12.6.3-devel-ubuntu24.04");
    assert_eq!(noetic.to_string(), "nvidia/cuda:12.6.2-devel-ubuntu20.04");
    assert_eq!(humble.to_string(), "nvidia/cuda:11.8.0-base-ubuntu22.04");

    first.assert_async().await;
    second.assert_async().await;
    third.assert_async().await;
}

#[tokio::test]
async fn failed_page_is_not_cached() {
    let mut server = Server::new_async().await;
    let page2 = format!("{}{TAGS_PATH}?page=2&page_size=100", server.url());

    let first = server
        .mock("GET", TAGS_PATH)
        .match_query(Matcher::Exact("page_size=100".to_string()))
        .with_status(200)
        .with_body(page_body(&["12.6.1-devel-ubuntu24.04"], Some(page2)))
        .expect(2)
        .create_async()
        .await;
    let second = server
        .mock("GET", TAGS_PATH)
        .match_query(Matcher::Exact("page=2&page_size=100".to_string()))
        .with_status(503)
        .expect(2)
        .create_async()
        .await;

    let config = write_config(DISTROS);
    let resolver = resolver(settings(&server, &config));

    for _ in 0..2 {
        let err = resolver
            .resolve(Some("12.6"), None, ResolveOptions::default())
            .await
            .unwrap_err();
        assert!(
            matches!(err, ResolveError::RegistryUnavailable(FetchError::Status { status: 503, .. })),
            "unexpected error {err:?}"
        );
        assert!(!err.is_not_found());
    }
    assert!(!resolver.catalog().is_populated());

    first.assert_async().await;
    second.assert_async().await;
}

#[tokio::test]
async fn no_cuda_never_touches_the_registry() {
    let mut server = Server::new_async().await;
    let listing = server
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let config = write_config(DISTROS);
    let resolver = resolver(settings(&server, &config));

    let image = resolver
        .resolve(Some("None"), Some("humble"), ResolveOptions::default())
        .await
        .unwrap();

    assert_eq!(image.to_string(), "ubuntu:22.04");
    listing.assert_async().await;
}

#[tokio::test]
async fn missing_tag_is_not_found() {
    let mut server = Server::new_async().await;
    let _listing = server
        .mock("GET", TAGS_PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(page_body(&["12.6.3-devel-ubuntu24.04"], None))
        .create_async()
        .await;

    let config = write_config(DISTROS);
    let resolver = resolver(settings(&server, &config));

    let err = resolver
        .resolve(Some("1222.1222"), None, ResolveOptions::default())
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(
        err.to_string(),
        "no matching CUDA image found for version 1222.1222 containing '-ubuntu24.04'"
    );
}

#[tokio::test]
async fn malformed_page_is_unavailable() {
    let mut server = Server::new_async().await;
    let _listing = server
        .mock("GET", TAGS_PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("<html>maintenance</html>")
        .create_async()
        .await;

    let source = HttpTagSource::default();
    let url = Url::parse(&format!("{}{TAGS_PATH}?page_size=100", server.url())).unwrap();

    let err = source.fetch_page(&url).await.unwrap_err();
    assert!(matches!(err, FetchError::Decode(_)));
}

#[test]
fn missing_config_file() {
    let settings = ResolverSettings {
        config_path: "/nonexistent/ros-versions.yaml".into(),
        ..ResolverSettings::default()
    };

    let err = BaseImageResolver::from_settings(settings).err().expect("config must be missing");
    assert!(matches!(err, ResolveError::ConfigNotFound { .. }));
}

#[test]
fn malformed_config_file() {
    let config = write_config("ros_versions: [noetic, humble]\n");
    let settings = ResolverSettings {
        config_path: config.path().to_path_buf(),
        ..ResolverSettings::default()
    };

    let err = BaseImageResolver::from_settings(settings).err().expect("config must be rejected");
    assert!(matches!(err, ResolveError::ConfigParse { .. }));
}
