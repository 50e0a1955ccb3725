// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{routing::get, Router};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    files::EntryKind,
    models::{
        DirectoryEntryResponse, DirectoryListing, Link, MountVolumeRequest, RootResponse,
        VolumeListResponse, VolumeSummary,
    },
    state::AppState,
};

pub mod files;
pub mod health;
pub mod links;
pub mod root;
pub mod volumes;

pub fn router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/", get(root::root))
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .route("/volumes", get(volumes::list_volumes))
        .route(
            "/volumes/{name}",
            get(volumes::get_volume)
                .put(volumes::mount_volume)
                .delete(volumes::unmount_volume),
        )
        .route("/volumes/{name}/files", get(files::browse_root))
        .route("/volumes/{name}/files/{*path}", get(files::browse_path))
        .with_state(state);

    routes
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        root::root,
        health::health,
        health::liveness,
        health::readiness,
        volumes::list_volumes,
        volumes::get_volume,
        volumes::mount_volume,
        volumes::unmount_volume,
        files::browse_root,
        files::browse_path
    ),
    components(
        schemas(
            Link,
            RootResponse,
            VolumeSummary,
            VolumeListResponse,
            MountVolumeRequest,
            DirectoryListing,
            DirectoryEntryResponse,
            EntryKind,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    tags(
        (name = "Root", description = "API entry point"),
        (name = "Health", description = "Liveness and readiness probes"),
        (name = "Volumes", description = "Volume discovery and mount lifecycle"),
        (name = "Files", description = "Browsing of mounted volumes")
    )
)]
struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::volumes::{
        testing::{FakeEngine, SAMPLE_FILE_CONTENTS, SAMPLE_FILE_NAME},
        MountSessions, VolumeRegistry,
    };
    use axum::{
        body::{to_bytes, Body},
        http::{Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use std::{fs, path::PathBuf, sync::Arc};
    use tempfile::TempDir;
    use tower::ServiceExt;

    struct TestApp {
        dir: TempDir,
        mount_root: PathBuf,
        engine: Arc<FakeEngine>,
        app: Router,
    }

    impl TestApp {
        fn new() -> Self {
            let dir = TempDir::new().expect("Failed to create temp dir");
            let volumes_dir = dir.path().join("volumes");
            fs::create_dir(&volumes_dir).unwrap();
            fs::write(volumes_dir.join("test"), b"encrypted container").unwrap();

            let engine = Arc::new(FakeEngine::new("foo"));
            let registry = VolumeRegistry::open(&volumes_dir, engine.clone()).unwrap();
            let mount_root = dir.path().join("mounts");
            let state = AppState::new(registry, MountSessions::new(&mount_root));

            Self {
                dir,
                mount_root,
                engine,
                app: router(state),
            }
        }

        async fn send(&self, method: Method, uri: &str, body: Body) -> (StatusCode, Vec<u8>) {
            let request = Request::builder()
                .method(method)
                .uri(uri)
                .header("content-type", "application/json")
                .body(body)
                .unwrap();
            let response = self.app.clone().oneshot(request).await.unwrap();
            let status = response.status();
            let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            (status, bytes.to_vec())
        }

        async fn json(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
            let body = body
                .map(|value| Body::from(value.to_string()))
                .unwrap_or_else(Body::empty);
            let (status, bytes) = self.send(method, uri, body).await;
            let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
            (status, value)
        }

        async fn mount(&self, password: &str) -> (StatusCode, Value) {
            self.json(
                Method::PUT,
                "/volumes/test",
                Some(json!({ "password": password })),
            )
            .await
        }

        fn leftover_mount_dirs(&self) -> usize {
            fs::read_dir(&self.mount_root)
                .map(|entries| entries.count())
                .unwrap_or(0)
        }
    }

    fn href(resource: &Value, rel: &str) -> Option<String> {
        resource["_links"]
            .as_array()?
            .iter()
            .find(|link| link["rel"] == rel)
            .and_then(|link| link["href"].as_str())
            .map(str::to_string)
    }

    #[tokio::test]
    async fn router_builds_with_all_routes() {
        let test = TestApp::new();
        let _ = test.app.clone().into_make_service();
    }

    #[tokio::test]
    async fn root_links_to_volumes() {
        let test = TestApp::new();
        let (status, body) = test.json(Method::GET, "/", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(href(&body, "volumes").as_deref(), Some("/volumes"));
    }

    #[tokio::test]
    async fn lists_discovered_volumes() {
        let test = TestApp::new();
        let (status, body) = test.json(Method::GET, "/volumes", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["volumes"].as_array().unwrap().len(), 1);
        assert_eq!(body["volumes"][0]["name"], "test");
        assert_eq!(body["volumes"][0]["mounted"], false);
        assert_eq!(href(&body, "self").as_deref(), Some("/volumes"));
    }

    #[tokio::test]
    async fn unknown_volume_is_404() {
        let test = TestApp::new();
        for (method, uri) in [
            (Method::GET, "/volumes/nope"),
            (Method::PUT, "/volumes/nope"),
            (Method::DELETE, "/volumes/nope"),
            (Method::GET, "/volumes/nope/files"),
            (Method::GET, "/volumes/nope/files/bar.txt"),
        ] {
            let (status, _) = test.json(method, uri, None).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        }
    }

    #[tokio::test]
    async fn mount_browse_unmount_scenario() {
        let test = TestApp::new();

        let (status, body) = test.json(Method::GET, "/volumes/test", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "test");
        assert_eq!(body["mounted"], false);
        assert_eq!(href(&body, "files"), None);

        let (status, body) = test.mount("foo").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["mounted"], true);
        let files = href(&body, "files").expect("files link once mounted");
        assert_eq!(files, "/volumes/test/files");

        let (status, listing) = test.json(Method::GET, &files, None).await;
        assert_eq!(status, StatusCode::OK);
        let contents = listing["contents"].as_array().unwrap();
        assert_eq!(contents.len(), 1);
        assert_eq!(contents[0]["name"], SAMPLE_FILE_NAME);
        assert_eq!(contents[0]["type"], "file");
        assert_eq!(contents[0]["size"], 11);
        assert!(contents[0]["modified"].as_str().unwrap().ends_with('Z'));
        assert_eq!(href(&listing, "self").as_deref(), Some("/volumes/test/files"));

        let file_href = href(&contents[0], "self").unwrap();
        assert_eq!(file_href, "/volumes/test/files/bar.txt");
        let (status, bytes) = test.send(Method::GET, &file_href, Body::empty()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(bytes, SAMPLE_FILE_CONTENTS);

        let (status, body) = test.json(Method::DELETE, "/volumes/test", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["mounted"], false);
        assert_eq!(test.leftover_mount_dirs(), 0);

        let (status, _) = test.json(Method::GET, "/volumes/test/files", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn wrong_password_is_401_and_leaves_nothing_behind() {
        let test = TestApp::new();

        let (status, body) = test.mount("wrong").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body["error"].is_string());

        let (_, body) = test.json(Method::GET, "/volumes/test", None).await;
        assert_eq!(body["mounted"], false);
        assert_eq!(test.leftover_mount_dirs(), 0);
    }

    #[tokio::test]
    async fn malformed_body_mounts_with_empty_password() {
        let test = TestApp::new();
        let (status, _) = test
            .send(Method::PUT, "/volumes/test", Body::from("not json"))
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(test.engine.mount_calls(), 1);
    }

    #[tokio::test]
    async fn mounting_twice_keeps_the_first_session() {
        let test = TestApp::new();
        test.mount("foo").await;

        let (status, body) = test.mount("anything").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["mounted"], true);
        assert_eq!(test.engine.mount_calls(), 1);
        assert_eq!(test.leftover_mount_dirs(), 1);
    }

    #[tokio::test]
    async fn unmounting_an_unmounted_volume_is_a_no_op() {
        let test = TestApp::new();
        let (status, body) = test.json(Method::DELETE, "/volumes/test", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["mounted"], false);
    }

    #[tokio::test]
    async fn failed_unmount_is_a_server_error() {
        let test = TestApp::new();
        test.mount("foo").await;
        test.engine.fail_unmounts(true);

        let (status, body) = test.json(Method::DELETE, "/volumes/test", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Encryption engine failure");

        let (_, body) = test.json(Method::GET, "/volumes/test", None).await;
        assert_eq!(body["mounted"], true);
    }

    #[tokio::test]
    async fn traversal_out_of_the_mount_is_400() {
        let test = TestApp::new();
        test.mount("foo").await;

        let (status, _) = test
            .json(Method::GET, "/volumes/test/files/%2E%2E/%2E%2E/etc/passwd", None)
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn missing_path_is_404() {
        let test = TestApp::new();
        test.mount("foo").await;

        let (status, _) = test
            .json(Method::GET, "/volumes/test/files/missing.txt", None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn nested_directories_link_to_their_children() {
        let test = TestApp::new();
        let (_, body) = test.mount("foo").await;
        assert_eq!(body["mounted"], true);

        let mount_dir = fs::read_dir(&test.mount_root)
            .unwrap()
            .next()
            .unwrap()
            .unwrap()
            .path();
        fs::create_dir_all(mount_dir.join("my docs/inner")).unwrap();
        fs::write(mount_dir.join("my docs/notes.md"), b"# notes").unwrap();

        let (status, listing) = test
            .json(Method::GET, "/volumes/test/files/my%20docs", None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            href(&listing, "self").as_deref(),
            Some("/volumes/test/files/my%20docs")
        );

        let contents = listing["contents"].as_array().unwrap();
        let names: Vec<_> = contents.iter().map(|c| c["name"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["inner", "notes.md"]);
        assert_eq!(contents[0]["type"], "directory");
        assert!(contents[0].get("size").is_none());
        assert_eq!(
            href(&contents[1], "self").as_deref(),
            Some("/volumes/test/files/my%20docs/notes.md")
        );
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let test = TestApp::new();
        let (status, body) = test.json(Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");

        let (status, _) = test.json(Method::GET, "/health/live", None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn health_degrades_when_volumes_dir_is_gone() {
        let test = TestApp::new();
        fs::remove_dir_all(test.dir.path().join("volumes")).unwrap();

        let (status, body) = test.json(Method::GET, "/health/ready", None).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "degraded");
        assert_eq!(body["checks"]["volumes_dir"], "unavailable");
        assert_eq!(body["checks"]["mount_root"], "ok");
    }

    #[tokio::test(flavor = "current_thread")]
    async fn browsing_runs_on_a_single_threaded_runtime() {
        let test = TestApp::new();
        test.mount("foo").await;

        let (listing, file) = tokio::join!(
            test.json(Method::GET, "/volumes/test/files", None),
            test.send(Method::GET, "/volumes/test/files/bar.txt", Body::empty()),
        );
        assert_eq!(listing.0, StatusCode::OK);
        assert_eq!(listing.1["contents"][0]["name"], SAMPLE_FILE_NAME);
        assert_eq!(file.0, StatusCode::OK);
        assert_eq!(file.1, SAMPLE_FILE_CONTENTS);
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let test = TestApp::new();
        let (status, body) = test.json(Method::GET, "/api-doc/openapi.json", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"]["/volumes/{name}"].is_object());
    }
}
