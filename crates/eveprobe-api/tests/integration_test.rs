use std::collections::BTreeSet;

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use eveprobe_api::{EveClient, EveSession};
use eveprobe_config::{ConnectionConfig, Protocol};
use eveprobe_core::{LabId, ProbeError, Subsystem};

fn connection(server: &MockServer) -> ConnectionConfig {
    let address = server.address();
    ConnectionConfig {
        hostname: address.ip().to_string(),
        username: "admin".to_string(),
        password: "eve".to_string(),
        protocol: Protocol::Http,
        port: Some(address.port()),
    }
}

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 200,
            "status": "success",
            "message": "User logged in (90013)."
        })))
        .mount(server)
        .await;
}

async fn login(server: &MockServer) -> EveSession {
    EveClient::new(&connection(server))
        .expect("client construction")
        .login()
        .await
        .expect("login")
}

#[tokio::test]
async fn login_sends_credentials_and_later_calls_replay_the_cookie() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({"username": "admin", "password": "eve"})))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "unetlab_session=abc123; Path=/")
                .set_body_json(json!({"code": 200, "status": "success"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/status"))
        .and(header("cookie", "unetlab_session=abc123"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": {"qemu": 1}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let session = login(&server).await;
    let status = session.subsystem_status().await.expect("status");
    assert_eq!(status.qemu, Some(1.0));
}

#[tokio::test]
async fn login_failure_is_an_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "code": 400,
            "status": "fail",
            "message": "Invalid login (90011)."
        })))
        .mount(&server)
        .await;

    let client = EveClient::new(&connection(&server)).expect("client construction");
    let err = client.login().await.unwrap_err();
    assert!(matches!(err, ProbeError::Auth(_)));
    assert_eq!(
        err.to_string(),
        "login failed: remote API error (status 400): Invalid login (90011)."
    );
}

#[tokio::test]
async fn non_json_error_bodies_fall_back_to_the_status_code() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = EveClient::new(&connection(&server)).expect("client construction");
    let err = client.login().await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "login failed: remote API error (status 500): status 500"
    );
}

#[tokio::test]
async fn logout_hits_the_endpoint_once() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/auth/logout"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 200,
            "status": "success",
            "message": "User logged out (90009)."
        })))
        .expect(1)
        .mount(&server)
        .await;

    let session = login(&server).await;
    session.logout().await.expect("logout");
}

#[tokio::test]
async fn subsystem_status_skips_null_and_missing_counters() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 200,
            "status": "success",
            "data": {
                "iol": null,
                "dynamips": 2,
                "qemu": 13,
                "vpcs": 0,
                "version": "5.0.1-13"
            }
        })))
        .mount(&server)
        .await;

    let session = login(&server).await;
    let status = session.subsystem_status().await.expect("status");
    assert_eq!(status.iol, None);
    assert_eq!(status.docker, None);
    assert_eq!(
        status.gauges(),
        vec![
            (Subsystem::Dynamips, 2.0),
            (Subsystem::Qemu, 13.0),
            (Subsystem::Vpcs, 0.0),
        ]
    );
}

#[tokio::test]
async fn catalog_walks_subfolders_skips_parent_links_and_dedups() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/folders/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "folders": [
                    {"name": "..", "path": "/"},
                    {"name": "datacenter", "path": "/datacenter"}
                ],
                "labs": [{"file": "edge.unl", "path": "/edge.unl"}]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/folders/datacenter"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "folders": [{"name": "..", "path": "/"}],
                "labs": [
                    {"file": "core.unl", "path": "/datacenter/core.unl"},
                    {"file": "edge.unl", "path": "/edge.unl"}
                ]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let session = login(&server).await;
    let labs = session.list_all_labs().await.expect("catalog");
    let expected: BTreeSet<LabId> = ["datacenter/core", "edge"]
        .iter()
        .map(|name| LabId::new(*name))
        .collect();
    assert_eq!(labs, expected);
}

#[tokio::test]
async fn catalog_is_independent_of_listing_order() {
    async fn tree(first: &str, second: &str) -> MockServer {
        let server = MockServer::start().await;
        mount_login(&server).await;
        Mock::given(method("GET"))
            .and(path("/api/folders/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {
                    "folders": [
                        {"name": first, "path": format!("/{first}")},
                        {"name": second, "path": format!("/{second}")}
                    ],
                    "labs": []
                }
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/folders/east"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {
                    "folders": [],
                    "labs": [
                        {"file": "x.unl", "path": "/east/x.unl"},
                        {"file": "shared.unl", "path": "/shared.unl"}
                    ]
                }
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/folders/west"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {
                    "folders": [],
                    "labs": [
                        {"file": "y.unl", "path": "/west/y.unl"},
                        {"file": "shared.unl", "path": "/shared.unl"}
                    ]
                }
            })))
            .mount(&server)
            .await;
        server
    }

    let forward = tree("east", "west").await;
    let reverse = tree("west", "east").await;

    let labs_forward = login(&forward).await.list_all_labs().await.expect("catalog");
    let labs_reverse = login(&reverse).await.list_all_labs().await.expect("catalog");
    assert_eq!(labs_forward, labs_reverse);
    assert_eq!(labs_forward.len(), 3);
}

#[tokio::test]
async fn a_folder_listed_inside_itself_is_fetched_only_once() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/folders/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "folders": [{"name": "loop", "path": "/loop"}],
                "labs": [{"file": "edge.unl", "path": "/edge.unl"}]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/folders/loop"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "folders": [
                    {"name": "..", "path": "/"},
                    {"name": "loop", "path": "/loop"}
                ],
                "labs": [{"file": "inner.unl", "path": "/loop/inner.unl"}]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let session = login(&server).await;
    let labs = session.list_all_labs().await.expect("catalog");
    let expected: BTreeSet<LabId> = ["edge", "loop/inner"]
        .iter()
        .map(|name| LabId::new(*name))
        .collect();
    assert_eq!(labs, expected);
}

#[tokio::test]
async fn traversal_failure_names_the_offending_folder() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/folders/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "folders": [{"name": "broken", "path": "/broken"}],
                "labs": []
            }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/folders/broken"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let session = login(&server).await;
    let err = session.list_all_labs().await.unwrap_err();
    assert!(matches!(err, ProbeError::Folder { .. }));
    assert!(err.to_string().contains("failed to list folder '/broken'"));
}

#[tokio::test]
async fn missing_lab_is_a_distinguished_error() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/labs/ghost.unl/nodes"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "code": 404,
            "status": "fail",
            "message": "Lab does not exist (60022)."
        })))
        .mount(&server)
        .await;

    let session = login(&server).await;
    let err = session.lab_nodes(&LabId::new("ghost")).await.unwrap_err();
    assert!(err.is_lab_not_found());
    assert_eq!(err.to_string(), "lab 'ghost' does not exist");
}

#[tokio::test]
async fn other_remote_errors_stay_generic() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/labs/flaky.unl/nodes"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "code": 500,
            "status": "fail",
            "message": "Internal server error"
        })))
        .mount(&server)
        .await;

    let session = login(&server).await;
    let err = session.lab_nodes(&LabId::new("flaky")).await.unwrap_err();
    assert!(!err.is_lab_not_found());
    assert!(matches!(err, ProbeError::Remote { status: 500, .. }));
}

#[tokio::test]
async fn node_listing_decodes_and_percent_escapes_the_lab_path() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/labs/dc/my%20lab.unl/nodes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 200,
            "status": "success",
            "data": {
                "1": {"name": "R1", "status": 2, "uuid": "aaa", "image": "iol:L3"},
                "2": {"name": "R2", "status": 0, "uuid": "bbb", "image": "qemu:vios"}
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let session = login(&server).await;
    let nodes = session
        .lab_nodes(&LabId::new("dc/my lab"))
        .await
        .expect("nodes");
    assert_eq!(nodes.len(), 2);
    assert!(nodes["1"].is_up());
    assert!(!nodes["2"].is_up());
    assert_eq!(nodes["2"].image, "qemu:vios");
}

#[tokio::test]
async fn array_shaped_node_listing_is_a_decode_error() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/labs/empty.unl/nodes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 200,
            "status": "success",
            "data": []
        })))
        .mount(&server)
        .await;

    let session = login(&server).await;
    let err = session.lab_nodes(&LabId::new("empty")).await.unwrap_err();
    assert!(matches!(err, ProbeError::Decode { .. }));
    assert!(err.to_string().contains("node listing of lab 'empty'"));
}
