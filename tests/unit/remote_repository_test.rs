//! Unit tests for the HTTP remote repository.
//!
//! A throwaway HTTP/1.1 server on a local port answers each path with a
//! canned status and body, so the tests cover decoding and error mapping
//! without reaching the real API.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use author_details::services::remote_repository::{HttpRemoteRepository, RemoteRepository};
use author_details::types::errors::NetworkError;
use author_details::types::settings::ApiSettings;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

struct CannedServer {
    base: String,
    requests: Arc<Mutex<Vec<String>>>,
}

/// Serves `routes` (path -> (status, body)); unknown paths get a 404.
async fn serve(routes: Vec<(&'static str, u16, &'static str)>) -> CannedServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let routes: HashMap<&str, (u16, &str)> =
        routes.into_iter().map(|(p, s, b)| (p, (s, b))).collect();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let seen = requests.clone();

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                match socket.read(&mut chunk).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => buf.extend_from_slice(&chunk[..n]),
                }
            }
            let head = String::from_utf8_lossy(&buf).to_string();
            let path = head.split_whitespace().nth(1).unwrap_or("/").to_string();
            seen.lock().unwrap().push(head);

            let (status, body) = routes.get(path.as_str()).copied().unwrap_or((404, "{}"));
            let response = format!(
                "HTTP/1.1 {} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });

    CannedServer { base, requests }
}

fn client() -> HttpRemoteRepository {
    HttpRemoteRepository::new(&ApiSettings::default()).expect("client should build")
}

#[tokio::test]
async fn test_fetch_repos_decodes_list_in_order() {
    let server = serve(vec![(
        "/users/octocat/repos",
        200,
        r#"[{"name":"hello-world","description":"first","html_url":"https://github.test/h","stargazers_count":3},
            {"name":"spoon-knife","description":null}]"#,
    )])
    .await;

    let repos = client()
        .fetch_repos(&format!("{}/users/octocat/repos", server.base))
        .await
        .unwrap();

    let names: Vec<&str> = repos.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["hello-world", "spoon-knife"]);
    assert_eq!(repos[0].description.as_deref(), Some("first"));
    assert_eq!(repos[1].description, None);
    assert_eq!(repos[1].html_url, None);
}

#[tokio::test]
async fn test_fetch_followers_counts_entries() {
    let server = serve(vec![(
        "/users/octocat/subscriptions",
        200,
        r#"[{"id":1,"name":"a"},{"id":2,"name":"b"},{"id":3}]"#,
    )])
    .await;

    let followers = client()
        .fetch_followers(&format!("{}/users/octocat/subscriptions", server.base))
        .await
        .unwrap();

    assert_eq!(followers.len(), 3);
    assert_eq!(followers[0].login, "a");
    assert_eq!(followers[2].login, "");
}

#[tokio::test]
async fn test_empty_array_is_ok() {
    let server = serve(vec![("/users/octocat/repos", 200, "[]")]).await;

    let repos = client()
        .fetch_repos(&format!("{}/users/octocat/repos", server.base))
        .await
        .unwrap();
    assert!(repos.is_empty());
}

#[tokio::test]
async fn test_non_success_status_maps_to_status_error() {
    let server = serve(vec![("/users/ghost/repos", 404, r#"{"message":"Not Found"}"#)]).await;

    let err = client()
        .fetch_repos(&format!("{}/users/ghost/repos", server.base))
        .await
        .unwrap_err();
    assert_eq!(err, NetworkError::Status(404));
}

#[tokio::test]
async fn test_rate_limited_status_maps_to_status_error() {
    let server = serve(vec![("/users/octocat/subscriptions", 403, "{}")]).await;

    let err = client()
        .fetch_followers(&format!("{}/users/octocat/subscriptions", server.base))
        .await
        .unwrap_err();
    assert_eq!(err, NetworkError::Status(403));
}

#[tokio::test]
async fn test_malformed_body_maps_to_decode_error() {
    let server = serve(vec![("/users/octocat/repos", 200, r#"{"not":"a list"}"#)]).await;

    let err = client()
        .fetch_repos(&format!("{}/users/octocat/repos", server.base))
        .await
        .unwrap_err();
    assert!(matches!(err, NetworkError::Decode(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_unreachable_host_maps_to_request_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client()
        .fetch_repos(&format!("http://{}/users/octocat/repos", addr))
        .await
        .unwrap_err();
    assert!(matches!(err, NetworkError::Request(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_requests_carry_configured_headers() {
    let server = serve(vec![("/users/octocat/repos", 200, "[]")]).await;
    let settings = ApiSettings {
        user_agent: "details-test/1.0".to_string(),
        ..ApiSettings::default()
    };

    HttpRemoteRepository::new(&settings)
        .unwrap()
        .fetch_repos(&format!("{}/users/octocat/repos", server.base))
        .await
        .unwrap();

    let requests = server.requests.lock().unwrap();
    let head = requests[0].to_ascii_lowercase();
    assert!(head.contains("user-agent: details-test/1.0"));
    assert!(head.contains("accept: application/vnd.github+json"));
}

#[tokio::test]
async fn test_shared_client_is_used_as_given() {
    let server = serve(vec![("/users/octocat/subscriptions", 200, "[{}]")]).await;
    let client = reqwest::Client::builder()
        .user_agent("shared-client/1.0")
        .build()
        .unwrap();

    let followers = HttpRemoteRepository::with_client(client)
        .fetch_followers(&format!("{}/users/octocat/subscriptions", server.base))
        .await
        .unwrap();
    assert_eq!(followers.len(), 1);

    let requests = server.requests.lock().unwrap();
    let head = requests[0].to_ascii_lowercase();
    assert!(head.contains("user-agent: shared-client/1.0"));
    assert!(!head.contains("application/vnd.github+json"));
}

#[test]
fn test_invalid_accept_header_is_rejected() {
    let settings = ApiSettings {
        accept: "bad\nheader".to_string(),
        ..ApiSettings::default()
    };
    let err = HttpRemoteRepository::new(&settings).err().expect("should fail");
    assert!(matches!(err, NetworkError::Request(_)));
}
