//! HTTP surface: health, deck upload, static files, session inspection.

#![allow(clippy::panic)]

mod common;

use common::{next_json, spawn_server, spawn_server_with};
use reqwest::multipart::{Form, Part};
use serde_json::{Value, json};

async fn json_body(response: reqwest::Response) -> Value {
    let Ok(body) = response.json::<Value>().await else {
        panic!("body is not JSON");
    };
    body
}

fn deck_form(name: &str, bytes: &'static [u8]) -> Form {
    Form::new().part("pdf", Part::bytes(bytes).file_name(name.to_owned()))
}

#[tokio::test]
async fn health_reports_ok() {
    let server = spawn_server().await;
    let Ok(response) = reqwest::get(server.http_url("/health")).await else {
        panic!("request failed");
    };
    assert_eq!(response.status().as_u16(), 200);
    let body = json_body(response).await;
    assert_eq!(body["ok"], true);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn upload_publishes_deck_to_room() {
    let server = spawn_server().await;
    let mut host = server.connect_host("ABC123").await;
    let (mut viewer, _) = server.connect_viewer("abc123").await;
    let _ = next_json(&mut host).await;

    let client = reqwest::Client::new();
    let form = deck_form("lecture.pdf", b"%PDF-1.7 test").text("pageCount", "10");
    let Ok(response) = client
        .post(server.http_url("/upload?code=ABC123"))
        .multipart(form)
        .send()
        .await
    else {
        panic!("upload failed");
    };
    assert_eq!(response.status().as_u16(), 200);
    let body = json_body(response).await;
    assert_eq!(body["displayName"], "lecture.pdf");
    assert_eq!(body["pageCount"], 10);
    let Some(url) = body["url"].as_str() else {
        panic!("url missing");
    };
    assert!(url.starts_with(&server.http_url("/files/")));

    assert_eq!(
        next_json(&mut viewer).await,
        json!({
            "type": "deck-change",
            "url": url,
            "displayName": "lecture.pdf",
            "pageCount": 10
        })
    );
    assert_eq!(
        next_json(&mut viewer).await,
        json!({"type": "page-change", "page": 1, "pageCount": 10})
    );

    let (_late, sync) = server.connect_viewer("abc123").await;
    assert_eq!(sync["deck"]["url"], url);
    assert_eq!(sync["pageCount"], 10);

    let Ok(file) = reqwest::get(url).await else {
        panic!("file fetch failed");
    };
    assert_eq!(file.status().as_u16(), 200);
    let Ok(bytes) = file.bytes().await else {
        panic!("file body");
    };
    assert_eq!(bytes.as_ref(), b"%PDF-1.7 test");
}

#[tokio::test]
async fn upload_accepts_page_count_in_query() {
    let server = spawn_server().await;
    let client = reqwest::Client::new();
    let Ok(response) = client
        .post(server.http_url("/upload?code=q1&numPages=4"))
        .multipart(deck_form("q.pdf", b"%PDF"))
        .send()
        .await
    else {
        panic!("upload failed");
    };
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(json_body(response).await["pageCount"], 4);
}

#[tokio::test]
async fn upload_is_not_bound_by_the_rest_timeout() {
    let server = spawn_server_with(|config| config.request_timeout_secs = 0).await;
    let client = reqwest::Client::new();
    let Ok(response) = client
        .post(server.http_url("/upload?code=slow&pageCount=2"))
        .multipart(deck_form("slow.pdf", b"%PDF-1.7 slow link"))
        .send()
        .await
    else {
        panic!("upload failed");
    };
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(json_body(response).await["displayName"], "slow.pdf");
}

#[tokio::test]
async fn upload_without_code_is_rejected() {
    let server = spawn_server().await;
    let client = reqwest::Client::new();
    let Ok(response) = client
        .post(server.http_url("/upload"))
        .multipart(deck_form("a.pdf", b"%PDF"))
        .send()
        .await
    else {
        panic!("request failed");
    };
    assert_eq!(response.status().as_u16(), 400);
    let body = json_body(response).await;
    assert_eq!(body["error"]["message"], "missing session code");

    let Ok(mut entries) = tokio::fs::read_dir(server.uploads.path()).await else {
        panic!("uploads dir");
    };
    let Ok(first) = entries.next_entry().await else {
        panic!("read uploads dir");
    };
    assert!(first.is_none());
}

#[tokio::test]
async fn upload_without_file_is_rejected() {
    let server = spawn_server().await;
    let client = reqwest::Client::new();
    let Ok(response) = client
        .post(server.http_url("/upload?code=nofile"))
        .multipart(Form::new().text("pageCount", "3"))
        .send()
        .await
    else {
        panic!("request failed");
    };
    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(json_body(response).await["error"]["message"], "missing file");
}

#[tokio::test]
async fn sessions_endpoint_lists_live_rooms() {
    let server = spawn_server().await;
    let _host = server.connect_host("zeta").await;
    let (_viewer, _) = server.connect_viewer("alpha").await;

    let Ok(response) = reqwest::get(server.http_url("/api/v1/sessions")).await else {
        panic!("request failed");
    };
    let body = json_body(response).await;
    let codes: Vec<&str> = body["data"]
        .as_array()
        .map(|rooms| rooms.iter().filter_map(|r| r["code"].as_str()).collect())
        .unwrap_or_default();
    assert_eq!(codes, vec!["ALPHA", "ZETA"]);
    assert_eq!(body["pagination"]["total"], 2);

    let Ok(response) = reqwest::get(server.http_url("/api/v1/sessions/ZeTa")).await else {
        panic!("request failed");
    };
    let body = json_body(response).await;
    assert_eq!(body["hostConnected"], true);
    assert_eq!(body["viewerCount"], 0);

    let Ok(response) = reqwest::get(server.http_url("/api/v1/sessions/missing")).await else {
        panic!("request failed");
    };
    assert_eq!(response.status().as_u16(), 404);
}
