// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, anyhow};
use gallery_app::ArtworkId;
use gallery_catalog::Client;
use std::thread;
use std::time::Duration;
use tiny_http::{Header, Response, Server};

fn json_response(body: &str, status: u16) -> Response<std::io::Cursor<Vec<u8>>> {
    Response::from_string(body)
        .with_status_code(status)
        .with_header(
            Header::from_bytes("Content-Type", "application/json")
                .expect("valid content type header"),
        )
}

#[test]
fn unreachable_catalog_reports_connection_error() {
    let client = Client::new("http://127.0.0.1:1/api/v1", Duration::from_millis(50))
        .expect("client should initialize");

    let error = client
        .fetch_page(0, 5)
        .expect_err("fetch should fail for unreachable endpoint");
    let message = error.to_string();
    assert!(
        message.contains("cannot reach") || message.contains("timed out"),
        "unexpected message: {message}"
    );
}

#[test]
fn fetch_page_decodes_records_and_total() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}/api/v1", server.server_addr());

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        assert_eq!(request.url(), "/api/v1/artworks?page=2&limit=3");
        let body = r#"{
            "pagination": {"total": 128019, "limit": 3, "current_page": 2},
            "data": [
                {"id": 4, "title": "Priest and Boy", "place_of_origin": "Peru",
                 "artist_display": "Moche", "inscriptions": null,
                 "date_start": 100, "date_end": 500},
                {"id": 16568, "title": "Water Lilies", "place_of_origin": "France",
                 "artist_display": "Claude Monet", "inscriptions": "Signed",
                 "date_start": 1906, "date_end": 1906},
                {"id": 27992, "title": "A Sunday on La Grande Jatte"}
            ]
        }"#;
        request
            .respond(json_response(body, 200))
            .expect("response should succeed");
    });

    let client = Client::new(&addr, Duration::from_secs(1))?;
    let page = client.fetch_page(1, 3)?;
    assert_eq!(page.total, 128_019);
    assert_eq!(
        page.ids(),
        vec![
            ArtworkId::new(4),
            ArtworkId::new(16568),
            ArtworkId::new(27992)
        ]
    );
    assert_eq!(page.records[1].artist_display.as_deref(), Some("Claude Monet"));
    assert_eq!(page.records[0].inscriptions, None);
    assert_eq!(page.records[2].date_end, None);

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn non_success_status_surfaces_server_detail() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}/api/v1", server.server_addr());

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        let body = r#"{"status":403,"error":"Invalid limit","detail":"You have requested too many resources per page."}"#;
        request
            .respond(json_response(body, 403))
            .expect("response should succeed");
    });

    let client = Client::new(&addr, Duration::from_secs(1))?;
    let error = client
        .fetch_page(0, 1000)
        .expect_err("403 should be a failure");
    let message = error.to_string();
    assert!(message.contains("403"), "unexpected message: {message}");
    assert!(message.contains("too many resources"));

    handle.join().expect("server thread should join");
    Ok(())
}

#[test]
fn malformed_body_is_a_decode_failure() -> Result<()> {
    let server =
        Server::http("127.0.0.1:0").map_err(|error| anyhow!("start mock server: {error}"))?;
    let addr = format!("http://{}/api/v1", server.server_addr());

    let handle = thread::spawn(move || {
        let request = server.recv().expect("request expected");
        request
            .respond(json_response(r#"{"data": "nope"}"#, 200))
            .expect("response should succeed");
    });

    let client = Client::new(&addr, Duration::from_secs(1))?;
    let error = client
        .fetch_page(0, 5)
        .expect_err("malformed body should fail");
    assert!(error.to_string().contains("decode artworks page"));

    handle.join().expect("server thread should join");
    Ok(())
}
