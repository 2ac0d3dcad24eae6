//! # Questsmith Serve Command Integration Tests
//!
//! File: cli/tests/serve.rs
//!
//! Starts the real binary with `serve --offline` on a free local port and
//! talks to it over plain HTTP/1.1.
//!

mod common;
use common::*;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::process::{Child, Command as StdCommand, Stdio};
use std::thread;
use std::time::Duration;

/// Kills the server when the test ends, pass or fail.
struct ServerGuard(Child);

impl Drop for ServerGuard {
    fn drop(&mut self) {
        let _ = self.0.kill();
        let _ = self.0.wait();
    }
}

fn free_port() -> u16 {
    TcpListener::bind("127.0.0.1:0")
        .and_then(|l| l.local_addr())
        .expect("Failed to reserve a local port")
        .port()
}

fn start_server(sandbox: &std::path::Path, port: u16) -> ServerGuard {
    let child = StdCommand::new(assert_cmd::cargo::cargo_bin("questsmith"))
        .args(["serve", "--offline", "--seed", "3", "--port", &port.to_string()])
        .current_dir(sandbox)
        .env("HOME", sandbox)
        .env("XDG_CONFIG_HOME", sandbox.join(".config"))
        .env_remove("HUGGINGFACE_TOKEN")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .expect("Failed to start questsmith serve");
    ServerGuard(child)
}

fn request(port: u16, raw: &str) -> String {
    for _ in 0..100 {
        if let Ok(mut stream) = TcpStream::connect(("127.0.0.1", port)) {
            stream.write_all(raw.as_bytes()).unwrap();
            let mut response = String::new();
            stream.read_to_string(&mut response).unwrap();
            return response;
        }
        thread::sleep(Duration::from_millis(100));
    }
    panic!("server on port {} never accepted a connection", port);
}

fn post_json(port: u16, path: &str, body: &str) -> String {
    request(
        port,
        &format!(
            "POST {} HTTP/1.1\r\nHost: localhost\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            path,
            body.len(),
            body
        ),
    )
}

fn get(port: u16, path: &str) -> String {
    request(
        port,
        &format!("GET {} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n", path),
    )
}

#[test]
fn test_serve_end_to_end() {
    let dir = sandbox();
    let port = free_port();
    let _server = start_server(dir.path(), port);

    let response = post_json(port, "/generate", r#"{"prompt": "dragon"}"#);
    assert!(response.starts_with("HTTP/1.1 200"), "{}", response);
    assert!(response.contains(DRAGON_QUEST));
    assert!(response.contains("\"elapsed_time\""));

    let response = post_json(port, "/generate_quest", r#"{"prompt": "forest"}"#);
    assert!(response.starts_with("HTTP/1.1 200"), "{}", response);
    assert!(response.contains(FOREST_QUEST));

    let response = post_json(port, "/generate", r#"{"prompt": ""}"#);
    assert!(response.starts_with("HTTP/1.1 400"), "{}", response);
    assert!(response.contains("Prompt is required"));

    let response = get(port, "/status");
    assert!(response.starts_with("HTTP/1.1 200"), "{}", response);
    assert!(response.contains("\"total_requests\":2"));
    assert!(response.contains("\"loaded\":false"));

    let response = get(port, "/");
    assert!(response.starts_with("HTTP/1.1 200"), "{}", response);
    assert!(response.contains("<form"));
}
