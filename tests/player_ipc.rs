#![cfg(unix)]

use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::UnixListener;
use std::path::Path;
use std::thread;
use std::time::Duration;

use kiosk_player::player::{PlayerClient, SeekMode};
use serde_json::{json, Value};

/// Serve one connection: read each request, answer with `reply(request)`
/// lines, and return every request seen.
fn serve<F>(path: &Path, mut reply: F) -> thread::JoinHandle<Vec<Value>>
where
    F: FnMut(&Value) -> Vec<String> + Send + 'static,
{
    let listener = UnixListener::bind(path).unwrap();
    thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut writer = stream.try_clone().unwrap();
        let reader = BufReader::new(stream);
        let mut seen = Vec::new();
        for line in reader.lines() {
            let Ok(line) = line else { break };
            let request: Value = serde_json::from_str(&line).unwrap();
            for out in reply(&request) {
                writer.write_all(out.as_bytes()).unwrap();
                writer.write_all(b"\n").unwrap();
            }
            seen.push(request);
        }
        seen
    })
}

#[test]
fn replies_are_matched_by_request_id() {
    let dir = tempfile::tempdir().unwrap();
    let socket = dir.path().join("mpv.sock");
    let server = serve(&socket, |request| {
        let id = request["request_id"].as_u64().unwrap();
        vec![
            r#"{"event":"playback-restart"}"#.to_string(),
            "not json at all".to_string(),
            json!({"request_id": id + 100, "error": "success", "data": "stale"}).to_string(),
            json!({"request_id": id, "error": "success", "data": 12.5}).to_string(),
        ]
    });

    let mut client = PlayerClient::connect(&socket, Duration::from_secs(2)).unwrap();
    assert_eq!(client.get_property("time-pos").unwrap(), json!(12.5));
    client.seek(-5.0, SeekMode::Relative).unwrap();
    drop(client);

    let seen = server.join().unwrap();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0]["command"], json!(["get_property", "time-pos"]));
    assert_eq!(seen[1]["command"], json!(["seek", -5.0, "relative"]));
    assert_ne!(seen[0]["request_id"], seen[1]["request_id"]);
}

#[test]
fn player_errors_are_surfaced() {
    let dir = tempfile::tempdir().unwrap();
    let socket = dir.path().join("mpv.sock");
    let server = serve(&socket, |request| {
        let id = request["request_id"].as_u64().unwrap();
        vec![json!({"request_id": id, "error": "property not found"}).to_string()]
    });

    let mut client = PlayerClient::connect(&socket, Duration::from_secs(2)).unwrap();
    let err = client.set_property("nonsense", json!(1)).unwrap_err();
    assert!(err.to_string().contains("property not found"));
    drop(client);
    server.join().unwrap();
}

#[test]
fn load_and_pause_send_the_expected_commands() {
    let dir = tempfile::tempdir().unwrap();
    let socket = dir.path().join("mpv.sock");
    let server = serve(&socket, |request| {
        let id = request["request_id"].as_u64().unwrap();
        vec![json!({"request_id": id, "error": "success"}).to_string()]
    });

    let mut client = PlayerClient::connect(&socket, Duration::from_secs(2)).unwrap();
    client.load_file(Path::new("/media/intro.mkv")).unwrap();
    client.set_paused(false).unwrap();
    client.stop().unwrap();
    drop(client);

    let seen = server.join().unwrap();
    assert_eq!(
        seen[0]["command"],
        json!(["loadfile", "/media/intro.mkv", "replace"])
    );
    assert_eq!(seen[1]["command"], json!(["set_property", "pause", false]));
    assert_eq!(seen[2]["command"], json!(["stop"]));
}

#[test]
fn missing_socket_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(PlayerClient::connect(&dir.path().join("absent.sock"), Duration::from_millis(100)).is_err());
}

#[test]
fn closed_connection_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let socket = dir.path().join("mpv.sock");
    let listener = UnixListener::bind(&socket).unwrap();
    let server = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream);
        let mut line = String::new();
        reader.read_line(&mut line).unwrap();
    });

    let mut client = PlayerClient::connect(&socket, Duration::from_secs(2)).unwrap();
    assert!(client.stop().is_err());
    server.join().unwrap();
}
