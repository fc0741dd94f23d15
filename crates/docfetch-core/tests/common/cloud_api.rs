//! Minimal HTTP/1.1 stand-in for the provider's admin API.
//!
//! Serves `POST /v1_1/demo/{rt}/download` from a fixed object list and
//! `GET /v1_1/demo/resources/{rt}/{dt}?prefix=..` as a prefix listing.
//! Requests without `key:secret` Basic credentials get a 401.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

pub const CLOUD_NAME: &str = "demo";
pub const API_KEY: &str = "key";
pub const API_SECRET: &str = "secret";

// base64("key:secret")
const EXPECTED_AUTH: &str = "Basic a2V5OnNlY3JldA==";

#[derive(Debug, Clone)]
pub struct StoredObject {
    pub resource_type: &'static str,
    pub delivery_type: &'static str,
    pub public_id: String,
    pub body: Vec<u8>,
}

pub fn object(
    resource_type: &'static str,
    delivery_type: &'static str,
    public_id: &str,
    body: &[u8],
) -> StoredObject {
    StoredObject {
        resource_type,
        delivery_type,
        public_id: public_id.to_string(),
        body: body.to_vec(),
    }
}

/// Handle to a running server: base URL plus the request log
/// (`"POST /v1_1/demo/raw/download"` style lines, query stripped).
pub struct CloudApi {
    pub base_url: String,
    log: Arc<Mutex<Vec<String>>>,
}

impl CloudApi {
    pub fn requests(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    pub fn count(&self, needle: &str) -> usize {
        self.requests().iter().filter(|r| r.contains(needle)).count()
    }
}

/// Starts the server in a background thread. It runs until the process exits.
pub fn start(objects: Vec<StoredObject>) -> CloudApi {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let objects = Arc::new(objects);
    let log = Arc::new(Mutex::new(Vec::new()));
    let server_log = Arc::clone(&log);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let objects = Arc::clone(&objects);
            let log = Arc::clone(&server_log);
            thread::spawn(move || handle(stream, &objects, &log));
        }
    });
    CloudApi {
        base_url: format!("http://127.0.0.1:{}", port),
        log,
    }
}

struct Request {
    method: String,
    path: String,
    query: HashMap<String, String>,
    headers: HashMap<String, String>,
    body: Vec<u8>,
}

fn read_request(stream: &mut TcpStream) -> Option<Request> {
    let mut data = Vec::new();
    let mut buf = [0u8; 4096];
    let header_end = loop {
        let n = stream.read(&mut buf).ok()?;
        if n == 0 {
            return None;
        }
        data.extend_from_slice(&buf[..n]);
        if let Some(pos) = data.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = std::str::from_utf8(&data[..header_end]).ok()?.to_string();
    let mut lines = head.lines();
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let target = request_line.next()?.to_string();

    let mut headers = HashMap::new();
    for line in lines {
        if let Some((name, value)) = line.split_once(':') {
            headers.insert(name.trim().to_ascii_lowercase(), value.trim().to_string());
        }
    }

    let content_length: usize = headers
        .get("content-length")
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);
    let mut body = data[header_end..].to_vec();
    while body.len() < content_length {
        let n = stream.read(&mut buf).ok()?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(&buf[..n]);
    }

    let (path, query) = match target.split_once('?') {
        Some((p, q)) => (p.to_string(), parse_pairs(q.as_bytes())),
        None => (target, HashMap::new()),
    };
    Some(Request {
        method,
        path,
        query,
        headers,
        body,
    })
}

fn parse_pairs(input: &[u8]) -> HashMap<String, String> {
    url::form_urlencoded::parse(input).into_owned().collect()
}

fn handle(mut stream: TcpStream, objects: &[StoredObject], log: &Mutex<Vec<String>>) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let request = match read_request(&mut stream) {
        Some(r) => r,
        None => return,
    };
    log.lock()
        .unwrap()
        .push(format!("{} {}", request.method, request.path));

    if request.headers.get("authorization").map(String::as_str) != Some(EXPECTED_AUTH) {
        write_json(&mut stream, "401 Unauthorized", &error_json("Invalid credentials"));
        return;
    }

    let segments: Vec<&str> = request.path.trim_start_matches('/').split('/').collect();
    match (request.method.as_str(), segments.as_slice()) {
        ("POST", ["v1_1", CLOUD_NAME, rt, "download"]) => {
            let form = parse_pairs(&request.body);
            let public_id = form.get("public_id").cloned().unwrap_or_default();
            let delivery_type = form.get("type").cloned().unwrap_or_default();
            let found = objects.iter().find(|o| {
                o.resource_type == *rt
                    && o.delivery_type == delivery_type
                    && o.public_id == public_id
            });
            match found {
                Some(o) => {
                    let head = format!(
                        "HTTP/1.1 200 OK\r\nContent-Type: application/pdf\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                        o.body.len()
                    );
                    let _ = stream.write_all(head.as_bytes());
                    let _ = stream.write_all(&o.body);
                }
                None => write_json(
                    &mut stream,
                    "404 Not Found",
                    &error_json(&format!("Resource not found - {}", public_id)),
                ),
            }
        }
        ("GET", ["v1_1", CLOUD_NAME, "resources", rt, dt]) => {
            let prefix = request.query.get("prefix").cloned().unwrap_or_default();
            let resources: Vec<serde_json::Value> = objects
                .iter()
                .filter(|o| {
                    o.resource_type == *rt && o.delivery_type == *dt && o.public_id.starts_with(&prefix)
                })
                .take(1)
                .map(|o| serde_json::json!({ "public_id": o.public_id }))
                .collect();
            write_json(
                &mut stream,
                "200 OK",
                &serde_json::json!({ "resources": resources }).to_string(),
            );
        }
        _ => write_json(&mut stream, "400 Bad Request", &error_json("unexpected request")),
    }
}

fn error_json(message: &str) -> String {
    serde_json::json!({ "error": { "message": message } }).to_string()
}

fn write_json(stream: &mut TcpStream, status: &str, body: &str) {
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes());
}
