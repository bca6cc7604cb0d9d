//! Minimal HTTP/1.1 server standing in for the processing service in integration tests.
//!
//! Accepts any POST, records the request, and answers with a fixed status,
//! optional Content-Disposition and body.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Reply {
    pub status: &'static str,
    /// Raw header value bytes; need not be UTF-8.
    pub content_disposition: Option<Vec<u8>>,
    pub body: Vec<u8>,
}

impl Reply {
    pub fn ok(content_disposition: Option<&str>, body: &[u8]) -> Self {
        Self {
            status: "200 OK",
            content_disposition: content_disposition.map(|d| d.as_bytes().to_vec()),
            body: body.to_vec(),
        }
    }

    /// 200 with a Content-Disposition sent byte-for-byte.
    pub fn ok_raw_disposition(content_disposition: &[u8], body: &[u8]) -> Self {
        Self {
            status: "200 OK",
            content_disposition: Some(content_disposition.to_vec()),
            body: body.to_vec(),
        }
    }

    pub fn status(status: &'static str) -> Self {
        Self {
            status,
            content_disposition: None,
            body: b"Invalid process type".to_vec(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub content_type: String,
    pub body: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartPart {
    pub name: String,
    pub filename: Option<String>,
    pub data: Vec<u8>,
}

impl RecordedRequest {
    /// Split a `multipart/form-data` body into its parts.
    pub fn multipart(&self) -> Vec<MultipartPart> {
        let boundary = self
            .content_type
            .split(';')
            .filter_map(|p| p.trim().strip_prefix("boundary="))
            .next()
            .expect("multipart boundary")
            .trim_matches('"')
            .to_string();
        let delimiter = format!("--{}", boundary);

        let mut parts = Vec::new();
        for chunk in split_bytes(&self.body, delimiter.as_bytes()).into_iter().skip(1) {
            if chunk.starts_with(b"--") {
                break;
            }
            let chunk = chunk.strip_prefix(b"\r\n").unwrap_or(chunk);
            let header_end = find(chunk, b"\r\n\r\n").expect("part headers");
            let headers = String::from_utf8_lossy(&chunk[..header_end]).into_owned();
            let mut data = chunk[header_end + 4..].to_vec();
            if data.ends_with(b"\r\n") {
                data.truncate(data.len() - 2);
            }
            let disposition = headers
                .lines()
                .find(|l| l.to_ascii_lowercase().starts_with("content-disposition"))
                .expect("part content-disposition")
                .to_string();
            parts.push(MultipartPart {
                name: param(&disposition, "name").expect("part name"),
                filename: param(&disposition, "filename"),
                data,
            });
        }
        parts
    }
}

fn param(header: &str, key: &str) -> Option<String> {
    header.split(';').find_map(|p| {
        let (k, v) = p.trim().split_once('=')?;
        (k == key).then(|| v.trim_matches('"').to_string())
    })
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn split_bytes<'a>(mut haystack: &'a [u8], delimiter: &[u8]) -> Vec<&'a [u8]> {
    let mut out = Vec::new();
    while let Some(i) = find(haystack, delimiter) {
        out.push(&haystack[..i]);
        haystack = &haystack[i + delimiter.len()..];
    }
    out.push(haystack);
    out
}

pub struct ProcessServer {
    /// Base URL, e.g. "http://127.0.0.1:12345".
    pub url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl ProcessServer {
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

/// Starts a server in a background thread answering every request with `reply`.
/// The server runs until the process exits.
pub fn start(reply: Reply) -> ProcessServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&requests);
    let reply = Arc::new(reply);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let reply = Arc::clone(&reply);
            let recorded = Arc::clone(&recorded);
            thread::spawn(move || handle(stream, &reply, &recorded));
        }
    });
    ProcessServer {
        url: format!("http://127.0.0.1:{}", port),
        requests,
    }
}

fn handle(mut stream: TcpStream, reply: &Reply, recorded: &Mutex<Vec<RecordedRequest>>) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(5)));

    let mut buf = Vec::new();
    let mut chunk = [0u8; 8192];
    let header_end = loop {
        match stream.read(&mut chunk) {
            Ok(0) | Err(_) => return,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
        if let Some(i) = find(&buf, b"\r\n\r\n") {
            break i;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).into_owned();
    let mut lines = head.lines();
    let mut request_line = lines.next().unwrap_or("").split_whitespace();
    let method = request_line.next().unwrap_or("").to_string();
    let path = request_line.next().unwrap_or("").to_string();
    let mut content_length = 0usize;
    let mut content_type = String::new();
    for line in lines {
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("content-length") {
                content_length = value.trim().parse().unwrap_or(0);
            }
            if name.trim().eq_ignore_ascii_case("content-type") {
                content_type = value.trim().to_string();
            }
        }
    }

    let mut body = buf[header_end + 4..].to_vec();
    while body.len() < content_length {
        match stream.read(&mut chunk) {
            Ok(0) | Err(_) => break,
            Ok(n) => body.extend_from_slice(&chunk[..n]),
        }
    }

    recorded.lock().unwrap().push(RecordedRequest {
        method,
        path,
        content_type,
        body,
    });

    let mut response = format!(
        "HTTP/1.1 {}\r\nContent-Type: application/octet-stream\r\nContent-Length: {}\r\n",
        reply.status,
        reply.body.len(),
    )
    .into_bytes();
    if let Some(disposition) = &reply.content_disposition {
        response.extend_from_slice(b"Content-Disposition: ");
        response.extend_from_slice(disposition);
        response.extend_from_slice(b"\r\n");
    }
    response.extend_from_slice(b"Connection: close\r\n\r\n");
    let _ = stream.write_all(&response);
    let _ = stream.write_all(&reply.body);
}
