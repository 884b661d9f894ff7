// Shared helpers for integration tests: a throwaway HTTP responder and jar builders

#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use zip::CompressionMethod;
use zip::write::{FileOptions, ZipWriter};

/// A local HTTP/1.1 server answering every GET with the same status and body
pub struct TestServer {
    pub base_url: String,
    pub requests: Arc<Mutex<Vec<String>>>,
    pub max_in_flight: Arc<AtomicUsize>,
    handle: tokio::task::JoinHandle<()>,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

impl TestServer {
    pub fn requested_paths(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

pub async fn serve(status: &'static str, body: Vec<u8>) -> TestServer {
    serve_with_delay(status, body, Duration::ZERO).await
}

pub async fn serve_with_delay(status: &'static str, body: Vec<u8>, delay: Duration) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let in_flight = Arc::new(AtomicUsize::new(0));
    let max_in_flight = Arc::new(AtomicUsize::new(0));

    let requests_clone = Arc::clone(&requests);
    let max_clone = Arc::clone(&max_in_flight);
    let handle = tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let body = body.clone();
            let requests = Arc::clone(&requests_clone);
            let in_flight = Arc::clone(&in_flight);
            let max_in_flight = Arc::clone(&max_clone);

            tokio::spawn(async move {
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                loop {
                    let n = socket.read(&mut buf).await.unwrap_or(0);
                    if n == 0 {
                        break;
                    }
                    request.extend_from_slice(&buf[..n]);
                    if request.windows(4).any(|w| w == b"\r\n\r\n") {
                        break;
                    }
                }

                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                max_in_flight.fetch_max(now, Ordering::SeqCst);

                let text = String::from_utf8_lossy(&request);
                if let Some(path) = text.lines().next().and_then(|l| l.split(' ').nth(1)) {
                    requests.lock().unwrap().push(path.to_string());
                }

                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }

                let header = format!(
                    "HTTP/1.1 {}\r\nContent-Length: {}\r\nContent-Type: application/java-archive\r\nConnection: close\r\n\r\n",
                    status,
                    body.len()
                );
                let _ = socket.write_all(header.as_bytes()).await;
                let _ = socket.write_all(&body).await;
                let _ = socket.shutdown().await;

                in_flight.fetch_sub(1, Ordering::SeqCst);
            });
        }
    });

    TestServer {
        base_url: format!("http://{}", addr),
        requests,
        max_in_flight,
        handle,
    }
}

/// URL of a port that refuses connections
pub async fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

/// Build an in-memory jar with the given entries
pub fn jar_bytes(files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
    let options = FileOptions::<()>::default().compression_method(CompressionMethod::Stored);
    for (name, data) in files {
        zip.start_file(*name, options).unwrap();
        zip.write_all(data).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

pub fn write_jar(path: &Path, files: &[(&str, &[u8])]) {
    let mut file = File::create(path).unwrap();
    file.write_all(&jar_bytes(files)).unwrap();
}

/// A bundler jar holding one server jar
pub fn bundler_jar(server: &[u8]) -> Vec<u8> {
    jar_bytes(&[
        (
            "META-INF/versions.list",
            b"0000\tspigot-1.19.3\tspigot-1.19.3.jar\n",
        ),
        ("META-INF/main-class", b"org.bukkit.craftbukkit.Main"),
        ("META-INF/versions/spigot-1.19.3.jar", server),
    ])
}
