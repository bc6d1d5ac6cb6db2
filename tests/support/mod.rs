//! Shared harness for controller integration tests: a scoped config home
//! and a single-threaded stub backend serving canned HTTP responses.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use mammodesk::egui_app::controller::EguiController;

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

/// Scoped config home plus keyring bypass. Holds a process-wide lock so
/// tests never see each other's environment.
pub struct MammodeskEnvGuard {
    previous_home: Option<String>,
    previous_keyring: Option<String>,
    _lock: MutexGuard<'static, ()>,
}

impl MammodeskEnvGuard {
    pub fn set_config_home(path: PathBuf) -> Self {
        let lock = ENV_LOCK
            .get_or_init(|| Mutex::new(()))
            .lock()
            .unwrap_or_else(|err| err.into_inner());
        let previous_home = std::env::var("MAMMODESK_CONFIG_HOME").ok();
        let previous_keyring = std::env::var("MAMMODESK_DISABLE_KEYRING").ok();
        // SAFETY: tests run under a global lock to prevent concurrent env mutations.
        unsafe {
            std::env::set_var("MAMMODESK_CONFIG_HOME", path);
            std::env::set_var("MAMMODESK_DISABLE_KEYRING", "1");
        }
        Self {
            previous_home,
            previous_keyring,
            _lock: lock,
        }
    }
}

impl Drop for MammodeskEnvGuard {
    fn drop(&mut self) {
        // SAFETY: tests run under a global lock to prevent concurrent env mutations.
        unsafe {
            match self.previous_home.take() {
                Some(value) => std::env::set_var("MAMMODESK_CONFIG_HOME", value),
                None => std::env::remove_var("MAMMODESK_CONFIG_HOME"),
            }
            match self.previous_keyring.take() {
                Some(value) => std::env::set_var("MAMMODESK_DISABLE_KEYRING", value),
                None => std::env::remove_var("MAMMODESK_DISABLE_KEYRING"),
            }
        }
    }
}

/// Temp config home with a `config.toml` pointing at the stub backend and
/// at a download directory inside the temp tree.
pub struct TestEnv {
    _guard: MammodeskEnvGuard,
    temp: tempfile::TempDir,
}

impl TestEnv {
    pub fn new(base_url: &str) -> Self {
        let temp = tempfile::tempdir().expect("create tempdir");
        let guard = MammodeskEnvGuard::set_config_home(temp.path().to_path_buf());
        let app_dir = temp.path().join(".mammodesk");
        std::fs::create_dir_all(&app_dir).expect("create app dir");
        let download_dir = temp.path().join("downloads");
        let config = format!(
            "[backend]\nbase_url = \"{base_url}\"\n\n[export]\ndownload_dir = \"{}\"\n",
            download_dir.display()
        );
        std::fs::write(app_dir.join("config.toml"), config).expect("write config");
        Self {
            _guard: guard,
            temp,
        }
    }

    pub fn download_dir(&self) -> PathBuf {
        self.temp.path().join("downloads")
    }

    pub fn config_text(&self) -> String {
        std::fs::read_to_string(self.temp.path().join(".mammodesk").join("config.toml"))
            .expect("read config")
    }
}

/// One request as the stub saw it.
#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub headers: Vec<String>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        let prefix = format!("{}:", name.to_ascii_lowercase());
        self.headers
            .iter()
            .find(|line| line.to_ascii_lowercase().starts_with(&prefix))
            .map(|line| line[prefix.len()..].trim())
    }

    pub fn body_json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("request body is JSON")
    }
}

struct StubShared {
    responses: Mutex<VecDeque<Vec<u8>>>,
    requests: Mutex<Vec<RecordedRequest>>,
    done: AtomicBool,
}

/// Minimal HTTP/1.1 stub: one canned response per connection, FIFO.
/// Every response carries `Connection: close`, so the client never tries
/// to reuse a connection the stub already hung up on.
pub struct StubServer {
    addr: SocketAddr,
    shared: Arc<StubShared>,
    handle: Option<JoinHandle<()>>,
}

impl StubServer {
    pub fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub server");
        let addr = listener.local_addr().expect("stub server addr");
        let shared = Arc::new(StubShared {
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            done: AtomicBool::new(false),
        });
        let worker = Arc::clone(&shared);
        let handle = std::thread::spawn(move || {
            for stream in listener.incoming() {
                if worker.done.load(Ordering::SeqCst) {
                    break;
                }
                let Ok(stream) = stream else { continue };
                serve_one(&worker, stream);
            }
        });
        Self {
            addr,
            shared,
            handle: Some(handle),
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}/api/v1", self.addr)
    }

    pub fn enqueue(&self, response: Vec<u8>) {
        self.shared
            .responses
            .lock()
            .expect("responses lock")
            .push_back(response);
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.shared.requests.lock().expect("requests lock").clone()
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.shared.done.store(true, Ordering::SeqCst);
        // Unblock the accept loop.
        let _ = TcpStream::connect(self.addr);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn serve_one(shared: &StubShared, mut stream: TcpStream) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));
    let Some(request) = read_request(&mut stream) else {
        return;
    };
    shared
        .requests
        .lock()
        .expect("requests lock")
        .push(request);
    let response = shared
        .responses
        .lock()
        .expect("responses lock")
        .pop_front()
        .unwrap_or_else(|| error_response(500, r#"{"detail": "stub queue exhausted"}"#));
    let _ = stream.write_all(&response);
    let _ = stream.flush();
}

fn read_request(stream: &mut TcpStream) -> Option<RecordedRequest> {
    let mut head = Vec::new();
    let mut byte = [0u8; 1];
    while !head.ends_with(b"\r\n\r\n") {
        match stream.read(&mut byte) {
            Ok(1) => head.push(byte[0]),
            _ => return None,
        }
    }
    let head = String::from_utf8_lossy(&head).into_owned();
    let mut lines = head.lines();
    let request_line = lines.next()?;
    let mut parts = request_line.split_whitespace();
    let method = parts.next()?.to_string();
    let path = parts.next()?.to_string();
    let headers: Vec<String> = lines
        .take_while(|line| !line.is_empty())
        .map(|line| line.to_string())
        .collect();
    let content_length = headers
        .iter()
        .find_map(|line| {
            line.to_ascii_lowercase()
                .strip_prefix("content-length:")
                .map(|rest| rest.trim().parse::<usize>().ok())
        })
        .flatten()
        .unwrap_or(0);
    let mut body = vec![0u8; content_length];
    if content_length > 0 && stream.read_exact(&mut body).is_err() {
        return None;
    }
    Some(RecordedRequest {
        method,
        path,
        headers,
        body,
    })
}

fn raw_response(status: u16, content_type: &str, body: &[u8]) -> Vec<u8> {
    let reason = match status {
        200 => "OK",
        400 => "Bad Request",
        401 => "Unauthorized",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Status",
    };
    let mut response = format!(
        "HTTP/1.1 {status} {reason}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        body.len()
    )
    .into_bytes();
    response.extend_from_slice(body);
    response
}

pub fn json_response(body: &str) -> Vec<u8> {
    raw_response(200, "application/json", body.as_bytes())
}

pub fn error_response(status: u16, body: &str) -> Vec<u8> {
    raw_response(status, "application/json", body.as_bytes())
}

pub fn zip_response(payload: &[u8]) -> Vec<u8> {
    raw_response(200, "application/zip", payload)
}

/// A small but valid zip archive with the layout a real export has.
pub fn sample_zip() -> Vec<u8> {
    let mut cursor = std::io::Cursor::new(Vec::new());
    {
        let mut writer = zip::ZipWriter::new(&mut cursor);
        let options = zip::write::SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Deflated);
        for (name, data) in [
            ("train/BI-RADS 2/a.png", b"aaaa".as_slice()),
            ("val/BI-RADS 2/b.png", b"bbbb".as_slice()),
            ("test/BI-RADS 4/c.png", b"cccc".as_slice()),
        ] {
            writer.start_file(name, options).expect("start zip entry");
            writer.write_all(data).expect("write zip entry");
        }
        writer.finish().expect("finish zip");
    }
    cursor.into_inner()
}

/// Poll background jobs until `done` holds or the timeout passes.
pub fn drive_until(
    controller: &mut EguiController,
    timeout: Duration,
    mut done: impl FnMut(&EguiController) -> bool,
) -> bool {
    let deadline = Instant::now() + timeout;
    loop {
        controller.poll_background_jobs();
        if done(controller) {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
}

pub const DRIVE_TIMEOUT: Duration = Duration::from_secs(10);
