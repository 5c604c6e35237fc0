//! Shared fixtures for the scaffolding integration tests

#![allow(dead_code)]

use flate2::write::GzEncoder;
use flate2::Compression;
use scaffolder_core::templates::fetcher::http_client_builder;
use scaffolder_core::{Endpoints, NetworkOptions, ProductConfig, ScaffoldConfig, TemplateSource};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use url::Url;
use walkdir::WalkDir;

pub const USER_AGENT: &str = "scaffold-test";

#[derive(Clone)]
pub struct TestSite;

impl ProductConfig for TestSite {
    fn name(&self) -> &'static str {
        USER_AGENT
    }
    fn display_name(&self) -> &'static str {
        "Test Site"
    }
    fn default_template_url(&self) -> &'static str {
        "http://127.0.0.1:9/tarball"
    }
    fn template_url_env(&self) -> &'static str {
        "SCAFFOLD_TEST_TEMPLATE_URL"
    }
    fn default_releases_url(&self) -> &'static str {
        "http://127.0.0.1:9/releases/latest"
    }
    fn releases_url_env(&self) -> &'static str {
        "SCAFFOLD_TEST_RELEASES_URL"
    }
    fn tool_package(&self) -> &'static str {
        "@fwdslsh/unify"
    }
    fn tool_command(&self) -> &'static str {
        "npx @fwdslsh/unify"
    }
    fn default_tool_version(&self) -> &'static str {
        "^0.4.3"
    }
    fn default_project_name(&self) -> &'static str {
        "unify-site"
    }
    fn docs_url(&self) -> &'static str {
        "https://example.invalid/docs"
    }
    fn next_steps(&self, _dir: &Path, _config: &ScaffoldConfig) -> Vec<String> {
        Vec::new()
    }
}

/// Short timeouts so a stalled route fails fast
pub fn network() -> NetworkOptions {
    NetworkOptions {
        connect_timeout: Duration::from_secs(2),
        fetch_timeout: Duration::from_secs(2),
        version_timeout: Duration::from_millis(500),
        max_redirects: 5,
    }
}

/// Same settings as production, minus any proxy picked up from the environment
pub fn client() -> reqwest::Client {
    http_client_builder(USER_AGENT, &network())
        .no_proxy()
        .build()
        .unwrap()
}

pub fn remote_endpoints(server: &TestServer) -> Endpoints {
    Endpoints::new(
        TemplateSource::Remote(server.url("/tarball")),
        server.url("/releases/latest"),
    )
}

/// Canned HTTP response
#[derive(Clone)]
pub struct Route {
    status: u16,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
    delay: Option<Duration>,
}

impl Route {
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self::status(200).body(body)
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
            delay: None,
        }
    }

    pub fn redirect(status: u16, location: &str) -> Self {
        Self::status(status).header("Location", location)
    }

    pub fn json(body: &str) -> Self {
        Self::ok(body.as_bytes().to_vec()).header("Content-Type", "application/json")
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Hold the response back for `delay` before writing it
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[derive(Default)]
struct ServerState {
    routes: HashMap<String, Route>,
    hits: HashMap<String, usize>,
    requests: Vec<String>,
}

/// Minimal HTTP/1.1 server answering each connection with one canned response
pub struct TestServer {
    base: Url,
    state: Arc<Mutex<ServerState>>,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let state = Arc::new(Mutex::new(ServerState::default()));

        let shared = state.clone();
        let handle = tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let state = shared.clone();
                tokio::spawn(async move {
                    let _ = respond(stream, state).await;
                });
            }
        });

        Self {
            base: Url::parse(&format!("http://{}/", addr)).unwrap(),
            state,
            handle,
        }
    }

    pub fn route(&self, path: &str, route: Route) {
        self.state
            .lock()
            .unwrap()
            .routes
            .insert(path.to_string(), route);
    }

    pub fn url(&self, path: &str) -> Url {
        self.base.join(path).unwrap()
    }

    /// Number of requests received for `path`
    pub fn hits(&self, path: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .hits
            .get(path)
            .copied()
            .unwrap_or(0)
    }

    /// Raw request heads, in arrival order
    pub fn requests(&self) -> Vec<String> {
        self.state.lock().unwrap().requests.clone()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn respond(mut stream: TcpStream, state: Arc<Mutex<ServerState>>) -> std::io::Result<()> {
    let mut head = Vec::new();
    let mut chunk = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        head.extend_from_slice(&chunk[..n]);
    }

    let head = String::from_utf8_lossy(&head).into_owned();
    let path = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string();

    let route = {
        let mut state = state.lock().unwrap();
        *state.hits.entry(path.clone()).or_default() += 1;
        state.requests.push(head);
        state
            .routes
            .get(&path)
            .cloned()
            .unwrap_or_else(|| Route::status(404))
    };

    if let Some(delay) = route.delay {
        tokio::time::sleep(delay).await;
    }

    let mut response = format!(
        "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n",
        route.status,
        reason(route.status),
        route.body.len()
    );
    for (name, value) in &route.headers {
        response.push_str(&format!("{}: {}\r\n", name, value));
    }
    response.push_str("\r\n");

    stream.write_all(response.as_bytes()).await?;
    stream.write_all(&route.body).await?;
    stream.shutdown().await
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        301 => "Moved Permanently",
        302 => "Found",
        307 => "Temporary Redirect",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}

/// Gzipped tarball holding `files` as regular entries
pub fn tarball(files: &[(&str, &str)]) -> Vec<u8> {
    let mut builder = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::default()));
    for (path, contents) in files {
        let mut header = tar::Header::new_gnu();
        header.set_size(contents.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(&mut header, path, contents.as_bytes())
            .unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap()
}

/// Gzipped tarball whose entry names are written verbatim, bypassing the
/// builder's own path checks
pub fn raw_tarball(files: &[(&str, &str)]) -> Vec<u8> {
    let mut builder = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::default()));
    for (path, contents) in files {
        let mut header = tar::Header::new_old();
        let name = &mut header.as_old_mut().name;
        name[..path.len()].copy_from_slice(path.as_bytes());
        header.set_size(contents.len() as u64);
        header.set_mode(0o644);
        header.set_entry_type(tar::EntryType::Regular);
        header.set_cksum();
        builder.append(&header, contents.as_bytes()).unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap()
}

/// Relative paths of every regular file under `root`, sorted
pub fn files_under(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.path().strip_prefix(root).unwrap().to_path_buf())
        .collect();
    files.sort();
    files
}
