//! Minimal HTTP/1.1 server imitating a release-hosting API for integration
//! tests.
//!
//! Serves release metadata (`/repos/{owner}/{repo}/releases/latest` and
//! `/releases/tags/{tag}`), release asset bodies
//! (`/repos/{owner}/{repo}/releases/assets/{id}`), and plain files by path.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::Arc;
use std::thread;

#[derive(Debug, Clone)]
pub struct FakeAsset {
    pub id: u64,
    pub name: String,
    pub body: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct FakeRelease {
    /// `OWNER/REPO` this release belongs to. The first release listed for a
    /// repository is its "latest".
    pub repo: String,
    pub tag: String,
    pub assets: Vec<FakeAsset>,
}

#[derive(Debug, Clone, Default)]
pub struct ReleaseServerOptions {
    /// Asset ids whose content fetch answers 500 (simulates a transport
    /// failure after successful resolution).
    pub failing_asset_ids: Vec<u64>,
}

/// Starts a server in a background thread. Returns the base URL (e.g.
/// "http://127.0.0.1:12345"), usable as the release API root. `files` are
/// extra plain paths (e.g. "/dic/x.tar.gz") served verbatim. The server runs
/// until the process exits.
pub fn start(releases: Vec<FakeRelease>, files: Vec<(String, Vec<u8>)>) -> String {
    start_with_options(releases, files, ReleaseServerOptions::default())
}

pub fn start_with_options(
    releases: Vec<FakeRelease>,
    files: Vec<(String, Vec<u8>)>,
    opts: ReleaseServerOptions,
) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let state = Arc::new((releases, files, opts));
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let state = Arc::clone(&state);
            thread::spawn(move || handle(stream, &state.0, &state.1, &state.2));
        }
    });
    format!("http://127.0.0.1:{}", port)
}

fn handle(
    mut stream: std::net::TcpStream,
    releases: &[FakeRelease],
    files: &[(String, Vec<u8>)],
    opts: &ReleaseServerOptions,
) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let path = match parse_request_path(request) {
        Some(p) => p,
        None => {
            respond(&mut stream, "405 Method Not Allowed", "text/plain", b"");
            return;
        }
    };

    // Release metadata endpoints.
    if let Some((repo, rest)) = split_repo_route(&path) {
        if rest == "releases/latest" {
            match releases.iter().find(|r| r.repo == repo) {
                Some(release) => {
                    let body = release_json(release);
                    respond(&mut stream, "200 OK", "application/json", body.as_bytes());
                }
                None => respond(&mut stream, "404 Not Found", "text/plain", b""),
            }
            return;
        }
        if let Some(tag) = rest.strip_prefix("releases/tags/") {
            match releases.iter().find(|r| r.repo == repo && r.tag == tag) {
                Some(release) => {
                    let body = release_json(release);
                    respond(&mut stream, "200 OK", "application/json", body.as_bytes());
                }
                None => respond(&mut stream, "404 Not Found", "text/plain", b""),
            }
            return;
        }
        if let Some(id) = rest
            .strip_prefix("releases/assets/")
            .and_then(|id| id.parse::<u64>().ok())
        {
            if opts.failing_asset_ids.contains(&id) {
                respond(&mut stream, "500 Internal Server Error", "text/plain", b"");
                return;
            }
            let asset = releases
                .iter()
                .filter(|r| r.repo == repo)
                .flat_map(|r| r.assets.iter())
                .find(|a| a.id == id);
            match asset {
                Some(asset) => respond(
                    &mut stream,
                    "200 OK",
                    "application/octet-stream",
                    &asset.body,
                ),
                None => respond(&mut stream, "404 Not Found", "text/plain", b""),
            }
            return;
        }
    }

    // Plain files (direct-URL downloads).
    match files.iter().find(|(p, _)| *p == path) {
        Some((_, body)) => respond(&mut stream, "200 OK", "application/octet-stream", body),
        None => respond(&mut stream, "404 Not Found", "text/plain", b""),
    }
}

/// Returns the path of a GET request, or None for any other method.
fn parse_request_path(request: &str) -> Option<String> {
    let line = request.lines().next()?;
    let mut parts = line.split_whitespace();
    let method = parts.next()?;
    let path = parts.next()?;
    if !method.eq_ignore_ascii_case("GET") {
        return None;
    }
    Some(path.to_string())
}

/// Splits "/repos/{owner}/{repo}/{rest...}" into ("owner/repo", "rest...").
fn split_repo_route(path: &str) -> Option<(String, String)> {
    let rest = path.strip_prefix("/repos/")?;
    let mut segments = rest.splitn(3, '/');
    let owner = segments.next()?;
    let repo = segments.next()?;
    let tail = segments.next()?;
    Some((format!("{owner}/{repo}"), tail.to_string()))
}

fn release_json(release: &FakeRelease) -> String {
    let assets: Vec<_> = release
        .assets
        .iter()
        .map(|a| serde_json::json!({ "id": a.id, "name": a.name }))
        .collect();
    serde_json::json!({
        "html_url": format!("https://example.com/{}/releases/tag/{}", release.repo, release.tag),
        "tag_name": release.tag,
        "assets": assets,
    })
    .to_string()
}

fn respond(stream: &mut std::net::TcpStream, status: &str, content_type: &str, body: &[u8]) {
    let header = format!(
        "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        content_type,
        body.len()
    );
    let _ = stream.write_all(header.as_bytes());
    let _ = stream.write_all(body);
}
