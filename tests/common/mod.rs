//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use preview_server::config::DevServerConfig;
use preview_server::http::HttpServer;
use preview_server::lifecycle::{self, Shutdown};
use tempfile::TempDir;
use tokio::net::TcpListener;

/// A running server over a temporary site.
#[allow(dead_code)]
pub struct TestSite {
    pub dir: TempDir,
    pub addr: SocketAddr,
    shutdown: Shutdown,
}

#[allow(dead_code)]
impl TestSite {
    /// Directory being served.
    pub fn public(&self) -> std::path::PathBuf {
        self.dir.path().join("public")
    }

    /// Absolute URL for `path_and_query` on this server.
    pub fn url(&self, path_and_query: &str) -> String {
        format!("http://{}{}", self.addr, path_and_query)
    }
}

impl Drop for TestSite {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Write `files` (paths relative to the served directory) into a fresh site.
///
/// `netlify_toml` is written next to the served directory when given.
pub fn write_site(files: &[(&str, &str)], netlify_toml: Option<&str>) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let public = dir.path().join("public");
    std::fs::create_dir(&public).unwrap();
    for (name, contents) in files {
        write_file(&public, name, contents);
    }
    if let Some(toml) = netlify_toml {
        std::fs::write(dir.path().join("netlify.toml"), toml).unwrap();
    }
    dir
}

/// Write one file below `root`, creating parent directories.
#[allow(dead_code)]
pub fn write_file(root: &Path, name: &str, contents: &str) {
    let path = root.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, contents).unwrap();
}

/// Configuration pointing at a site created by [`write_site`].
pub fn config_for(dir: &TempDir) -> DevServerConfig {
    DevServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        served_dir: dir.path().join("public"),
        site_config: dir.path().join("netlify.toml"),
        ..Default::default()
    }
}

/// Build and start a server for `files` on an ephemeral port.
#[allow(dead_code)]
pub async fn start_site(files: &[(&str, &str)], netlify_toml: Option<&str>) -> TestSite {
    let dir = write_site(files, netlify_toml);
    let config = config_for(&dir);

    let site = Arc::new(lifecycle::build_site(&config).await.unwrap());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, site);
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    TestSite { dir, addr, shutdown }
}

/// Client that reports redirects instead of following them.
#[allow(dead_code)]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy()
        .build()
        .unwrap()
}
