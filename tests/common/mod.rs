#![allow(dead_code)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use skyfare_api::auth::{generate_session_token, Claims};
use skyfare_api::config::AppConfig;
use skyfare_api::database::{DocumentStore, MemoryStore};
use skyfare_api::state::AppState;

pub struct TestServer {
    pub base_url: String,
    pub config: AppConfig,
    pub store: Arc<MemoryStore>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Session token for `user`, signed with this server's secret.
    pub fn token(&self, user: &str, role: Option<&str>) -> String {
        let claims = Claims::new(user, role.map(str::to_string), None, 1);
        generate_session_token(&claims, &self.config.security).expect("sign test token")
    }

    pub fn session_cookie(&self, token: &str) -> String {
        format!("{}={}", self.config.security.session_cookie, token)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            if let Ok(resp) = client.get(self.url("/health")).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

/// Serve the app on a free port backed by a fresh in-memory store.
pub async fn spawn_server() -> Result<TestServer> {
    spawn_server_with(|_| {}).await
}

pub async fn spawn_server_with(configure: impl FnOnce(&mut AppConfig)) -> Result<TestServer> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;

    let mut config = AppConfig::development();
    config.server.host = "127.0.0.1".to_string();
    config.server.port = port;
    configure(&mut config);

    let store = Arc::new(MemoryStore::new());
    let shared: Arc<dyn DocumentStore> = store.clone();
    let state = AppState::new(config.clone(), shared);
    state.prepare().await?;

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    let app = skyfare_api::app(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    let server = TestServer {
        base_url: format!("http://127.0.0.1:{}", port),
        config,
        store,
    };
    server.wait_ready(Duration::from_secs(5)).await?;
    Ok(server)
}

/// Client that reports redirects instead of following them.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("build reqwest client")
}
