use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use auth::SessionIssuer;
use auth::SessionToken;
use auth::TokenId;
use chrono::Duration;
use chrono::Utc;
use inventory_service::inbound::http::router::create_router;
use inventory_service::inventory::errors::ProvisioningError;
use inventory_service::inventory::models::CopiedMedia;
use inventory_service::inventory::ports::ProvisioningClient;
use inventory_service::inventory::service::InventoryService;
use inventory_service::outbound::repositories::InMemoryCredentialStore;
use inventory_service::outbound::repositories::InMemoryInventoryRepository;
use inventory_service::outbound::repositories::InMemoryTokenStore;
use inventory_service::session::ports::CredentialStore;
use inventory_service::session::ports::TokenStore;
use inventory_service::session::service::SessionService;
use serde_json::json;
use serde_json::Value;

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "secret";
pub const OPERATOR_USERNAME: &str = "operator";
pub const OPERATOR_PASSWORD: &str = "hunter2";

/// Hours a test session lives, and hours it then stays stale.
pub const SESSION_HOURS: i64 = 24;
pub const STALE_GRACE_HOURS: i64 = 24;

/// Provisioning client that records every call instead of running xCAT.
///
/// Media named `<basename>-<arch>.iso` is reported as copied to
/// `/install/<basename>/<arch>`.
#[derive(Default, Clone)]
pub struct RecordingProvisioningClient {
    pub calls: Arc<Mutex<Vec<Vec<String>>>>,
}

#[async_trait]
impl ProvisioningClient for RecordingProvisioningClient {
    async fn copy_installation_media(
        &self,
        paths: &[String],
    ) -> Result<Vec<CopiedMedia>, ProvisioningError> {
        self.calls.lock().unwrap().push(paths.to_vec());
        Ok(paths.iter().map(|path| copied_media(path)).collect())
    }
}

fn copied_media(path: &str) -> CopiedMedia {
    let stem = path
        .rsplit('/')
        .next()
        .unwrap_or(path)
        .trim_end_matches(".iso");
    let (basename, arch) = stem.rsplit_once('-').unwrap_or((stem, "x86_64"));

    CopiedMedia {
        basename: basename.to_string(),
        arch: arch.to_string(),
        directory: format!("/install/{}/{}", basename, arch),
    }
}

/// Test application that spawns a real server over in-memory stores
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub tokens: Arc<InMemoryTokenStore>,
    pub provisioning: RecordingProvisioningClient,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let credentials = Arc::new(InMemoryCredentialStore::new());
        for (username, password) in [
            (ADMIN_USERNAME, ADMIN_PASSWORD),
            (OPERATOR_USERNAME, OPERATOR_PASSWORD),
        ] {
            credentials
                .upsert_account(username, password)
                .await
                .expect("Failed to seed account");
        }

        let tokens = Arc::new(InMemoryTokenStore::new());
        let provisioning = RecordingProvisioningClient::default();

        let session_service = Arc::new(SessionService::new(
            credentials,
            Arc::clone(&tokens),
            SessionIssuer::new(
                Duration::hours(SESSION_HOURS),
                Duration::hours(STALE_GRACE_HOURS),
            ),
        ));
        let inventory_service = Arc::new(InventoryService::new(
            Arc::new(InMemoryInventoryRepository::new()),
            Arc::new(provisioning.clone()),
        ));

        let router = create_router(session_service, inventory_service);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            tokens,
            provisioning,
        }
    }

    /// Log in as the admin account and return the bearer token
    pub async fn login(&self) -> String {
        self.login_as(ADMIN_USERNAME, ADMIN_PASSWORD).await
    }

    pub async fn login_as(&self, username: &str, password: &str) -> String {
        let response = self
            .post("/auth/login")
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let body: Value = response.json().await.expect("Failed to parse response");
        body["token"]["id"]
            .as_str()
            .expect("Login response has no token id")
            .to_string()
    }

    /// Store a token for `owner` that expired `hours_ago` hours ago
    pub async fn insert_expired_token(&self, owner: &str, hours_ago: i64) -> String {
        let token = SessionToken {
            id: TokenId::new(),
            owner: owner.to_string(),
            expires_at: Utc::now() - Duration::hours(hours_ago),
        };
        self.tokens
            .create(&token)
            .await
            .expect("Failed to insert token");
        token.id.to_string()
    }

    /// Paths passed to the provisioning client so far, one entry per call
    pub fn provisioning_calls(&self) -> Vec<Vec<String>> {
        self.provisioning.calls.lock().unwrap().clone()
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make POST request with Bearer token
    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    /// Helper to make PUT request with Bearer token
    pub fn put_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .put(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Helper to make PATCH request with Bearer token
    pub fn patch_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .patch(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Helper to make DELETE request with Bearer token
    pub fn delete_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .delete(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }
}

/// A valid osimage document
pub fn osimage(name: &str) -> Value {
    json!({
        "meta": { "name": name },
        "spec": {
            "imagetype": "linux",
            "provmethod": "install",
            "osvers": "rhels8.4"
        }
    })
}
