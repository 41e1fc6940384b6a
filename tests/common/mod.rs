#![allow(dead_code)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};

use medic_server::config::AppConfig;
use medic_server::database::{bootstrap, MemoryStore};
use medic_server::{app, AppState};

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub client: reqwest::Client,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            if let Ok(resp) = self.client.get(self.url("/health")).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    /// POST /users and return the created user's `data`.
    pub async fn register(&self, email: &str, password: &str) -> Result<Value> {
        let res = self
            .client
            .post(self.url("/users"))
            .json(&json!({
                "firstname": "Ada",
                "lastname": "Obi",
                "email": email,
                "password": password
            }))
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::CREATED, "register failed: {}", res.status());
        Ok(res.json::<Value>().await?["data"].clone())
    }

    /// Log in and return the access token.
    pub async fn login(&self, email: &str, password: &str) -> Result<String> {
        let res = self
            .client
            .post(self.url("/users/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::OK, "login failed: {}", res.status());
        let body = res.json::<Value>().await?;
        body["data"]["token"].as_str().map(str::to_string).context("login response without token")
    }

    /// Register and log in; returns `(user_id, token)`.
    pub async fn signup(&self, email: &str) -> Result<(String, String)> {
        let user = self.register(email, "secret1").await?;
        let id = user["_id"].as_str().context("user without _id")?.to_string();
        let token = self.login(email, "secret1").await?;
        Ok((id, token))
    }

    /// POST /hospitals as the holder of `token`; returns the hospital's id.
    pub async fn create_hospital(&self, token: &str, name: &str) -> Result<String> {
        let res = self
            .client
            .post(self.url("/hospitals"))
            .bearer_auth(token)
            .json(&hospital_body(name))
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::CREATED, "create hospital failed: {}", res.status());
        let body = res.json::<Value>().await?;
        body["data"]["_id"].as_str().map(str::to_string).context("hospital without _id")
    }

    /// POST /doctors into `hospital_id`; returns the doctor's id.
    pub async fn create_doctor(&self, token: &str, hospital_id: &str) -> Result<String> {
        let res = self
            .client
            .post(self.url("/doctors"))
            .bearer_auth(token)
            .json(&json!({
                "firstname": "Chidi",
                "lastname": "Okafor",
                "specialties": ["cardiologist"],
                "hospitalId": hospital_id
            }))
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::CREATED, "create doctor failed: {}", res.status());
        let body = res.json::<Value>().await?;
        body["data"]["_id"].as_str().map(str::to_string).context("doctor without _id")
    }
}

pub fn hospital_body(name: &str) -> Value {
    json!({
        "name": name,
        "location": {
            "address": "12 Marina, Lagos",
            "point": { "type": "Point", "coordinates": [3.3792, 6.5244] }
        },
        "specialties": ["dentist", "surgeon"],
        "open": true,
        "description": "Walk-ins welcome",
        "phone": "+2348012345678",
        "email": "desk@marina.ng"
    })
}

/// Start the router against a fresh in-memory store on an unused port.
pub async fn spawn_server() -> Result<TestServer> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let base_url = format!("http://127.0.0.1:{}", port);

    let store = Arc::new(MemoryStore::new());
    bootstrap(store.as_ref()).await?;
    let state = AppState::new(AppConfig::for_testing(), store);

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app(state)).await;
    });

    let server = TestServer { port, base_url, client: reqwest::Client::new() };
    server.wait_ready(Duration::from_secs(5)).await?;
    Ok(server)
}
