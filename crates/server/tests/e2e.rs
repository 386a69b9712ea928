use std::net::SocketAddr;

use configs::AppConfig;
use reqwest::StatusCode as HttpStatusCode;
use serde_json::json;
use tokio::net::TcpListener;
use uuid::Uuid;

struct TestApp {
    base_url: String,
    data_dir: std::path::PathBuf,
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.data_dir);
    }
}

async fn start_server() -> anyhow::Result<TestApp> {
    // Isolated data directory per test run
    let data_dir = std::env::temp_dir().join(format!("tweet_api_e2e_{}", Uuid::new_v4()));
    let mut cfg = AppConfig::default();
    cfg.storage.data_dir = data_dir.clone();

    let app = server::startup::build_app(&cfg).await?;
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("server error: {}", e); }
    });

    Ok(TestApp { base_url, data_dir })
}

#[tokio::test]
async fn e2e_public_health() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = reqwest::get(format!("{}/health", app.base_url)).await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn e2e_signup_login_post_and_persist() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = reqwest::Client::new();
    let user_id = Uuid::new_v4();

    let res = c.post(format!("{}/signup", app.base_url))
        .json(&json!({
            "user_id": user_id.to_string().to_uppercase(),
            "email": "pedro@example.com",
            "password": "passwor123123",
            "first_name": "Pedro",
            "last_name": "Garcia",
            "birth_date": "1990-04-12"
        }))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let user = res.json::<serde_json::Value>().await?;
    assert_eq!(user["user_id"], user_id.to_string());
    assert_eq!(user["birth_date"], "1990-04-12T00:00:00Z");

    let res = c.post(format!("{}/login", app.base_url))
        .form(&[("email", "pedro@example.com"), ("password", "passwor123123")])
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<serde_json::Value>().await?["success"], true);

    let tweet_id = Uuid::new_v4();
    let res = c.post(format!("{}/post", app.base_url))
        .json(&json!({ "tweet_id": tweet_id, "content": "hola", "by": user }))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);

    let res = c.put(format!("{}/tweets/{}/update", app.base_url, tweet_id))
        .form(&[("content", "adios")])
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);

    // Both collections are plain JSON arrays on disk
    let users: serde_json::Value = serde_json::from_slice(&tokio::fs::read(app.data_dir.join("users.json")).await?)?;
    assert_eq!(users.as_array().map(Vec::len), Some(1));
    assert_eq!(users[0]["password"], "passwor123123");
    let tweets: serde_json::Value = serde_json::from_slice(&tokio::fs::read(app.data_dir.join("tweets.json")).await?)?;
    assert_eq!(tweets[0]["content"], "adios");
    assert_eq!(tweets[0]["tweet_id"], tweet_id.to_string());
    Ok(())
}
