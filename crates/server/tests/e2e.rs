use std::net::SocketAddr;

use configs::AppConfig;
use reqwest::StatusCode as HttpStatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use uuid::Uuid;

struct TestApp {
    base_url: String,
    data_file: std::path::PathBuf,
}

async fn start_server(allowed_origin: Option<&str>) -> anyhow::Result<TestApp> {
    let mut cfg = AppConfig::default();
    cfg.storage.data_file = std::env::temp_dir()
        .join(format!("e2e_{}", Uuid::new_v4()))
        .join("data.json");
    cfg.cors.allowed_origin = allowed_origin.map(str::to_string);

    let app = server::build_app(&cfg).await?;
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("server error: {}", e); }
    });

    Ok(TestApp { base_url, data_file: cfg.storage.data_file })
}

async fn cleanup(app: TestApp) {
    if let Some(dir) = app.data_file.parent() {
        let _ = tokio::fs::remove_dir_all(dir).await;
    }
}

#[tokio::test]
async fn e2e_public_health() -> anyhow::Result<()> {
    let app = start_server(None).await?;
    let res = reqwest::get(format!("{}/health", app.base_url)).await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["status"], "ok");
    cleanup(app).await;
    Ok(())
}

#[tokio::test]
async fn e2e_web_form_flow() -> anyhow::Result<()> {
    let app = start_server(None).await?;
    let c = reqwest::Client::new();

    // block a fixed extension
    let res = c.put(format!("{}/api/fixed-extensions/bat", app.base_url))
        .json(&json!({"blocked": true}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);

    // add two custom extensions
    for ext in ["Sh", ".py"] {
        let res = c.post(format!("{}/api/custom-extensions", app.base_url))
            .json(&json!({"extension": ext}))
            .send().await?;
        assert_eq!(res.status(), HttpStatusCode::OK);
    }

    let blocked = c.get(format!("{}/api/blocked-extensions", app.base_url))
        .send().await?
        .json::<Value>().await?;
    assert_eq!(blocked["all"], json!(["bat", "sh", "py"]));

    // the file on disk carries the documented layout
    let raw: Value = serde_json::from_slice(&tokio::fs::read(&app.data_file).await?)?;
    let bat = raw["fixedExtensions"].as_array().unwrap().iter().find(|e| e["extension"] == "bat").cloned().unwrap();
    assert_eq!(bat["blocked"], json!(1));
    assert_eq!(raw["customExtensions"].as_array().map(Vec::len), Some(2));

    let res = c.delete(format!("{}/api/custom-extensions/sh", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let custom = c.get(format!("{}/api/custom-extensions", app.base_url))
        .send().await?
        .json::<Value>().await?;
    assert_eq!(custom.as_array().map(Vec::len), Some(1));
    assert_eq!(custom[0]["extension"], "py");

    cleanup(app).await;
    Ok(())
}

#[tokio::test]
async fn e2e_capacity_limit() -> anyhow::Result<()> {
    let app = start_server(None).await?;
    let c = reqwest::Client::new();
    for i in 0..200 {
        let res = c.post(format!("{}/api/custom-extensions", app.base_url))
            .json(&json!({"extension": format!("x{i}")}))
            .send().await?;
        assert_eq!(res.status(), HttpStatusCode::OK, "add #{i}");
    }
    let res = c.post(format!("{}/api/custom-extensions", app.base_url))
        .json(&json!({"extension": "onemore"}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    let body = res.json::<Value>().await?;
    assert_eq!(body["error"], "Maximum 200 extensions");
    cleanup(app).await;
    Ok(())
}

#[tokio::test]
async fn e2e_cors_echoes_configured_origin() -> anyhow::Result<()> {
    let origin = "http://localhost:5173";
    let app = start_server(Some(origin)).await?;
    let res = reqwest::Client::new()
        .get(format!("{}/api/fixed-extensions", app.base_url))
        .header("Origin", origin)
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let allowed = res.headers().get("access-control-allow-origin").and_then(|v| v.to_str().ok());
    assert_eq!(allowed, Some(origin));
    cleanup(app).await;
    Ok(())
}

#[tokio::test]
async fn e2e_cors_open_by_default() -> anyhow::Result<()> {
    let app = start_server(None).await?;
    let res = reqwest::Client::new()
        .get(format!("{}/api/fixed-extensions", app.base_url))
        .header("Origin", "https://anywhere.example")
        .send().await?;
    let allowed = res.headers().get("access-control-allow-origin").and_then(|v| v.to_str().ok());
    assert_eq!(allowed, Some("*"));
    cleanup(app).await;
    Ok(())
}
