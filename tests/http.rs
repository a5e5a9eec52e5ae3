use axum::{extract::Query, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use leaf_dashboard::ui::{REORDER_EMPTY_MESSAGE, SERIES_EMPTY_MESSAGE};
use once_cell::sync::Lazy;
use reqwest::{redirect::Policy, Client};
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
struct DashboardResponse {
    kpi: HashMap<String, Option<f64>>,
    series: Vec<serde_json::Value>,
    reorder: Vec<serde_json::Value>,
}

/// Which backend endpoints answer successfully.
#[derive(Clone, Copy)]
struct Backend {
    kpi: bool,
    series: bool,
    reorder: bool,
}

impl Backend {
    const HEALTHY: Backend = Backend {
        kpi: true,
        series: true,
        reorder: true,
    };
}

struct TestServer {
    base_url: String,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

#[cfg(unix)]
mod cleanup {
    use once_cell::sync::Lazy;
    use std::sync::Mutex;
    use std::sync::Once;

    static REGISTER: Once = Once::new();
    static PIDS: Lazy<Mutex<Vec<i32>>> = Lazy::new(|| Mutex::new(Vec::new()));

    pub fn register(pid: u32) {
        if let Ok(mut pids) = PIDS.lock() {
            pids.push(pid as i32);
        }
        REGISTER.call_once(|| unsafe {
            libc::atexit(on_exit);
        });
    }

    extern "C" fn on_exit() {
        if let Ok(pids) = PIDS.lock() {
            for pid in pids.iter().copied().filter(|pid| *pid > 0) {
                unsafe {
                    libc::kill(pid, libc::SIGTERM);
                }
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

async fn spawn_backend(backend: Backend) -> String {
    let kpi = move || async move {
        if backend.kpi {
            Json(json!({
                "ingresos_neto": 1000.0,
                "cogs_neto": 600.0,
                "margen_bruto": 400.0,
                "gastos_neto": 200.0,
                "beneficio_neto": 200.0
            }))
            .into_response()
        } else {
            (StatusCode::SERVICE_UNAVAILABLE, "database offline").into_response()
        }
    };

    let series = move |Query(params): Query<HashMap<String, String>>| async move {
        if !backend.series {
            return (StatusCode::NOT_FOUND, "Not Found").into_response();
        }
        if params.get("days").map(String::as_str) != Some("30") {
            return (StatusCode::BAD_REQUEST, "expected days=30").into_response();
        }
        Json(json!([
            { "date": "2025-03-01", "ingresos": 120.0, "cogs": 70.0, "margen": 50.0 },
            { "date": "2025-03-02", "ingresos": 90.0, "cogs": 60.0, "margen": 30.0 }
        ]))
        .into_response()
    };

    let reorder = move |Query(params): Query<HashMap<String, String>>| async move {
        if !backend.reorder {
            return (StatusCode::INTERNAL_SERVER_ERROR, "backend exploded").into_response();
        }
        if params.get("h").map(String::as_str) != Some("14") {
            return (StatusCode::BAD_REQUEST, "expected h=14").into_response();
        }
        Json(json!([
            { "product_id": "SKU-001", "name": "Sandalia", "demand_h": 20, "stock_on_hand": 5,
              "lead_time_days": 7, "safety_stock": 4, "reorder_qty": 9 },
            { "product_id": "SKU-002", "demand_h": 8, "stock_on_hand": 10,
              "lead_time_days": 5, "safety_stock": 2, "reorder_qty": 0 }
        ]))
        .into_response()
    };

    let app = Router::new()
        .route("/api/sales/kpi", get(kpi))
        .route("/api/sales/series", get(series))
        .route("/api/inventory/reorder", get(reorder));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind backend stub");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/health")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server(api_url: &str) -> TestServer {
    let port = pick_free_port();
    let child = Command::new(env!("CARGO_BIN_EXE_leaf_dashboard"))
        .env("PORT", port.to_string())
        .env("API_URL", api_url)
        .env("DASHBOARD_LOCALE", "en-US")
        .env("DASHBOARD_CURRENCY", "USD")
        .env_remove("SERIES_DAYS")
        .env_remove("REORDER_HORIZON_DAYS")
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer { base_url, child }
}

#[tokio::test]
async fn http_panel_renders_cards_and_charts() {
    let _guard = TEST_LOCK.lock().await;
    let backend = spawn_backend(Backend::HEALTHY).await;
    // Trailing slashes on the configured base URL must not break request paths.
    let server = spawn_server(&format!("{backend}///")).await;

    let response = Client::new()
        .get(format!("{}/panel", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let html = response.text().await.unwrap();

    let revenue = html.find("Net revenue").expect("revenue card");
    let cogs = html.find("Cost of sales (COGS)").expect("cogs card");
    let profit = html.find("Net profit").expect("profit card");
    assert!(revenue < cogs && cogs < profit);
    assert!(html.contains("$1,000"));
    assert!(html.contains("$600"));
    assert!(html.contains("$400"));

    assert_eq!(html.matches("<svg").count(), 2);
    assert!(html.contains("03-01"));
    assert!(html.contains("Sandalia"));
    assert!(html.contains("SKU-002"));
    assert!(!html.contains(SERIES_EMPTY_MESSAGE));
    assert!(!html.contains(REORDER_EMPTY_MESSAGE));
}

#[tokio::test]
async fn http_optional_sources_fall_back_to_empty_states() {
    let _guard = TEST_LOCK.lock().await;
    let backend = spawn_backend(Backend {
        series: false,
        reorder: false,
        ..Backend::HEALTHY
    })
    .await;
    let server = spawn_server(&backend).await;

    let response = Client::new()
        .get(format!("{}/panel", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let html = response.text().await.unwrap();

    assert!(html.contains("$1,000"));
    assert!(html.contains(SERIES_EMPTY_MESSAGE));
    assert!(html.contains(REORDER_EMPTY_MESSAGE));
    assert!(!html.contains("<svg"));
}

#[tokio::test]
async fn http_kpi_failure_fails_the_page() {
    let _guard = TEST_LOCK.lock().await;
    let backend = spawn_backend(Backend {
        kpi: false,
        ..Backend::HEALTHY
    })
    .await;
    let server = spawn_server(&backend).await;
    let client = Client::new();

    let response = client
        .get(format!("{}/panel", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 502);
    let body = response.text().await.unwrap();
    assert!(body.contains("/api/sales/kpi"));
    assert!(body.contains("503"));
    assert!(body.contains("database offline"));

    let response = client
        .get(format!("{}/api/dashboard", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 502);
}

#[tokio::test]
async fn http_dashboard_json_and_root_redirect() {
    let _guard = TEST_LOCK.lock().await;
    let backend = spawn_backend(Backend {
        reorder: false,
        ..Backend::HEALTHY
    })
    .await;
    let server = spawn_server(&backend).await;

    let data: DashboardResponse = Client::new()
        .get(format!("{}/api/dashboard", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(data.kpi.get("net_revenue"), Some(&Some(1000.0)));
    assert_eq!(data.kpi.get("net_profit"), Some(&Some(200.0)));
    assert_eq!(data.series.len(), 2);
    assert_eq!(data.series[0]["revenue"], 120.0);
    assert!(data.reorder.is_empty());

    let no_redirects = Client::builder().redirect(Policy::none()).build().unwrap();
    let response = no_redirects
        .get(format!("{}/", server.base_url))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_redirection());
    assert_eq!(
        response.headers().get("location").and_then(|v| v.to_str().ok()),
        Some("/panel")
    );
}
