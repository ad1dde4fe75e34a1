use once_cell::sync::Lazy;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryResponse {
    user_id: String,
    tracker: String,
    today: String,
    summary: Value,
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
static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

#[cfg(unix)]
mod cleanup {
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Once;

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
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

fn unique_data_path() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("wellness_http_{}_{}.json", std::process::id(), nanos));
    path.to_string_lossy().to_string()
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/health")).send().await {
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

async fn spawn_server() -> TestServer {
    let port = pick_free_port();
    let data_path = unique_data_path();
    let child = Command::new(env!("CARGO_BIN_EXE_wellness_dashboard"))
        .env("PORT", port.to_string())
        .env("APP_DATA_PATH", data_path)
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

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server().await);
    *guard = Some(Arc::clone(&server));
    server
}

fn user_url(server: &TestServer, user: &str) -> String {
    format!("{}/api/users/{user}", server.base_url)
}

#[tokio::test]
async fn http_health_reports_ok() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;

    let body: Value = Client::new()
        .get(format!("{}/health", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn http_user_record_lifecycle() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    let url = user_url(&server, "lifecycle");

    let missing = client.get(&url).send().await.unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    let created: Value = client.post(&url).send().await.unwrap().json().await.unwrap();
    assert_eq!(created["userId"], "lifecycle");
    assert_eq!(created["schemaVersion"], 1);
    assert_eq!(created["habitTracker"], json!([]));
    assert_eq!(created["waterIntake"]["settings"]["dailyGoal"], 2000.0);

    let again: Value = client.post(&url).send().await.unwrap().json().await.unwrap();
    assert_eq!(again, created);

    let deleted = client.delete(&url).send().await.unwrap();
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);
    let gone = client.delete(&url).send().await.unwrap();
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn http_put_then_summarize_sleep() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    let tracker_url = format!("{}/trackers/sleepTracker", user_url(&server, "sleeper"));

    let entries = json!([
        {
            "date": "2024-01-01",
            "sessions": [{ "sleepTime": "23:00", "wakeTime": "07:00", "duration": 8, "quality": 4 }]
        }
    ]);
    let saved = client.put(&tracker_url).json(&entries).send().await.unwrap();
    assert!(saved.status().is_success());

    let stored: Value = client.get(&tracker_url).send().await.unwrap().json().await.unwrap();
    assert_eq!(stored[0]["sessions"][0]["duration"], 8.0);

    let summary: SummaryResponse = client
        .get(format!("{tracker_url}/summary"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(summary.user_id, "sleeper");
    assert_eq!(summary.tracker, "sleepTracker");
    assert!(!summary.today.is_empty());
    assert!(!summary.summary["insights"].as_array().unwrap().is_empty());

    let reset: Value = client.delete(&tracker_url).send().await.unwrap().json().await.unwrap();
    assert_eq!(reset, json!([]));
}

#[tokio::test]
async fn http_rejects_unknown_tracker_and_bad_shapes() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    let base = user_url(&server, "strict");

    let unknown = client
        .get(format!("{base}/trackers/kanbanBoard"))
        .send()
        .await
        .unwrap();
    assert_eq!(unknown.status(), StatusCode::BAD_REQUEST);

    let wrong_shape = client
        .put(format!("{base}/trackers/waterIntake"))
        .json(&json!({ "dailyIntakes": "plenty" }))
        .send()
        .await
        .unwrap();
    assert_eq!(wrong_shape.status(), StatusCode::BAD_REQUEST);
    let message = wrong_shape.text().await.unwrap();
    assert!(message.starts_with("invalid waterIntake data"));
}

#[tokio::test]
async fn http_dashboard_for_unknown_user_is_empty() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;

    let dashboard: Value = Client::new()
        .get(format!("{}/dashboard", user_url(&server, "newcomer")))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(dashboard["insights"], json!([]));
    assert!(dashboard["recommendation"]
        .as_str()
        .unwrap()
        .starts_with("Focus on start tracking expenses"));
}

#[tokio::test]
async fn http_padded_user_id_reaches_the_same_record() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    let padded = user_url(&server, "%20padded%20");
    let plain = user_url(&server, "padded");

    let entries = json!([{ "date": "2024-02-01", "mood": 6, "emotion": "Calm" }]);
    let saved = client
        .put(format!("{padded}/trackers/moodTracker"))
        .json(&entries)
        .send()
        .await
        .unwrap();
    assert!(saved.status().is_success());

    let stored: Value = client
        .get(format!("{padded}/trackers/moodTracker"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stored[0]["mood"], 6);

    let record: Value = client.get(&padded).send().await.unwrap().json().await.unwrap();
    assert_eq!(record["userId"], "padded");

    let summary: SummaryResponse = client
        .get(format!("{padded}/trackers/moodTracker/summary"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(summary.user_id, "padded");

    let blank = client.get(user_url(&server, "%20%20")).send().await.unwrap();
    assert_eq!(blank.status(), StatusCode::BAD_REQUEST);

    let deleted = client.delete(&padded).send().await.unwrap();
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);
    let gone = client.get(&plain).send().await.unwrap();
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
}
