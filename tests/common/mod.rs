// SPDX-License-Identifier: MIT

use chalkline::db::FirestoreDb;
use chalkline::media::NoopMediaStorage;
use chalkline::models::{Gym, User};
use chalkline::{Config, Repositories};
use std::sync::{Arc, Once};

static TRACING: Once = Once::new();

/// Initialize tracing once per test binary, honoring RUST_LOG.
#[allow(dead_code)]
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .try_init();
    });
}

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    init_tracing();
    let config = Config::test_default();
    FirestoreDb::new(&config.gcp_project_id)
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Wired repository bundle against the emulator, with no-op media
/// storage.
#[allow(dead_code)]
pub async fn test_repos() -> Repositories {
    Repositories::new(test_db().await, Arc::new(NoopMediaStorage))
}

/// Unique id suffix for test isolation; the emulator state is shared
/// across tests in one run.
#[allow(dead_code)]
pub fn unique_id(prefix: &str) -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{}-{}", prefix, nanos)
}

/// Store a fresh user profile and return it.
#[allow(dead_code)]
pub async fn seed_user(repos: &Repositories, prefix: &str) -> User {
    let user = User {
        id: unique_id(prefix),
        email: format!("{}@example.com", prefix),
        first_name: prefix.to_string(),
        last_name: "Tester".to_string(),
        bio: None,
        post_count: 0,
        logged_hours: 0.0,
        image_url: None,
        created_at: chrono::Utc::now(),
    };
    repos.users.update(&user).await.expect("seed user");
    user
}

/// Gym value for tests. Not persisted; pair with `seed_gym` when the
/// store needs to resolve it.
#[allow(dead_code)]
pub fn make_gym(prefix: &str) -> Gym {
    serde_json::from_value(serde_json::json!({
        "id": unique_id(prefix),
        "name": format!("{} Boulders", prefix),
        "email": format!("{}@gyms.example.com", prefix),
        "location": "Test Town",
        "climbing_type": ["bouldering"],
        "created_at": chrono::Utc::now().to_rfc3339(),
    }))
    .expect("test gym json")
}

/// Store a fresh gym and return it.
#[allow(dead_code)]
pub async fn seed_gym(repos: &Repositories, prefix: &str) -> Gym {
    let gym = make_gym(prefix);
    repos.gyms.upsert(&gym).await.expect("seed gym");
    gym
}
