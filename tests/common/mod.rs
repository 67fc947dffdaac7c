use axum::http::StatusCode;
use axum_test::TestServer;
use chrono::{TimeZone, Utc};
use serde_json::{json, Value};
use std::sync::Arc;

use taskboard::modules::auth::interface::UserRepository;
use taskboard::modules::auth::memory::{InMemoryResetCodeRepository, InMemoryUserRepository};
use taskboard::modules::auth::model::User;
use taskboard::modules::tasks::memory::InMemoryTaskRepository;
use taskboard::services::clock::{Clock, ManualClock};
use taskboard::services::hashing;
use taskboard::services::jwt::JwtService;
use taskboard::services::mailer::MemoryMailer;
use taskboard::services::metrics::MetricsRegistry;
use taskboard::AppState;

pub const MAIL_FROM: &str = "noreply@taskboard.test";

// Allow dead_code for utilities used by other test files
#[allow(dead_code)]
pub struct TestContext {
    pub server: TestServer,
    pub users: Arc<InMemoryUserRepository>,
    pub reset_codes: Arc<InMemoryResetCodeRepository>,
    pub tasks: Arc<InMemoryTaskRepository>,
    pub mailer: MemoryMailer,
    pub clock: ManualClock,
}

#[allow(dead_code)]
impl TestContext {
    pub async fn new() -> Self {
        Self::with_mailer(MemoryMailer::new()).await
    }

    pub async fn with_mailer(mailer: MemoryMailer) -> Self {
        let users = Arc::new(InMemoryUserRepository::new());
        let reset_codes = Arc::new(InMemoryResetCodeRepository::new());
        let tasks = Arc::new(InMemoryTaskRepository::new());
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 5, 15, 9, 0, 0).unwrap());

        let state = AppState {
            users: users.clone(),
            reset_codes: reset_codes.clone(),
            tasks: tasks.clone(),
            mailer: Arc::new(mailer.clone()),
            clock: Arc::new(clock.clone()),
            jwt_service: JwtService::new("test-secret-key-for-testing-only".to_string(), 60),
            mail_from: MAIL_FROM.to_string(),
            metrics: MetricsRegistry::new().expect("Failed to create metrics registry"),
        };

        let app = taskboard::create_app(state);
        let server = TestServer::new(app).expect("Failed to create test server");

        Self {
            server,
            users,
            reset_codes,
            tasks,
            mailer,
            clock,
        }
    }

    /// Registers through the API and returns the created user body.
    pub async fn register(&self, username: &str, password: &str) -> Value {
        let response = self
            .server
            .post("/auth/register")
            .json(&json!({
                "username": username,
                "email": format!("{}@example.com", username),
                "password1": password,
                "password2": password,
            }))
            .await;

        response.assert_status(StatusCode::CREATED);
        response.json::<Value>()["user"].clone()
    }

    pub async fn login(&self, username: &str, password: &str) -> String {
        let response = self
            .server
            .post("/auth/login")
            .json(&json!({ "username": username, "password": password }))
            .await;

        response.assert_status(StatusCode::OK);
        response.json::<Value>()["access_token"]
            .as_str()
            .expect("login response carries a token")
            .to_string()
    }

    /// Registers and logs in, returning `(user_id, access_token)`.
    pub async fn register_and_login(&self, username: &str) -> (String, String) {
        let user = self.register(username, test_password()).await;
        let token = self.login(username, test_password()).await;
        (user["id"].as_str().unwrap().to_string(), token)
    }

    /// Staff accounts cannot be created through public registration, so the
    /// admin is seeded straight into the repository.
    pub async fn admin_token(&self) -> (String, String) {
        let admin = User {
            id: uuid::Uuid::new_v4().to_string(),
            username: "admin".to_string(),
            email: "admin@example.com".to_string(),
            password_hash: hashing::hash_password(test_password()).unwrap(),
            first_name: String::new(),
            last_name: String::new(),
            is_staff: true,
            is_superuser: true,
            is_active: true,
            date_joined: self.clock.utc(),
        };
        self.users.create(&admin).await.unwrap();

        let token = self.login("admin", test_password()).await;
        (admin.id, token)
    }

    pub async fn create_task(&self, token: &str, title: &str, due_date: &str) -> Value {
        let response = self
            .server
            .post("/tasks/create")
            .authorization_bearer(token)
            .json(&task_body(title, due_date))
            .await;

        response.assert_status(StatusCode::CREATED);
        response.json::<Value>()["task"].clone()
    }

    /// Code from the most recent reset email.
    pub fn last_reset_code(&self) -> String {
        let mail = self.mailer.last().expect("a reset email was sent");
        extract_code(&mail.body)
    }
}

#[allow(dead_code)]
pub fn test_password() -> &'static str {
    "TestPassword123!"
}

#[allow(dead_code)]
pub fn task_body(title: &str, due_date: &str) -> Value {
    json!({
        "title": title,
        "description": "Some details",
        "priority": "medium",
        "due_date": due_date,
        "status": "todo",
        "category": "work",
        "is_completed": false,
    })
}

#[allow(dead_code)]
pub fn extract_code(body: &str) -> String {
    let marker = "code is: ";
    let start = body.find(marker).expect("mail body contains the code") + marker.len();
    body[start..start + 6].to_string()
}
