//! Handler pipeline tests for the auth crate
//!
//! Requests go through the real router and session layer, backed by the
//! in-memory repository and the templates under `ui/html`.

#[cfg(test)]
mod support {
    use std::sync::Arc;

    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, Response, header};
    use platform::password::PasswordHasher;
    use platform::template::Templates;
    use tower::ServiceExt;

    use crate::application::config::AuthConfig;
    use crate::domain::repository::{SessionRepository, UserRepository};
    use crate::presentation::middleware::{SessionManager, load_and_save_session};
    use crate::presentation::router::auth_router;

    pub fn templates() -> Arc<Templates> {
        let dir = concat!(env!("CARGO_MANIFEST_DIR"), "/../../../ui/html");
        Arc::new(Templates::load(dir).unwrap())
    }

    pub fn config() -> Arc<AuthConfig> {
        let hasher = PasswordHasher::with_cost(8, 1, 1).unwrap();
        Arc::new(AuthConfig::development().unwrap().with_password_hasher(hasher))
    }

    pub fn app<R>(repo: R) -> Router
    where
        R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
    {
        let config = config();
        auth_router(repo.clone(), config.clone(), templates()).layer(
            axum::middleware::from_fn_with_state(
                SessionManager::new(repo, config),
                load_and_save_session::<R>,
            ),
        )
    }

    pub async fn send(app: &Router, req: Request<Body>) -> Response<Body> {
        app.clone().oneshot(req).await.unwrap()
    }

    pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::empty()).unwrap()
    }

    pub fn post_form(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    /// `session=...` pair from the response's Set-Cookie, if any
    pub fn session_cookie(res: &Response<Body>) -> Option<String> {
        res.headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find(|v| v.starts_with("session="))
            .and_then(|v| v.split(';').next())
            .map(str::to_string)
    }

    pub fn location(res: &Response<Body>) -> &str {
        res.headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
    }

    pub async fn body_string(res: Response<Body>) -> String {
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    pub const ALICE: &str =
        "username=alice&email=alice%40example.com&password=password123&confirm-password=password123";

    /// Register alice and log her in; returns the authenticated cookie
    pub async fn logged_in(app: &Router) -> String {
        let res = send(app, post_form("/user/register", ALICE, None)).await;
        assert_eq!(res.status(), 303);

        let res = send(
            app,
            post_form("/user/login", "username=alice&password=password123", None),
        )
        .await;
        assert_eq!(res.status(), 303);
        session_cookie(&res).unwrap()
    }
}

#[cfg(test)]
mod register_tests {
    use super::support::*;
    use crate::domain::repository::UserRepository;
    use crate::infra::memory::MemoryAuthRepository;
    use kernel::id::UserId;

    #[tokio::test]
    async fn test_register_page_renders_empty_form() {
        let app = app(MemoryAuthRepository::new());

        let res = send(&app, get("/user/register", None)).await;
        assert_eq!(res.status(), 200);
        // Anonymous page views do not create sessions
        assert!(session_cookie(&res).is_none());

        let body = body_string(res).await;
        assert!(body.contains("name=\"confirm-password\""));
    }

    #[tokio::test]
    async fn test_register_redirects_and_flashes() {
        let repo = MemoryAuthRepository::new();
        let app = app(repo.clone());

        let res = send(&app, post_form("/user/register", ALICE, None)).await;
        assert_eq!(res.status(), 303);
        assert_eq!(location(&res), "/user/login");

        let cookie = session_cookie(&res).expect("flash needs a session");
        let user = repo.get(UserId::new(1)).await.unwrap().unwrap();
        assert_eq!(user.username, "alice");
        assert_eq!(user.email, "alice@example.com");
        assert_ne!(user.password_hash.as_phc_string(), "password123");

        let res = send(&app, get("/user/login", Some(&cookie))).await;
        assert_eq!(res.status(), 200);
        let body = body_string(res).await;
        assert!(body.contains("User registered successfully"));

        // Flash is one-shot
        let res = send(&app, get("/user/login", Some(&cookie))).await;
        let body = body_string(res).await;
        assert!(!body.contains("User registered successfully"));
    }

    #[tokio::test]
    async fn test_duplicate_username_rerenders_with_field_error() {
        let app = app(MemoryAuthRepository::new());
        send(&app, post_form("/user/register", ALICE, None)).await;

        let res = send(
            &app,
            post_form(
                "/user/register",
                "username=alice&email=other%40example.com&password=password123&confirm-password=password123",
                None,
            ),
        )
        .await;
        assert_eq!(res.status(), 422);

        let body = body_string(res).await;
        assert!(body.contains("Username is already in use"));
        assert!(body.contains("value=\"other@example.com\""));
    }

    #[tokio::test]
    async fn test_duplicate_email_rerenders_with_field_error() {
        let app = app(MemoryAuthRepository::new());
        send(&app, post_form("/user/register", ALICE, None)).await;

        let res = send(
            &app,
            post_form(
                "/user/register",
                "username=bob&email=alice%40example.com&password=password123&confirm-password=password123",
                None,
            ),
        )
        .await;
        assert_eq!(res.status(), 422);

        let body = body_string(res).await;
        assert!(body.contains("Email address is already in use"));

        let res = send(
            &app,
            post_form(
                "/user/register",
                "username=carol&email=ALICE%40Example.com&password=password123&confirm-password=password123",
                None,
            ),
        )
        .await;
        assert_eq!(res.status(), 422);
        assert!(body_string(res).await.contains("Email address is already in use"));
    }

    #[tokio::test]
    async fn test_invalid_form_keeps_values_but_not_passwords() {
        let repo = MemoryAuthRepository::new();
        let app = app(repo.clone());

        let res = send(
            &app,
            post_form(
                "/user/register",
                "username=carol&email=&password=hunter2hunter2&confirm-password=nope",
                None,
            ),
        )
        .await;
        assert_eq!(res.status(), 422);

        let body = body_string(res).await;
        assert!(body.contains("This field cannot be empty"));
        assert!(body.contains("Passwords do not match"));
        assert!(body.contains("value=\"carol\""));
        assert!(!body.contains("hunter2hunter2"));

        assert!(repo.get(UserId::new(1)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_missing_fields_count_as_blank() {
        let app = app(MemoryAuthRepository::new());

        let res = send(&app, post_form("/user/register", "", None)).await;
        assert_eq!(res.status(), 422);
    }

    #[tokio::test]
    async fn test_non_form_body_is_bad_request() {
        let app = app(MemoryAuthRepository::new());

        let req = axum::http::Request::builder()
            .method("POST")
            .uri("/user/register")
            .header(axum::http::header::CONTENT_TYPE, "text/plain")
            .body(axum::body::Body::from("username=alice"))
            .unwrap();

        let res = send(&app, req).await;
        assert_eq!(res.status(), 400);
    }
}

#[cfg(test)]
mod login_tests {
    use super::support::*;
    use crate::infra::memory::MemoryAuthRepository;

    #[tokio::test]
    async fn test_wrong_password_and_unknown_user_look_the_same() {
        let app = app(MemoryAuthRepository::new());
        send(&app, post_form("/user/register", ALICE, None)).await;

        let wrong_password = send(
            &app,
            post_form("/user/login", "username=alice&password=wrongpassword", None),
        )
        .await;
        let unknown_user = send(
            &app,
            post_form("/user/login", "username=mallory&password=password123", None),
        )
        .await;

        assert_eq!(wrong_password.status(), 422);
        assert_eq!(unknown_user.status(), 422);

        let a = body_string(wrong_password).await;
        let b = body_string(unknown_user).await;
        assert!(a.contains("Username or password is incorrect"));
        assert!(b.contains("Username or password is incorrect"));
    }

    #[tokio::test]
    async fn test_login_renews_token_and_redirects_home() {
        let app = app(MemoryAuthRepository::new());

        let res = send(&app, post_form("/user/register", ALICE, None)).await;
        let anonymous = session_cookie(&res).unwrap();

        let res = send(
            &app,
            post_form(
                "/user/login",
                "username=alice&password=password123",
                Some(&anonymous),
            ),
        )
        .await;
        assert_eq!(res.status(), 303);
        assert_eq!(location(&res), "/");

        let authenticated = session_cookie(&res).unwrap();
        assert_ne!(authenticated, anonymous);

        // The pre-login token no longer refers to a session
        let res = send(&app, get("/user/logout", Some(&anonymous))).await;
        assert_eq!(res.status(), 303);
        assert_eq!(location(&res), "/user/login");
        assert!(session_cookie(&res).is_none());
    }

    #[tokio::test]
    async fn test_authenticated_users_are_sent_home() {
        let app = app(MemoryAuthRepository::new());
        let cookie = logged_in(&app).await;

        for uri in ["/user/login", "/user/register"] {
            let res = send(&app, get(uri, Some(&cookie))).await;
            assert_eq!(res.status(), 303, "{uri}");
            assert_eq!(location(&res), "/");
        }
    }

    #[tokio::test]
    async fn test_forged_cookie_is_ignored() {
        let app = app(MemoryAuthRepository::new());
        let forged = format!("session={}.AAAA", uuid::Uuid::new_v4());

        let res = send(&app, get("/user/login", Some(&forged))).await;
        assert_eq!(res.status(), 200);
    }
}

#[cfg(test)]
mod logout_tests {
    use super::support::*;
    use crate::infra::memory::MemoryAuthRepository;
    use axum::http::header;

    #[tokio::test]
    async fn test_logout_requires_authentication() {
        let app = app(MemoryAuthRepository::new());

        let res = send(&app, get("/user/logout", None)).await;
        assert_eq!(res.status(), 303);
        assert_eq!(location(&res), "/user/login");
        assert_eq!(res.headers()[header::CACHE_CONTROL], "no-store");
    }

    #[tokio::test]
    async fn test_logout_clears_authentication() {
        let repo = MemoryAuthRepository::new();
        let app = app(repo.clone());
        let cookie = logged_in(&app).await;
        let sessions_before = repo.session_count();

        let res = send(&app, get("/user/logout", Some(&cookie))).await;
        assert_eq!(res.status(), 303);
        assert_eq!(location(&res), "/user/login");
        assert_eq!(res.headers()[header::CACHE_CONTROL], "no-store");

        let renewed = session_cookie(&res).unwrap();
        assert_ne!(renewed, cookie);
        // Old record removed, new one written
        assert_eq!(repo.session_count(), sessions_before);

        let res = send(&app, get("/user/login", Some(&renewed))).await;
        assert_eq!(res.status(), 200);
        let body = body_string(res).await;
        assert!(body.contains("User logged out successfully"));
        assert!(body.contains("href=\"/user/register\""));
    }
}

/// Repository whose user or session side can be switched to failing mid-test
#[cfg(test)]
mod flaky {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use kernel::id::UserId;
    use uuid::Uuid;

    use crate::domain::entity::session::SessionRecord;
    use crate::domain::entity::user::{Credentials, NewUser, User};
    use crate::domain::repository::{SessionRepository, UserRepository};
    use crate::error::{AuthError, AuthResult};
    use crate::infra::memory::MemoryAuthRepository;

    #[derive(Clone, Default)]
    pub struct FlakyRepository {
        inner: MemoryAuthRepository,
        pub fail_user_lookup: Arc<AtomicBool>,
        pub fail_users: Arc<AtomicBool>,
        pub fail_sessions: Arc<AtomicBool>,
    }

    fn check(flag: &AtomicBool) -> AuthResult<()> {
        if flag.load(Ordering::SeqCst) {
            return Err(AuthError::Database(sqlx::Error::Protocol(
                "connection reset by peer".into(),
            )));
        }
        Ok(())
    }

    impl UserRepository for FlakyRepository {
        async fn insert(&self, user: &NewUser) -> AuthResult<UserId> {
            check(&self.fail_users)?;
            self.inner.insert(user).await
        }

        async fn find_credentials(&self, username: &str) -> AuthResult<Option<Credentials>> {
            check(&self.fail_users)?;
            self.inner.find_credentials(username).await
        }

        async fn get(&self, id: UserId) -> AuthResult<Option<User>> {
            check(&self.fail_user_lookup)?;
            self.inner.get(id).await
        }
    }

    impl SessionRepository for FlakyRepository {
        async fn load(&self, id: Uuid) -> AuthResult<Option<SessionRecord>> {
            check(&self.fail_sessions)?;
            self.inner.load(id).await
        }

        async fn save(&self, record: &SessionRecord) -> AuthResult<()> {
            check(&self.fail_sessions)?;
            self.inner.save(record).await
        }

        async fn remove(&self, id: Uuid) -> AuthResult<()> {
            check(&self.fail_sessions)?;
            self.inner.remove(id).await
        }

        async fn cleanup_expired(&self) -> AuthResult<u64> {
            check(&self.fail_sessions)?;
            self.inner.cleanup_expired().await
        }
    }
}

#[cfg(test)]
mod store_failure_tests {
    use std::sync::atomic::Ordering;

    use super::flaky::FlakyRepository;
    use super::support::*;

    async fn assert_internal_error(res: axum::http::Response<axum::body::Body>) {
        assert_eq!(res.status(), 500);
        let body = body_string(res).await;
        assert_eq!(body, "Internal Server Error");
        assert!(!body.contains("connection reset"));
    }

    #[tokio::test]
    async fn test_logout_survives_failed_user_lookup() {
        let repo = FlakyRepository::default();
        let app = app(repo.clone());
        let cookie = logged_in(&app).await;

        repo.fail_user_lookup.store(true, Ordering::SeqCst);

        let res = send(&app, get("/user/logout", Some(&cookie))).await;
        assert_eq!(res.status(), 303);
        assert_eq!(location(&res), "/user/login");
        assert!(session_cookie(&res).is_some());
    }

    #[tokio::test]
    async fn test_user_store_failure_is_500() {
        let repo = FlakyRepository::default();
        let app = app(repo.clone());
        repo.fail_users.store(true, Ordering::SeqCst);

        let res = send(&app, post_form("/user/register", ALICE, None)).await;
        assert_internal_error(res).await;

        let res = send(
            &app,
            post_form("/user/login", "username=alice&password=password123", None),
        )
        .await;
        assert_internal_error(res).await;
    }

    #[tokio::test]
    async fn test_session_save_failure_is_500() {
        let repo = FlakyRepository::default();
        let app = app(repo.clone());
        repo.fail_sessions.store(true, Ordering::SeqCst);

        // Nothing to save: the store is never touched
        let res = send(&app, get("/user/login", None)).await;
        assert_eq!(res.status(), 200);

        // The flash has to be saved
        let res = send(&app, post_form("/user/register", ALICE, None)).await;
        assert_internal_error(res).await;
    }

    #[tokio::test]
    async fn test_session_load_failure_is_500() {
        let repo = FlakyRepository::default();
        let app = app(repo.clone());
        let cookie = logged_in(&app).await;

        repo.fail_sessions.store(true, Ordering::SeqCst);

        let res = send(&app, get("/user/login", Some(&cookie))).await;
        assert_internal_error(res).await;
    }
}
