use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use chorely_core::models::{LoginRequest, NewTaskInstance};
use chorely_core::{ApiClient, ApiConfig, ApiError, ApiOutcome, ApiRequest, Session, SessionStore};
use jsonwebtoken::{EncodingKey, Header, encode};
use mockito::{Matcher, Server, ServerGuard};
use serde_json::{Value, json};

struct Harness {
    server: ServerGuard,
    client: ApiClient,
    store: SessionStore,
    navigations: Arc<AtomicUsize>,
}

impl Harness {
    async fn new(session: Session) -> Self {
        let server = Server::new_async().await;
        let store = SessionStore::with_session(session);
        let navigations = Arc::new(AtomicUsize::new(0));
        let counter = navigations.clone();

        let client = ApiClient::new(&ApiConfig::with_base_url(server.url()), store.clone())
            .expect("client builds")
            .with_navigation(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });

        Self {
            server,
            client,
            store,
            navigations,
        }
    }

    fn navigations(&self) -> usize {
        self.navigations.load(Ordering::SeqCst)
    }
}

fn jwt_expiring_in(secs: i64) -> String {
    encode(
        &Header::default(),
        &json!({"sub": "parent-1", "exp": chrono::Utc::now().timestamp() + secs}),
        &EncodingKey::from_secret(b"backend-secret"),
    )
    .expect("token encodes")
}

fn session(access: &str, refresh: Option<String>) -> Session {
    Session {
        access_token: Some(access.to_string()),
        refresh_token: refresh,
        user: Some(json!({"id": "u1", "email": "parent@example.com", "name": "Pat"})),
    }
}

fn add_task_request() -> ApiRequest {
    ApiRequest::post("/taskInstance/add")
        .with_json(&NewTaskInstance {
            template_id: "t1".into(),
            child_id: "c1".into(),
            date: "2025-01-01".into(),
            status: None,
            notes: None,
        })
        .unwrap()
}

fn add_task_body() -> Matcher {
    Matcher::Json(json!({"templateId": "t1", "childId": "c1", "date": "2025-01-01"}))
}

#[tokio::test]
async fn test_valid_token_single_call() {
    let mut h = Harness::new(session("valid", Some(jwt_expiring_in(3600)))).await;

    let get = h
        .server
        .mock("GET", "/child/get")
        .match_header("authorization", "Bearer valid")
        .match_header("content-type", "application/json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message":"ok","data":[{"id":"c1"}]}"#)
        .expect(1)
        .create_async()
        .await;
    let refresh = h
        .server
        .mock("POST", "/auth/refresh-token")
        .expect(0)
        .create_async()
        .await;

    let outcome: ApiOutcome<Value> = h.client.execute(&ApiRequest::get("/child/get")).await.unwrap();

    get.assert_async().await;
    refresh.assert_async().await;
    assert_eq!(
        outcome,
        ApiOutcome::Ok(json!({"message": "ok", "data": [{"id": "c1"}]}))
    );
    assert_eq!(h.navigations(), 0);
}

#[tokio::test]
async fn test_unauthorized_refreshes_and_retries_with_new_token() {
    let refresh_token = jwt_expiring_in(3600);
    let mut h = Harness::new(session("old", Some(refresh_token.clone()))).await;

    let rejected = h
        .server
        .mock("POST", "/taskInstance/add")
        .match_header("authorization", "Bearer old")
        .match_body(add_task_body())
        .with_status(401)
        .with_body(r#"{"message":"jwt expired"}"#)
        .expect(1)
        .create_async()
        .await;
    let refresh = h
        .server
        .mock("POST", "/auth/refresh-token")
        .match_body(Matcher::Json(json!({"refreshToken": refresh_token})))
        .with_status(200)
        .with_body(r#"{"data":{"accessToken":"new"}}"#)
        .expect(1)
        .create_async()
        .await;
    let retried = h
        .server
        .mock("POST", "/taskInstance/add")
        .match_header("authorization", "Bearer new")
        .match_body(add_task_body())
        .with_status(201)
        .with_body(r#"{"message":"created","data":{"id":"i1"}}"#)
        .expect(1)
        .create_async()
        .await;

    let outcome: ApiOutcome<Value> = h.client.execute(&add_task_request()).await.unwrap();

    rejected.assert_async().await;
    refresh.assert_async().await;
    retried.assert_async().await;
    assert_eq!(
        outcome,
        ApiOutcome::Ok(json!({"message": "created", "data": {"id": "i1"}}))
    );
    assert_eq!(h.store.access_token().as_deref(), Some("new"));
    assert_eq!(h.store.refresh_token(), Some(refresh_token));
    assert_eq!(h.navigations(), 0);
}

#[tokio::test]
async fn test_expired_refresh_token_logs_out_without_error() {
    let mut h = Harness::new(session("old", Some(jwt_expiring_in(-60)))).await;

    let rejected = h
        .server
        .mock("POST", "/taskInstance/add")
        .with_status(401)
        .expect(1)
        .create_async()
        .await;
    let refresh = h
        .server
        .mock("POST", "/auth/refresh-token")
        .expect(0)
        .create_async()
        .await;

    let outcome: ApiOutcome<Value> = h.client.execute(&add_task_request()).await.unwrap();

    rejected.assert_async().await;
    refresh.assert_async().await;
    assert!(outcome.is_session_expired());
    assert_eq!(h.store.current(), Session::default());
    assert_eq!(h.navigations(), 1);
}

#[tokio::test]
async fn test_missing_refresh_token_logs_out() {
    let mut h = Harness::new(session("old", None)).await;

    let rejected = h
        .server
        .mock("GET", "/child/get")
        .with_status(401)
        .expect(1)
        .create_async()
        .await;
    let refresh = h
        .server
        .mock("POST", "/auth/refresh-token")
        .expect(0)
        .create_async()
        .await;

    let outcome: ApiOutcome<Value> = h.client.execute(&ApiRequest::get("/child/get")).await.unwrap();

    rejected.assert_async().await;
    refresh.assert_async().await;
    assert_eq!(outcome, ApiOutcome::SessionExpired);
    assert!(h.store.current().is_empty());
    assert_eq!(h.navigations(), 1);
}

#[tokio::test]
async fn test_refresh_failure_logs_out_and_returns_refresh_error() {
    let mut h = Harness::new(session("old", Some(jwt_expiring_in(3600)))).await;

    let rejected = h
        .server
        .mock("POST", "/taskInstance/add")
        .with_status(401)
        .expect(1)
        .create_async()
        .await;
    let refresh = h
        .server
        .mock("POST", "/auth/refresh-token")
        .with_status(403)
        .with_body(r#"{"message":"refresh token revoked"}"#)
        .expect(1)
        .create_async()
        .await;

    let err = h
        .client
        .execute::<Value>(&add_task_request())
        .await
        .unwrap_err();

    rejected.assert_async().await;
    refresh.assert_async().await;
    assert!(err.is_session_expired());
    match err {
        ApiError::RefreshFailed(inner) => match *inner {
            ApiError::Status { status, body } => {
                assert_eq!(status.as_u16(), 403);
                assert!(body.contains("revoked"));
            }
            other => panic!("unexpected refresh error: {other:?}"),
        },
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(h.store.current().is_empty());
    assert_eq!(h.navigations(), 1);
}

#[tokio::test]
async fn test_non_auth_errors_propagate_unchanged() {
    let mut h = Harness::new(session("valid", Some(jwt_expiring_in(3600)))).await;

    let missing = h
        .server
        .mock("GET", "/child/get/nope")
        .with_status(404)
        .with_body(r#"{"message":"Child not found"}"#)
        .expect(1)
        .create_async()
        .await;
    let refresh = h
        .server
        .mock("POST", "/auth/refresh-token")
        .expect(0)
        .create_async()
        .await;

    let err = h
        .client
        .execute::<Value>(&ApiRequest::get("/child/get/nope"))
        .await
        .unwrap_err();

    missing.assert_async().await;
    refresh.assert_async().await;
    assert_eq!(err.status().map(|s| s.as_u16()), Some(404));
    assert!(!err.is_session_expired());
    assert_eq!(h.store.access_token().as_deref(), Some("valid"));
    assert_eq!(h.navigations(), 0);
}

#[tokio::test]
async fn test_transport_error_propagates() {
    let store = SessionStore::with_session(session("valid", None));
    let client = ApiClient::new(&ApiConfig::with_base_url("http://127.0.0.1:1"), store.clone()).unwrap();

    let err = client
        .execute::<Value>(&ApiRequest::get("/child/get"))
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Transport(_)), "{err:?}");
    assert!(store.is_authenticated());
}

#[tokio::test]
async fn test_retry_rejected_again_is_terminal() {
    let mut h = Harness::new(session("old", Some(jwt_expiring_in(3600)))).await;

    let rejected = h
        .server
        .mock("GET", "/taskTemplate/get")
        .with_status(401)
        .expect(2)
        .create_async()
        .await;
    let refresh = h
        .server
        .mock("POST", "/auth/refresh-token")
        .with_status(200)
        .with_body(r#"{"data":{"accessToken":"new"}}"#)
        .expect(1)
        .create_async()
        .await;

    let err = h
        .client
        .execute::<Value>(&ApiRequest::get("/taskTemplate/get"))
        .await
        .unwrap_err();

    rejected.assert_async().await;
    refresh.assert_async().await;
    assert!(matches!(err, ApiError::RetryRejected(_)), "{err:?}");
    assert!(err.is_unauthorized());
    assert!(err.is_session_expired());
    assert_eq!(h.store.current(), Session::default());
    assert_eq!(h.navigations(), 1);
}

#[tokio::test]
async fn test_identical_get_requests_have_identical_shape() {
    let mut h = Harness::new(session("valid", None)).await;

    let list = h
        .server
        .mock("GET", "/taskInstance/get")
        .match_query(Matcher::Exact("date=2025-01-01&childId=c1".to_string()))
        .match_header("authorization", "Bearer valid")
        .with_status(200)
        .with_body(r#"{"message":"ok","data":[]}"#)
        .expect(2)
        .create_async()
        .await;

    let request = ApiRequest::get("/taskInstance/get")
        .with_query("date", "2025-01-01")
        .with_query("childId", "c1");

    let first: ApiOutcome<Value> = h.client.execute(&request).await.unwrap();
    let second: ApiOutcome<Value> = h.client.execute(&request).await.unwrap();

    list.assert_async().await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_token_override_and_anonymous_requests() {
    let mut h = Harness::new(session("stored", None)).await;

    let overridden = h
        .server
        .mock("GET", "/child/get")
        .match_header("authorization", "Bearer override")
        .with_status(200)
        .with_body("{}")
        .expect(1)
        .create_async()
        .await;
    let anonymous = h
        .server
        .mock("GET", "/taskTemplate/get")
        .match_header("authorization", Matcher::Missing)
        .with_status(204)
        .expect(1)
        .create_async()
        .await;

    let _: ApiOutcome<Value> = h
        .client
        .execute(&ApiRequest::get("/child/get").with_token("override"))
        .await
        .unwrap();

    h.store.clear();
    let outcome: ApiOutcome<Option<Value>> = h
        .client
        .execute(&ApiRequest::get("/taskTemplate/get"))
        .await
        .unwrap();

    overridden.assert_async().await;
    anonymous.assert_async().await;
    assert_eq!(outcome, ApiOutcome::Ok(None));
}

#[tokio::test]
async fn test_concurrent_unauthorized_calls_refresh_once() {
    let mut h = Harness::new(session("old", Some(jwt_expiring_in(3600)))).await;

    let rejected = h
        .server
        .mock("GET", "/child/get")
        .match_header("authorization", "Bearer old")
        .with_status(401)
        .expect_at_least(1)
        .create_async()
        .await;
    let refresh = h
        .server
        .mock("POST", "/auth/refresh-token")
        .with_status(200)
        .with_body(r#"{"data":{"accessToken":"new"}}"#)
        .expect(1)
        .create_async()
        .await;
    let accepted = h
        .server
        .mock("GET", "/child/get")
        .match_header("authorization", "Bearer new")
        .with_status(200)
        .with_body(r#"{"message":"ok","data":[]}"#)
        .expect(2)
        .create_async()
        .await;

    let request = ApiRequest::get("/child/get");
    let (a, b) = tokio::join!(
        h.client.execute::<Value>(&request),
        h.client.execute::<Value>(&request)
    );

    assert!(matches!(a.unwrap(), ApiOutcome::Ok(_)));
    assert!(matches!(b.unwrap(), ApiOutcome::Ok(_)));
    rejected.assert_async().await;
    refresh.assert_async().await;
    accepted.assert_async().await;
    assert_eq!(h.store.access_token().as_deref(), Some("new"));
}

#[tokio::test]
async fn test_login_stores_session_and_bad_credentials_skip_refresh() {
    let mut h = Harness::new(Session::default()).await;

    let ok = h
        .server
        .mock("POST", "/auth/login")
        .match_body(Matcher::Json(json!({"email": "parent@example.com", "password": "right"})))
        .with_status(200)
        .with_body(
            json!({
                "message": "Login successful",
                "data": {
                    "accessToken": "a1",
                    "refreshToken": "r1",
                    "user": {"id": "u1", "email": "parent@example.com", "name": "Pat"}
                }
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;
    let bad = h
        .server
        .mock("POST", "/auth/login")
        .match_body(Matcher::Json(json!({"email": "parent@example.com", "password": "wrong"})))
        .with_status(401)
        .expect(1)
        .create_async()
        .await;
    let refresh = h
        .server
        .mock("POST", "/auth/refresh-token")
        .expect(0)
        .create_async()
        .await;

    let err = h
        .client
        .login(&LoginRequest {
            email: "parent@example.com".into(),
            password: "wrong".into(),
        })
        .await
        .unwrap_err();
    assert!(err.is_unauthorized());
    assert!(h.store.current().is_empty());

    let resp = h
        .client
        .login(&LoginRequest {
            email: "parent@example.com".into(),
            password: "right".into(),
        })
        .await
        .unwrap();

    ok.assert_async().await;
    bad.assert_async().await;
    refresh.assert_async().await;
    assert_eq!(resp.data.user.name, "Pat");
    let stored = h.store.current();
    assert_eq!(stored.access_token.as_deref(), Some("a1"));
    assert_eq!(stored.refresh_token.as_deref(), Some("r1"));
    assert_eq!(stored.user.unwrap()["email"], "parent@example.com");
    assert_eq!(h.navigations(), 0);
}

#[tokio::test]
async fn test_update_status_and_by_children_services() {
    let mut h = Harness::new(session("valid", None)).await;

    let toggle = h
        .server
        .mock("PUT", "/taskInstance/update-status/i1")
        .match_header("authorization", "Bearer valid")
        .with_status(200)
        .with_body(
            json!({
                "message": "updated",
                "data": {
                    "id": "i1",
                    "templateId": "t1",
                    "childId": "c1",
                    "date": "2025-01-01",
                    "status": "COMPLETED",
                    "createdAt": "2025-01-01T07:00:00.000Z"
                }
            })
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;
    let grouped = h
        .server
        .mock("GET", "/taskInstance/by-children")
        .with_status(200)
        .with_body(r##"{"message":"ok","data":[{"id":"c1","name":"Ana","color":"#f00","tasks":[]}]}"##)
        .expect(1)
        .create_async()
        .await;

    let updated = h
        .client
        .update_task_instance_status("i1", None)
        .await
        .unwrap()
        .into_option()
        .unwrap();
    let groups = h
        .client
        .task_instances_by_children(None)
        .await
        .unwrap()
        .into_option()
        .unwrap();

    toggle.assert_async().await;
    grouped.assert_async().await;
    assert_eq!(updated.data.status, chorely_core::models::TaskStatus::Completed);
    assert_eq!(groups.data[0].name, "Ana");
}
