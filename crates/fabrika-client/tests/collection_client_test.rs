//! Contract tests for CollectionClient against the directory REST backend.
//!
//! ## Endpoints Tested
//!
//! | Method | Path | Test |
//! |--------|------|------|
//! | GET    | `/all-factories/` | `list_*` |
//! | GET    | `/factories/{inn}/employees` | `staff_list_*` |
//! | GET    | `/factories/{id}` | `get_*` |
//! | GET    | `/factories/inn/{inn}` | `probe_*` |
//! | POST   | `/factories/` | `create_*` |
//! | PUT    | `/factories/{id}` | `update_*` |
//! | DELETE | `/factories/{id}` | `delete_*` |

use fabrika_client::{ApiError, FabrikaApiConfig, FabrikaClient, RecordService, Session, UserProfile};
use fabrika_core::{ActivityType, Factory, Inn, Record, RecordId, ReferenceKind, Role};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(mock_server: &MockServer) -> FabrikaClient {
    let config = FabrikaApiConfig {
        base_url: mock_server.uri().parse().unwrap(),
        timeout_secs: 5,
    };
    FabrikaClient::new(config).unwrap()
}

fn factory_json(id: i64, inn: &str, name: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "manager": "Иванов",
        "city": "Казань",
        "name": name,
        "inn": inn,
        "address": "ул. Заводская, 1",
        "n_empl": 120,
        "okved": "20.14",
        "type_factory": "ХИМИЯ",
        "emails": null,
        "website": null,
        "phones": null,
        "add_contacts": null,
        "comment1": null,
        "comment2": null,
        "comment3": null,
        "comment4": null,
        "date_created": "2025-01-20"
    })
}

// ── GET /all-factories/ ──────────────────────────────────────────────

#[tokio::test]
async fn list_factories_returns_all_rows() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/all-factories/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            factory_json(1, "123", "Alpha"),
            factory_json(2, "456", "Beta"),
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let rows = client.factories().list().await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].id, RecordId::new(1));
    assert_eq!(rows[1].data.inn.as_str(), "456");
    assert_eq!(rows[0].data.n_empl, Some(120));
}

#[tokio::test]
async fn list_factories_surfaces_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/all-factories/"))
        .respond_with(ResponseTemplate::new(500).set_body_string("database is locked"))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let err = client.factories().list().await.unwrap_err();
    match err {
        ApiError::Status { status, body, .. } => {
            assert_eq!(status, 500);
            assert_eq!(body, "database is locked");
        }
        other => panic!("expected Status error, got: {other:?}"),
    }
}

#[tokio::test]
async fn list_factories_rejects_malformed_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/all-factories/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let err = client.factories().list().await.unwrap_err();
    assert!(matches!(err, ApiError::Deserialization { .. }));
}

#[tokio::test]
async fn staff_list_uses_factory_inn_path() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/factories/123/employees"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "id": 10, "inn": "123", "name_factory": "Alpha", "employee": "Смирнова А.",
              "position": "Главный технолог", "phone": null, "email": null,
              "comment1": null, "comment2": null, "comment3": null, "lead": "+" }
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let staff = client
        .employees_of(&Inn::new("123").unwrap())
        .list()
        .await
        .unwrap();
    assert_eq!(staff.len(), 1);
    assert_eq!(staff[0].data.employee, "Смирнова А.");
    assert_eq!(staff[0].data.lead, fabrika_core::Lead::Yes);
}

// ── GET /factories/{id} ──────────────────────────────────────────────

#[tokio::test]
async fn get_factory_returns_none_on_404() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/factories/99"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "detail": "Factory not found"
        })))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let found = client.factories().get(RecordId::new(99)).await.unwrap();
    assert!(found.is_none());
}

#[tokio::test]
async fn get_factory_returns_record() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/factories/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(factory_json(7, "777", "Gamma")))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let record = client.factories().get(RecordId::new(7)).await.unwrap().unwrap();
    assert_eq!(record.data.name, "Gamma");
}

// ── GET /factories/inn/{inn} ─────────────────────────────────────────

#[tokio::test]
async fn probe_reports_taken_key() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/factories/inn/123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(factory_json(1, "123", "Alpha")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let holder = client.factories().find_by_natural_key("123").await.unwrap();
    assert_eq!(holder.map(|r| r.id), Some(RecordId::new(1)));
}

#[tokio::test]
async fn probe_treats_404_as_free() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/factories/inn/999"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    assert!(client.factories().find_by_natural_key("999").await.unwrap().is_none());
}

#[tokio::test]
async fn probe_treats_other_non_success_as_free() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/factories/inn/999"))
        .respond_with(ResponseTemplate::new(405))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    assert!(client.factories().find_by_natural_key("999").await.unwrap().is_none());
}

#[tokio::test]
async fn probe_without_natural_key_sends_nothing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let holder = client
        .activity_types()
        .find_by_natural_key("ХИМИЯ")
        .await
        .unwrap();
    assert!(holder.is_none());
}

// ── POST /factories/ ─────────────────────────────────────────────────

#[tokio::test]
async fn create_factory_posts_draft_and_returns_assigned_id() {
    let mock_server = MockServer::start().await;

    let draft = Factory {
        manager: "Иванов".into(),
        type_factory: "ХИМИЯ".into(),
        name: "X".into(),
        inn: Inn::new("789").unwrap(),
        ..Factory::default()
    };
    let sent = serde_json::to_value(&draft).unwrap();
    assert_eq!(sent["city"], "");

    Mock::given(method("POST"))
        .and(path("/factories/"))
        .and(body_json(&sent))
        .respond_with(ResponseTemplate::new(200).set_body_json(factory_json(42, "789", "X")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let created = client.factories().create(&draft).await.unwrap();
    assert_eq!(created.id, RecordId::new(42));
    assert_eq!(created.data.name, "X");
}

#[tokio::test]
async fn create_factory_duplicate_inn_carries_detail() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/factories/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "detail": "Предприятие с таким ИНН уже введено!"
        })))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let err = client.factories().create(&Factory::default()).await.unwrap_err();
    assert_eq!(err.status(), Some(400));
    assert_eq!(err.detail().as_deref(), Some("Предприятие с таким ИНН уже введено!"));
}

// ── PUT /factories/{id} ──────────────────────────────────────────────

#[tokio::test]
async fn update_factory_puts_full_record() {
    let mock_server = MockServer::start().await;

    let record: Record<Factory> =
        serde_json::from_value(factory_json(7, "999", "Gamma")).unwrap();
    let expected = serde_json::to_value(&record).unwrap();
    assert_eq!(expected["id"], 7);

    Mock::given(method("PUT"))
        .and(path("/factories/7"))
        .and(body_json(&expected))
        .respond_with(ResponseTemplate::new(200).set_body_json(&expected))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    client.factories().update(&record).await.unwrap();
}

#[tokio::test]
async fn update_factory_surfaces_conflict() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/factories/7"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "detail": "Factory with this INN already exists"
        })))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let record = Record::new(RecordId::new(7), Factory::default());
    let err = client.factories().update(&record).await.unwrap_err();
    assert_eq!(err.detail().as_deref(), Some("Factory with this INN already exists"));
}

// ── DELETE /factories/{id} ───────────────────────────────────────────

#[tokio::test]
async fn delete_factory_sends_delete() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/factories/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "message": "Factory deleted successfully"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    client.factories().delete(RecordId::new(3)).await.unwrap();
}

#[tokio::test]
async fn delete_factory_surfaces_404() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/factories/3"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let err = client.factories().delete(RecordId::new(3)).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
}

// ── Session header and reference lists ──────────────────────────────

#[tokio::test]
async fn session_client_sends_bearer_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/managers/"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let profile = UserProfile {
        login: "ivanov".into(),
        manager_name: Some("Иванов".into()),
        role: Role::Admin,
    };
    let client = test_client(&mock_server).with_session(Session::new("tok-123", profile));
    let managers = client.managers().list().await.unwrap();
    assert!(managers.is_empty());
}

#[tokio::test]
async fn reference_lists_load_both_collections() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/managers/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "id": 1, "manager_name": "Иванов", "role": "admin" },
            { "id": 2, "manager_name": "Петров" }
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/activity-types/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "id": 1, "name": "ПРОЕКТИРОВАНИЕ", "description": null },
            { "id": 2, "name": "ХИМИЯ", "description": null },
            { "id": 3, "name": "ФАРМАЦЕВТИКА", "description": null }
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let lists = client.load_reference_lists().await;
    assert_eq!(lists.contains(ReferenceKind::Managers, "Петров"), Some(true));
    assert_eq!(lists.contains(ReferenceKind::ActivityTypes, "ХИМИЯ"), Some(true));
    assert_eq!(lists.contains(ReferenceKind::ActivityTypes, "МЕТАЛЛ"), Some(false));
}

#[tokio::test]
async fn reference_list_failure_leaves_list_unloaded() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/managers/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/activity-types/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let lists = client.load_reference_lists().await;
    assert_eq!(lists.contains(ReferenceKind::Managers, "anyone"), None);
    assert_eq!(lists.contains(ReferenceKind::ActivityTypes, "anything"), Some(false));
}

#[tokio::test]
async fn activity_type_create_posts_to_collection() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/activity-types/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": 4, "name": "МЕТАЛЛУРГИЯ", "description": "Чёрная металлургия"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let created = client
        .activity_types()
        .create(&ActivityType {
            name: "МЕТАЛЛУРГИЯ".into(),
            description: Some("Чёрная металлургия".into()),
        })
        .await
        .unwrap();
    assert_eq!(created.id.get(), 4);
}
