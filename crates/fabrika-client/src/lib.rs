//! # fabrika-client -- Typed Rust client for the directory REST API
//!
//! Provides typed access to every collection the directory backend serves:
//! - **Factories** via `all-factories/` and `factories/{id}`
//! - **Employees** (contacts) via `all-employees/`, `factories/{inn}/employees`
//!   and `employees/{id}`
//! - **Managers** via `managers/`
//! - **Activity types** via `activity-types/`
//!
//! Plus the **session** endpoints (`/auth/login`, `/auth/me`) and the
//! **spreadsheet export** download.
//!
//! ## Architecture
//!
//! Each collection is served by one generic [`CollectionClient<E>`] that
//! implements the [`RecordService<E>`] capability trait; the editable grid
//! is written against the trait only. A [`FabrikaClient`] built with a
//! [`Session`] attaches the bearer token to every request it makes.
//!
//! Every call is a single request. Nothing is retried or queued; the caller
//! decides how to reconcile a failure.

pub mod collection;
pub mod config;
pub mod error;
pub mod export;
pub mod service;
pub mod session;

pub use collection::CollectionClient;
pub use config::FabrikaApiConfig;
pub use error::ApiError;
pub use export::{ExportClient, ExportFile, ExportFilter};
pub use service::RecordService;
pub use session::{AuthClient, Credentials, Session, UserProfile};

use std::sync::Arc;
use std::time::Duration;

use fabrika_core::{
    ActivityType, Employee, Entity, Factory, Inn, Manager, ReferenceList, ReferenceLists,
};
use url::Url;

/// Top-level directory API client. Hands out per-collection clients that
/// share one connection pool.
#[derive(Debug, Clone)]
pub struct FabrikaClient {
    http: reqwest::Client,
    base_url: Url,
    session: Option<Arc<Session>>,
}

impl FabrikaClient {
    /// Create an anonymous client from configuration.
    pub fn new(config: FabrikaApiConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ApiError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;

        Ok(Self {
            http,
            base_url: config.base_url,
            session: None,
        })
    }

    /// A client that authenticates every request with `session`.
    pub fn with_session(&self, session: Session) -> Self {
        Self {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            session: Some(Arc::new(session)),
        }
    }

    /// The session attached to this client, if any.
    pub fn session(&self) -> Option<&Session> {
        self.session.as_deref()
    }

    /// Client for any entity collection.
    pub fn collection<E: Entity>(&self) -> CollectionClient<E> {
        CollectionClient::new(self.http.clone(), self.base_url.clone(), self.session.clone())
    }

    /// Factories collection.
    pub fn factories(&self) -> CollectionClient<Factory> {
        self.collection()
    }

    /// All contacts across factories.
    pub fn employees(&self) -> CollectionClient<Employee> {
        self.collection()
    }

    /// Staff of one factory: lists `factories/{inn}/employees`, mutates
    /// through `employees/{id}` like [`FabrikaClient::employees`].
    pub fn employees_of(&self, inn: &Inn) -> CollectionClient<Employee> {
        self.collection()
            .with_list_path(collection::staff_segments(inn))
    }

    /// Managers collection.
    pub fn managers(&self) -> CollectionClient<Manager> {
        self.collection()
    }

    /// Activity-types collection.
    pub fn activity_types(&self) -> CollectionClient<ActivityType> {
        self.collection()
    }

    /// Session endpoints.
    pub fn auth(&self) -> AuthClient {
        AuthClient::new(self.http.clone(), self.base_url.clone())
    }

    /// Export endpoints.
    pub fn export(&self) -> ExportClient {
        ExportClient::new(self.http.clone(), self.base_url.clone(), self.session.clone())
    }

    /// Fetch the manager-name and activity-type-name lists concurrently.
    ///
    /// A list that fails to load is left out and logged; choice fields bound
    /// to it then accept any value.
    pub async fn load_reference_lists(&self) -> ReferenceLists {
        let managers = self.managers();
        let activity_types = self.activity_types();
        let (managers, activity_types) = tokio::join!(managers.list(), activity_types.list());

        let mut lists = ReferenceLists::default();
        match managers {
            Ok(records) => lists.insert(ReferenceList::from_managers(&records)),
            Err(e) => tracing::warn!(error = %e, "manager list unavailable"),
        }
        match activity_types {
            Ok(records) => lists.insert(ReferenceList::from_activity_types(&records)),
            Err(e) => tracing::warn!(error = %e, "activity-type list unavailable"),
        }
        lists
    }
}

/// Append path segments to the base URL. An empty final segment produces a
/// trailing slash; values are percent-encoded.
pub(crate) fn endpoint_url(base: &Url, segments: &[&str], endpoint: &str) -> Result<Url, ApiError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| ApiError::InvalidUrl {
            endpoint: endpoint.to_string(),
            reason: format!("{base} cannot carry a path"),
        })?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Pass 2xx responses through; turn everything else into an error carrying
/// the response body.
pub(crate) async fn check_status(
    resp: reqwest::Response,
    endpoint: &str,
) -> Result<reqwest::Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    if status == reqwest::StatusCode::UNAUTHORIZED {
        return Err(ApiError::Unauthorized {
            endpoint: endpoint.into(),
            body,
        });
    }
    Err(ApiError::Status {
        endpoint: endpoint.into(),
        status: status.as_u16(),
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("http://127.0.0.1:8000").unwrap()
    }

    #[test]
    fn list_path_keeps_trailing_slash() {
        let url = endpoint_url(&base(), &["all-factories", ""], "GET /all-factories/").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8000/all-factories/");
    }

    #[test]
    fn by_id_path_has_no_trailing_slash() {
        let url = endpoint_url(&base(), &["factories", "7"], "PUT /factories/7").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8000/factories/7");
    }

    #[test]
    fn base_path_prefix_is_preserved() {
        let base = Url::parse("http://host/api/").unwrap();
        let url = endpoint_url(&base, &["managers", ""], "GET /managers/").unwrap();
        assert_eq!(url.as_str(), "http://host/api/managers/");
    }

    #[test]
    fn segments_are_percent_encoded() {
        let url = endpoint_url(&base(), &["factories", "inn", "12 3/4"], "probe").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8000/factories/inn/12%203%2F4");
    }

    #[test]
    fn staff_list_uses_factory_path() {
        let client = FabrikaClient::new(FabrikaApiConfig::local_mock(9000).unwrap()).unwrap();
        let staff = client.employees_of(&Inn::new("123").unwrap());
        let rendered = format!("{staff:?}");
        assert!(rendered.contains("\"factories\", \"123\", \"employees\""));
    }

    #[test]
    fn with_session_attaches_session() {
        let client = FabrikaClient::new(FabrikaApiConfig::local_mock(9000).unwrap()).unwrap();
        assert!(client.session().is_none());
        let profile = UserProfile {
            login: "ivanov".into(),
            manager_name: None,
            role: fabrika_core::Role::User,
        };
        let authed = client.with_session(Session::new("t", profile));
        assert_eq!(authed.session().map(|s| s.token()), Some("t"));
    }
}
