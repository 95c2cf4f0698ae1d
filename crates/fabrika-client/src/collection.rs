//! Generic typed client for one entity collection.
//!
//! ## Paths
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | GET    | `/{list path}` | Full collection (`all-factories/`, `managers/`, ...) |
//! | GET    | `/{collection}/{id}` | Get by ID |
//! | GET    | `/{collection}/{natural key}/{value}` | Uniqueness probe |
//! | POST   | `/{collection}/` | Create |
//! | PUT    | `/{collection}/{id}` | Update (full record body) |
//! | DELETE | `/{collection}/{id}` | Delete |
//!
//! There is no retry: every mutation is exactly one request, and failures
//! go straight back to the caller for reconciliation.

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use fabrika_core::{Entity, Inn, Record, RecordId};
use reqwest::{Method, RequestBuilder, StatusCode};
use url::Url;

use crate::error::ApiError;
use crate::service::RecordService;
use crate::session::Session;
use crate::{check_status, endpoint_url};

/// Client for one entity collection of the directory API.
#[derive(Debug, Clone)]
pub struct CollectionClient<E> {
    http: reqwest::Client,
    base_url: Url,
    session: Option<Arc<Session>>,
    list_segments: Vec<String>,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> CollectionClient<E> {
    pub(crate) fn new(http: reqwest::Client, base_url: Url, session: Option<Arc<Session>>) -> Self {
        Self {
            http,
            base_url,
            session,
            list_segments: E::LIST_SEGMENTS.iter().map(|s| s.to_string()).collect(),
            _entity: PhantomData,
        }
    }

    /// Point `list()` at a different path, e.g. one factory's staff.
    pub(crate) fn with_list_path(mut self, segments: Vec<String>) -> Self {
        self.list_segments = segments;
        self
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let req = self.http.request(method, url);
        match &self.session {
            Some(session) => req.bearer_auth(session.token()),
            None => req,
        }
    }

    async fn send(&self, req: RequestBuilder, endpoint: &str) -> Result<reqwest::Response, ApiError> {
        req.send().await.map_err(|e| ApiError::Http {
            endpoint: endpoint.into(),
            source: e,
        })
    }

    fn list_endpoint(&self) -> String {
        format!("GET /{}", self.list_segments.join("/"))
    }
}

#[async_trait]
impl<E: Entity> RecordService<E> for CollectionClient<E> {
    /// Calls `GET {base_url}/{list path}`.
    async fn list(&self) -> Result<Vec<Record<E>>, ApiError> {
        let endpoint = self.list_endpoint();
        let segments: Vec<&str> = self.list_segments.iter().map(String::as_str).collect();
        let url = endpoint_url(&self.base_url, &segments, &endpoint)?;

        tracing::debug!(kind = E::KIND, %url, "loading collection");
        let resp = self.send(self.request(Method::GET, url), &endpoint).await?;
        let resp = check_status(resp, &endpoint).await?;

        resp.json().await.map_err(|e| ApiError::Deserialization {
            endpoint,
            source: e,
        })
    }

    /// Calls `GET {base_url}/{collection}/{id}`.
    async fn get(&self, id: RecordId) -> Result<Option<Record<E>>, ApiError> {
        let endpoint = format!("GET /{}/{id}", E::COLLECTION);
        let id_segment = id.to_string();
        let url = endpoint_url(&self.base_url, &[E::COLLECTION, id_segment.as_str()], &endpoint)?;

        let resp = self.send(self.request(Method::GET, url), &endpoint).await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let resp = check_status(resp, &endpoint).await?;

        let record = resp.json().await.map_err(|e| ApiError::Deserialization {
            endpoint,
            source: e,
        })?;
        Ok(Some(record))
    }

    /// Calls `GET {base_url}/{collection}/{natural key}/{value}`.
    ///
    /// Any non-2xx answer means "not taken": 404 silently, anything else
    /// with a warning. Only transport failures are errors.
    async fn find_by_natural_key(&self, value: &str) -> Result<Option<Record<E>>, ApiError> {
        let Some(key) = E::NATURAL_KEY else {
            return Ok(None);
        };
        let endpoint = format!("GET /{}/{key}/{value}", E::COLLECTION);
        let url = endpoint_url(&self.base_url, &[E::COLLECTION, key, value], &endpoint)?;

        tracing::debug!(kind = E::KIND, key, value, "probing natural key");
        let resp = self.send(self.request(Method::GET, url), &endpoint).await?;
        let status = resp.status();
        if !status.is_success() {
            if status != StatusCode::NOT_FOUND {
                tracing::warn!(%endpoint, status = status.as_u16(), "probe answered non-2xx; treating key as free");
            }
            return Ok(None);
        }

        let record = resp.json().await.map_err(|e| ApiError::Deserialization {
            endpoint,
            source: e,
        })?;
        Ok(Some(record))
    }

    /// Calls `POST {base_url}/{collection}/`.
    async fn create(&self, draft: &E) -> Result<Record<E>, ApiError> {
        let endpoint = format!("POST /{}/", E::COLLECTION);
        let url = endpoint_url(&self.base_url, &[E::COLLECTION, ""], &endpoint)?;

        let resp = self
            .send(self.request(Method::POST, url).json(draft), &endpoint)
            .await?;
        let resp = check_status(resp, &endpoint).await?;

        let record: Record<E> = resp.json().await.map_err(|e| ApiError::Deserialization {
            endpoint,
            source: e,
        })?;
        tracing::info!(kind = E::KIND, id = %record.id, "record created");
        Ok(record)
    }

    /// Calls `PUT {base_url}/{collection}/{id}` with the full record.
    async fn update(&self, record: &Record<E>) -> Result<(), ApiError> {
        let endpoint = format!("PUT /{}/{}", E::COLLECTION, record.id);
        let id_segment = record.id.to_string();
        let url = endpoint_url(&self.base_url, &[E::COLLECTION, id_segment.as_str()], &endpoint)?;

        let resp = self
            .send(self.request(Method::PUT, url).json(record), &endpoint)
            .await?;
        check_status(resp, &endpoint).await?;
        Ok(())
    }

    /// Calls `DELETE {base_url}/{collection}/{id}`.
    async fn delete(&self, id: RecordId) -> Result<(), ApiError> {
        let endpoint = format!("DELETE /{}/{id}", E::COLLECTION);
        let id_segment = id.to_string();
        let url = endpoint_url(&self.base_url, &[E::COLLECTION, id_segment.as_str()], &endpoint)?;

        let resp = self.send(self.request(Method::DELETE, url), &endpoint).await?;
        check_status(resp, &endpoint).await?;
        Ok(())
    }
}

/// List path of one factory's staff: `factories/{inn}/employees`.
pub(crate) fn staff_segments(inn: &Inn) -> Vec<String> {
    vec![
        "factories".to_string(),
        inn.as_str().to_string(),
        "employees".to_string(),
    ]
}
