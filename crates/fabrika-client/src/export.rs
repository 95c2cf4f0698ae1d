//! Spreadsheet export download.
//!
//! The backend builds the workbook; this client only requests it, optionally
//! restricted to factories created within a date range, and hands back the
//! bytes together with the file name to save them under.

use std::fmt;
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use fabrika_core::ValidationError;
use reqwest::header::CONTENT_DISPOSITION;
use url::Url;

use crate::error::ApiError;
use crate::session::Session;
use crate::{check_status, endpoint_url};

/// Creation-date window for an export. Both bounds are inclusive and
/// optional; a window with `start > end` cannot be constructed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportFilter {
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
}

impl ExportFilter {
    /// Build a filter, rejecting an inverted range.
    pub fn new(
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Self, ValidationError> {
        if let (Some(start), Some(end)) = (start_date, end_date) {
            if start > end {
                return Err(ValidationError::InvalidDateRange { start, end });
            }
        }
        Ok(Self {
            start_date,
            end_date,
        })
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        self.start_date
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }

    /// Whether either bound is set.
    pub fn is_filtered(&self) -> bool {
        self.start_date.is_some() || self.end_date.is_some()
    }

    /// `fabriki_export_<date>[_filtered].xlsx`, used when the response does
    /// not name the file.
    pub fn fallback_filename(&self, today: NaiveDate) -> String {
        let suffix = if self.is_filtered() { "_filtered" } else { "" };
        format!("fabriki_export_{}{suffix}.xlsx", today.format("%Y-%m-%d"))
    }
}

/// A downloaded export.
#[derive(Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for ExportFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExportFile")
            .field("filename", &self.filename)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Client for the `/export` endpoints.
#[derive(Debug, Clone)]
pub struct ExportClient {
    http: reqwest::Client,
    base_url: Url,
    session: Option<Arc<Session>>,
}

impl ExportClient {
    pub(crate) fn new(http: reqwest::Client, base_url: Url, session: Option<Arc<Session>>) -> Self {
        Self {
            http,
            base_url,
            session,
        }
    }

    /// Download the factories workbook.
    ///
    /// Calls `GET {base_url}/export/factories/excel?start_date=..&end_date=..`
    /// with only the bounds that are set.
    pub async fn factories_excel(&self, filter: &ExportFilter) -> Result<ExportFile, ApiError> {
        let endpoint = "GET /export/factories/excel";
        let mut url = endpoint_url(&self.base_url, &["export", "factories", "excel"], endpoint)?;
        {
            let mut query = url.query_pairs_mut();
            if let Some(start) = filter.start_date {
                query.append_pair("start_date", &start.format("%Y-%m-%d").to_string());
            }
            if let Some(end) = filter.end_date {
                query.append_pair("end_date", &end.format("%Y-%m-%d").to_string());
            }
        }
        if url.query() == Some("") {
            url.set_query(None);
        }

        tracing::debug!(%url, "requesting export");
        let mut req = self.http.get(url);
        if let Some(session) = &self.session {
            req = req.bearer_auth(session.token());
        }
        let resp = req.send().await.map_err(|e| ApiError::Http {
            endpoint: endpoint.into(),
            source: e,
        })?;
        let resp = check_status(resp, endpoint).await?;

        let filename = resp
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(filename_from_disposition)
            .unwrap_or_else(|| filter.fallback_filename(Local::now().date_naive()));

        let bytes = resp.bytes().await.map_err(|e| ApiError::Http {
            endpoint: endpoint.into(),
            source: e,
        })?;
        tracing::info!(%filename, size = bytes.len(), "export downloaded");
        Ok(ExportFile {
            filename,
            bytes: bytes.to_vec(),
        })
    }
}

/// Extract `filename` from `attachment; filename=...`, quoted or not.
/// Path components are stripped.
fn filename_from_disposition(header: &str) -> Option<String> {
    header
        .split(';')
        .map(str::trim)
        .find_map(|part| part.strip_prefix("filename="))
        .map(|raw| raw.trim().trim_matches('"'))
        .and_then(|name| name.rsplit(|c: char| c == '/' || c == '\\').next())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}
