//! Repository over the service's own HTTP API.
//!
//! An editor session running outside the service (desktop shell, another
//! process) uses this backend so it persists through the same validation
//! and transactions as everything else. Each trait operation is exactly one
//! request; atomicity is the server's job.
//!
//! ERROR HANDLING
//! ==============
//! Non-2xx responses carry an [`ErrorBody`]. 404 and 409 are mapped back to
//! `NotFound` / `Conflict` so callers see the same variants as with a local
//! backend; everything else is `Remote`.

use std::time::Duration;

use canvas::doc::{
    Element, ElementId, ElementPatch, Layout, LayoutId, Page, PageId, PageSnapshot, PartialZone, ProjectId, Zone,
    ZoneId,
};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::{RepoError, Repository};
use crate::error::ErrorBody;

const REQUEST_TIMEOUT_SECS: u64 = 15;
const CONNECT_TIMEOUT_SECS: u64 = 5;

/// Response of `PUT /api/elements`.
#[derive(Debug, Clone, serde::Serialize, Deserialize)]
pub struct PutElementResponse {
    pub displaced: Option<Element>,
}

pub struct HttpRepository {
    base_url: String,
    http: reqwest::Client,
}

impl HttpRepository {
    /// Client for a service rooted at `base_url` (e.g. `http://127.0.0.1:3000`).
    ///
    /// # Errors
    ///
    /// Returns `Transport` if the HTTP client cannot be constructed.
    pub fn new(base_url: impl Into<String>) -> Result<Self, RepoError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()?;
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Ok(Self { base_url, http })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, RepoError> {
        let response = request.send().await?;
        if response.status().is_success() {
            return Ok(response);
        }
        Err(remote_error(response).await)
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, RepoError> {
        Ok(self.send(request).await?.json::<T>().await?)
    }

    async fn send_empty(&self, request: RequestBuilder) -> Result<(), RepoError> {
        self.send(request).await?;
        Ok(())
    }
}

async fn remote_error(response: Response) -> RepoError {
    let status = response.status();
    let body = response.json::<ErrorBody>().await.unwrap_or_else(|_| ErrorBody {
        code: "E_REMOTE".to_owned(),
        message: status.canonical_reason().unwrap_or("unknown").to_owned(),
    });
    error_from_body(status, body)
}

/// Rebuild a repository error from a remote error response.
pub(crate) fn error_from_body(status: StatusCode, body: ErrorBody) -> RepoError {
    match status {
        StatusCode::NOT_FOUND => {
            let entity = entity_for_code(&body.code);
            let id = body
                .message
                .rsplit_once(": ")
                .map_or_else(|| body.message.clone(), |(_, id)| id.to_owned());
            RepoError::NotFound { entity, id }
        }
        StatusCode::CONFLICT => {
            let message = body.message.strip_prefix("conflict: ").unwrap_or(&body.message);
            RepoError::Conflict(message.to_owned())
        }
        _ => RepoError::Remote { status: status.as_u16(), code: body.code, message: body.message },
    }
}

fn entity_for_code(code: &str) -> &'static str {
    match code {
        "E_PAGE_NOT_FOUND" => "page",
        "E_ZONE_NOT_FOUND" => "zone",
        "E_ELEMENT_NOT_FOUND" => "element",
        "E_LAYOUT_NOT_FOUND" => "layout",
        _ => "resource",
    }
}

#[async_trait::async_trait]
impl Repository for HttpRepository {
    async fn fetch_layouts(&self) -> Result<Vec<Layout>, RepoError> {
        self.send_json(self.http.get(self.url("/api/layouts"))).await
    }

    async fn fetch_layout(&self, id: LayoutId) -> Result<Layout, RepoError> {
        self.send_json(self.http.get(self.url(&format!("/api/layouts/{id}")))).await
    }

    async fn fetch_layout_by_slug(&self, slug: &str) -> Result<Layout, RepoError> {
        self.send_json(self.http.get(self.url(&format!("/api/layouts/by-slug/{slug}")))).await
    }

    async fn save_layout(&self, layout: &Layout) -> Result<(), RepoError> {
        let url = self.url(&format!("/api/layouts/{}", layout.id));
        self.send_empty(self.http.put(url).json(layout)).await
    }

    async fn delete_layout(&self, id: LayoutId) -> Result<(), RepoError> {
        self.send_empty(self.http.delete(self.url(&format!("/api/layouts/{id}")))).await
    }

    async fn fetch_page(&self, id: PageId) -> Result<PageSnapshot, RepoError> {
        self.send_json(self.http.get(self.url(&format!("/api/pages/{id}")))).await
    }

    async fn list_pages(&self, project_id: ProjectId) -> Result<Vec<Page>, RepoError> {
        self.send_json(self.http.get(self.url(&format!("/api/projects/{project_id}/pages")))).await
    }

    async fn save_page(&self, page: &Page) -> Result<(), RepoError> {
        let url = self.url(&format!("/api/pages/{}", page.id));
        self.send_empty(self.http.put(url).json(page)).await
    }

    async fn delete_page(&self, id: PageId) -> Result<(), RepoError> {
        self.send_empty(self.http.delete(self.url(&format!("/api/pages/{id}")))).await
    }

    async fn fetch_zone(&self, id: ZoneId) -> Result<Zone, RepoError> {
        self.send_json(self.http.get(self.url(&format!("/api/zones/{id}")))).await
    }

    async fn create_zone(&self, zone: &Zone) -> Result<(), RepoError> {
        self.send_empty(self.http.post(self.url("/api/zones")).json(zone)).await
    }

    async fn update_zone(&self, id: ZoneId, partial: &PartialZone) -> Result<Zone, RepoError> {
        let url = self.url(&format!("/api/zones/{id}"));
        self.send_json(self.http.patch(url).json(partial)).await
    }

    async fn delete_zone(&self, id: ZoneId) -> Result<(), RepoError> {
        self.send_empty(self.http.delete(self.url(&format!("/api/zones/{id}")))).await
    }

    async fn replace_page_zones(&self, page_id: PageId, zones: &[Zone]) -> Result<(), RepoError> {
        let url = self.url(&format!("/api/pages/{page_id}/zones"));
        self.send_empty(self.http.put(url).json(zones)).await
    }

    async fn put_element(&self, element: &Element) -> Result<Option<Element>, RepoError> {
        let response: PutElementResponse = self.send_json(self.http.put(self.url("/api/elements")).json(element)).await?;
        Ok(response.displaced)
    }

    async fn update_element(&self, id: ElementId, patch: &ElementPatch) -> Result<Element, RepoError> {
        let url = self.url(&format!("/api/elements/{id}"));
        self.send_json(self.http.patch(url).json(patch)).await
    }

    async fn delete_element(&self, id: ElementId) -> Result<(), RepoError> {
        self.send_empty(self.http.delete(self.url(&format!("/api/elements/{id}")))).await
    }
}
