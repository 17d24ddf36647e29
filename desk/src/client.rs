use std::time::Duration;

use chrono::NaiveDate;
use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ServiceError;
use crate::models::{
    Entry, EntryId, EntryStatus, NewEntry, Position, SearchHit, SearchQuery, WaitingList,
};
use crate::service::WaitingListService;

#[derive(Debug, Serialize)]
struct CreateListRequest {
    date: NaiveDate,
}

#[derive(Debug, Serialize)]
struct StatusRequest {
    status: EntryStatus,
}

#[derive(Debug, Serialize)]
struct PositionRequest {
    position: Position,
}

/// JSON-over-HTTP client for the waiting-list service.
#[derive(Debug, Clone)]
pub struct HttpService {
    client: Client,
    base_url: Url,
}

impl HttpService {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ServiceError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ServiceError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ServiceError::InvalidUrl(base_url.to_string()));
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append percent-encoded path segments to the base url.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ServiceError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ServiceError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Map non-success statuses to errors, reading the body as the message.
    async fn check(resp: Response, what: &str) -> Result<Response, ServiceError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        if status == StatusCode::NOT_FOUND {
            return Err(ServiceError::NotFound(what.to_string()));
        }
        let message = match resp.text().await {
            Ok(body) => body,
            Err(e) => {
                tracing::debug!("Failed to read {} error body: {}", status, e);
                format!("<unreadable body: {}>", e)
            }
        };
        Err(ServiceError::Status {
            status: status.as_u16(),
            message,
        })
    }

    async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ServiceError> {
        resp.json::<T>()
            .await
            .map_err(|e| ServiceError::Decode(e.to_string()))
    }
}

impl WaitingListService for HttpService {
    async fn create_list(&self, date: NaiveDate) -> Result<WaitingList, ServiceError> {
        let url = self.endpoint(&["api", "lists"])?;
        tracing::debug!("POST {}", url);
        let resp = self
            .client
            .post(url)
            .json(&CreateListRequest { date })
            .send()
            .await?;
        Self::decode(Self::check(resp, "waiting list").await?).await
    }

    async fn get_list(&self, date: NaiveDate) -> Result<Option<WaitingList>, ServiceError> {
        let day = date.to_string();
        let url = self.endpoint(&["api", "lists", &day])?;
        tracing::debug!("GET {}", url);
        let resp = self.client.get(url).send().await?;
        match Self::check(resp, "waiting list").await {
            Ok(resp) => Self::decode(resp).await.map(Some),
            Err(ServiceError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn add_entry(&self, list_id: &str, entry: &NewEntry) -> Result<Entry, ServiceError> {
        let url = self.endpoint(&["api", "lists", list_id, "entries"])?;
        tracing::debug!("POST {}", url);
        let resp = self.client.post(url).json(entry).send().await?;
        Self::decode(Self::check(resp, "waiting list").await?).await
    }

    async fn update_status(
        &self,
        entry_id: &EntryId,
        status: EntryStatus,
    ) -> Result<Entry, ServiceError> {
        let url = self.endpoint(&["api", "entries", entry_id.as_str(), "status"])?;
        tracing::debug!("PUT {}", url);
        let resp = self
            .client
            .put(url)
            .json(&StatusRequest { status })
            .send()
            .await?;
        Self::decode(Self::check(resp, "entry").await?).await
    }

    async fn update_position(
        &self,
        entry_id: &EntryId,
        position: Position,
    ) -> Result<(), ServiceError> {
        let url = self.endpoint(&["api", "entries", entry_id.as_str(), "position"])?;
        tracing::debug!("PUT {} position={}", url, position);
        let resp = self
            .client
            .put(url)
            .json(&PositionRequest { position })
            .send()
            .await?;
        Self::check(resp, "entry").await?;
        Ok(())
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchHit>, ServiceError> {
        let url = self.endpoint(&["api", "entries", "search"])?;
        tracing::debug!("GET {}", url);
        let resp = self.client.get(url).query(query).send().await?;
        Self::decode(Self::check(resp, "search").await?).await
    }
}
