use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use url::Url;

use crate::domain::category::ClassificationResult;
use crate::domain::email::EmailRecord;
use crate::domain::meeting::{MeetingRecord, StoredMeeting};
use crate::error::ApiError;
use crate::session::Identity;

/// The remote mailbox service the dashboard reads from.
#[async_trait(?Send)]
pub trait MailService {
    /// Ask the backend to ingest the latest mailbox and meeting data.
    async fn synchronize(&self, identity: &Identity) -> Result<(), ApiError>;

    /// Stored emails, newest first.
    async fn stored_emails(&self, identity: &Identity) -> Result<Vec<EmailRecord>, ApiError>;

    async fn stored_meetings(&self, identity: &Identity) -> Result<Vec<MeetingRecord>, ApiError>;

    async fn classify(&self, identity: &Identity, limit: u32) -> Result<ClassificationResult, ApiError>;
}

pub struct HttpMailService {
    client: Client,
    base: Url,
}

impl HttpMailService {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let mut base = Url::parse(base_url)?;
        // keep any path prefix when joining endpoint paths
        if !base.path().ends_with('/') {
            let p = format!("{}/", base.path());
            base.set_path(&p);
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base })
    }

    fn endpoint(&self, path: &str, identity: &Identity) -> Result<Url, ApiError> {
        let mut url = self.base.join(path)?;
        url.query_pairs_mut()
            .append_pair(crate::session::IDENTITY_PARAM, identity.as_str());
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        call: &'static str,
        url: Url,
    ) -> Result<T, ApiError> {
        log::debug!("GET {url}");
        let resp = check(call, self.client.get(url).send().await?).await?;
        decode(resp).await
    }
}

/// Non-2xx responses become [`ApiError::Status`] with the body as message.
async fn check(call: &'static str, resp: Response) -> Result<Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let message = resp.text().await.unwrap_or_default();
    Err(ApiError::Status {
        call,
        status: status.as_u16(),
        message,
    })
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
    let bytes = resp.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[async_trait(?Send)]
impl MailService for HttpMailService {
    async fn synchronize(&self, identity: &Identity) -> Result<(), ApiError> {
        let url = self.endpoint("emails/sync", identity)?;
        log::debug!("GET {url}");
        check("sync", self.client.get(url).send().await?).await?;
        Ok(())
    }

    async fn stored_emails(&self, identity: &Identity) -> Result<Vec<EmailRecord>, ApiError> {
        let url = self.endpoint("emails/stored", identity)?;
        self.get_json("stored emails", url).await
    }

    async fn stored_meetings(&self, identity: &Identity) -> Result<Vec<MeetingRecord>, ApiError> {
        let url = self.endpoint("meetings/stored", identity)?;
        let stored: Vec<StoredMeeting> = self.get_json("stored meetings", url).await?;
        Ok(stored.into_iter().map(MeetingRecord::from).collect())
    }

    async fn classify(&self, identity: &Identity, limit: u32) -> Result<ClassificationResult, ApiError> {
        let mut url = self.endpoint("emails/classify", identity)?;
        url.query_pairs_mut().append_pair("limit", &limit.to_string());
        log::debug!("POST {url}");
        let resp = check("classify", self.client.post(url).send().await?).await?;
        let raw: HashMap<String, Option<Vec<String>>> = decode(resp).await?;
        Ok(ClassificationResult::from_wire(raw))
    }
}
