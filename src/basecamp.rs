//! Basecamp 3 REST client.
//!
//! Covers the four endpoints the bridge needs: the project directory, a
//! project's people directory, card creation on a card-table list, and the
//! card update that sets assignees. Every call is bearer-authenticated,
//! single-attempt, no retry; non-2xx responses surface status and body.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Error types for Basecamp API calls.
#[derive(Debug, thiserror::Error)]
pub enum BasecampError {
    #[error("http error: {0}")]
    Http(String),
    #[error("basecamp returned {status}: {body}")]
    Api { status: u16, body: String },
    #[error("json error: {0}")]
    Json(String),
}

/// Person from the Basecamp people directory.
#[derive(Debug, Clone, Deserialize)]
pub struct Person {
    pub id: u64,
    pub name: String,
}

/// Project from the Basecamp project directory.
#[derive(Debug, Clone, Deserialize)]
pub struct Project {
    pub id: u64,
    pub name: String,
}

/// The slice of a card response the bridge consumes.
#[derive(Debug, Clone, Deserialize)]
pub struct Card {
    pub id: u64,
    pub title: String,
}

/// Body for card creation.
#[derive(Debug, Clone, Serialize)]
pub struct NewCard {
    pub title: String,
    pub content: String,
    pub due_on: String,
}

/// Body for the assignee/due-date update.
#[derive(Debug, Clone, Serialize)]
pub struct CardUpdate {
    pub assignee_ids: Vec<u64>,
    pub due_on: String,
}

/// Bearer-authenticated client for one Basecamp account.
#[derive(Debug, Clone)]
pub struct BasecampClient {
    http: reqwest::Client,
    base_url: String,
    account_id: String,
    access_token: String,
    user_agent: String,
    default_project_id: u64,
}

impl BasecampClient {
    pub fn new(
        base_url: impl Into<String>,
        account_id: impl Into<String>,
        access_token: impl Into<String>,
        user_agent: impl Into<String>,
        default_project_id: u64,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            account_id: account_id.into(),
            access_token: access_token.into(),
            user_agent: user_agent.into(),
            default_project_id,
        }
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/{}/{}", self.base_url, self.account_id, path)
    }

    /// GET `/{account}/projects.json`
    pub async fn list_projects(&self) -> Result<Vec<Project>, BasecampError> {
        let url = self.api_url("projects.json");
        debug!("fetching basecamp projects");
        self.get_json(&url).await
    }

    /// GET `/{account}/projects/{project}/people.json`, scoped to the
    /// default project.
    pub async fn list_people(&self) -> Result<Vec<Person>, BasecampError> {
        let url = self.api_url(&format!(
            "projects/{}/people.json",
            self.default_project_id
        ));
        debug!("fetching basecamp people");
        self.get_json(&url).await
    }

    /// POST `/{account}/buckets/{project}/card_tables/lists/{list}/cards.json`
    pub async fn create_card(
        &self,
        project_id: u64,
        list_id: u64,
        card: &NewCard,
    ) -> Result<Card, BasecampError> {
        let url = self.api_url(&format!(
            "buckets/{}/card_tables/lists/{}/cards.json",
            project_id, list_id
        ));
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.access_token)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .json(card)
            .send()
            .await
            .map_err(|err| BasecampError::Http(err.to_string()))?;
        Self::decode(response).await
    }

    /// PATCH `/{account}/buckets/{project}/card_tables/cards/{card}.json`
    ///
    /// Callers skip this entirely when no assignees resolved.
    pub async fn update_card(
        &self,
        project_id: u64,
        card_id: u64,
        update: &CardUpdate,
    ) -> Result<Card, BasecampError> {
        let url = self.api_url(&format!(
            "buckets/{}/card_tables/cards/{}.json",
            project_id, card_id
        ));
        let response = self
            .http
            .patch(&url)
            .bearer_auth(&self.access_token)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .json(update)
            .send()
            .await
            .map_err(|err| BasecampError::Http(err.to_string()))?;
        Self::decode(response).await
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
    ) -> Result<T, BasecampError> {
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.access_token)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .send()
            .await
            .map_err(|err| BasecampError::Http(err.to_string()))?;
        Self::decode(response).await
    }

    async fn decode<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, BasecampError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BasecampError::Api {
                status: status.as_u16(),
                body,
            });
        }
        response
            .json::<T>()
            .await
            .map_err(|err| BasecampError::Json(err.to_string()))
    }
}
