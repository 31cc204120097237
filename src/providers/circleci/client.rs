use log::{debug, warn};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use url::Url;

use crate::auth::Token;
use crate::error::{Result, WakkaError};

use super::types::ProjectRef;

const TOKEN_PARAM: &str = "circle-token";

/// Thin HTTP adapter over the CircleCI v1.1 REST API.
///
/// Every request carries `Content-Type: application/json` and the token as
/// a `circle-token` query parameter. Calls return the raw response body.
pub struct CircleCiClient {
    client: Client,
    api_url: Url,
    token: Token,
}

impl CircleCiClient {
    pub fn new(base_url: &str, token: Token) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .user_agent(concat!("wakka/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .map_err(|e| WakkaError::Config(format!("Failed to create HTTP client: {e}")))?;

        let api_url = Url::parse(base_url)
            .map_err(|e| WakkaError::InvalidBaseUrl(format!("{base_url}: {e}")))?;
        if api_url.cannot_be_a_base() {
            return Err(WakkaError::InvalidBaseUrl(base_url.to_string()));
        }

        Ok(Self {
            client,
            api_url,
            token,
        })
    }

    /// `{base}/projects`
    pub fn projects_url(&self) -> Url {
        self.endpoint(&["projects"])
    }

    /// `{base}/project/{vcs}/{user}/{project}/envvar`
    pub fn envvars_url(&self, project: &ProjectRef) -> Url {
        self.endpoint(&[
            "project",
            &project.vcs,
            &project.username,
            &project.project,
            "envvar",
        ])
    }

    /// `{base}/project/{vcs}/{user}/{project}/envvar/{name}`
    pub fn envvar_url(&self, project: &ProjectRef, name: &str) -> Url {
        self.endpoint(&[
            "project",
            &project.vcs,
            &project.username,
            &project.project,
            "envvar",
            name,
        ])
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.api_url.clone();
        // `new` rejects cannot-be-a-base URLs, so segments are always available
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url.query_pairs_mut()
            .append_pair(TOKEN_PARAM, self.token.as_str());
        url
    }

    pub async fn get(&self, url: Url) -> Result<Vec<u8>> {
        debug!("GET {}", url.path());
        self.send_checked(self.client.get(url)).await
    }

    pub async fn post<B: Serialize + ?Sized>(&self, url: Url, body: &B) -> Result<Vec<u8>> {
        debug!("POST {}", url.path());
        self.send_checked(self.client.post(url).json(body)).await
    }

    /// Issue a DELETE. Any HTTP status is accepted; only transport failures
    /// are errors.
    pub async fn delete(&self, url: Url) -> Result<Vec<u8>> {
        debug!("DELETE {}", url.path());
        let path = url.path().to_string();
        let response = self.client.delete(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!("DELETE {path} returned status {status}, continuing");
        }

        Ok(response.bytes().await?.to_vec())
    }

    async fn send_checked(&self, request: RequestBuilder) -> Result<Vec<u8>> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?.to_vec();

        if !status.is_success() {
            return Err(WakkaError::Api {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        Ok(body)
    }
}
