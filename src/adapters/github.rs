//! GitHub REST and GraphQL client.

use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, LINK, USER_AGENT};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use swissgit_core::error::{OperationError, Result};
use swissgit_core::ports::HostingPort;
use swissgit_core::{NewPullRequest, PullRequest, RemoteRepo};
use tracing::{debug, info};

pub const TOKEN_ENV: &str = "GITHUB_TOKEN";
const PER_PAGE: u32 = 100;

/// Whether a `Link` response header announces another page
pub fn has_next_page(link: Option<&str>) -> bool {
    link.is_some_and(|l| l.contains(r#"rel="next""#))
}

/// GraphQL endpoint belonging to a REST base URL.
///
/// Enterprise servers serve REST under `/api/v3` and GraphQL under `/api/graphql`.
pub fn graphql_url(api_url: &str) -> String {
    match api_url.strip_suffix("/api/v3") {
        Some(host) => format!("{}/api/graphql", host),
        None => format!("{}/graphql", api_url),
    }
}

#[derive(Debug, Deserialize)]
struct RepoPayload {
    name: String,
    ssh_url: String,
}

#[derive(Debug, Deserialize)]
struct BranchRefPayload {
    #[serde(rename = "ref")]
    name: String,
}

#[derive(Debug, Deserialize)]
struct PullPayload {
    number: u64,
    node_id: String,
    title: String,
    head: BranchRefPayload,
    base: BranchRefPayload,
}

impl From<PullPayload> for PullRequest {
    fn from(p: PullPayload) -> Self {
        PullRequest {
            number: p.number,
            node_id: p.node_id,
            title: p.title,
            head: p.head.name,
            base: p.base.name,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct GraphqlResponse {
    #[serde(default)]
    errors: Vec<GraphqlError>,
}

/// Client for the GitHub API
#[derive(Clone)]
pub struct GitHubClient {
    token: Option<String>,
    base_url: String,
    merge_method: String,
    client: Client,
}

impl GitHubClient {
    pub fn new(token: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self::with_token(Some(token.into()), base_url.into())
    }

    /// Create a client using the `GITHUB_TOKEN` environment variable.
    ///
    /// A missing token is reported by every request rather than here, so
    /// each repository of a batch fails on its own.
    pub fn from_env(base_url: &str) -> Self {
        let token = std::env::var(TOKEN_ENV).ok().filter(|t| !t.trim().is_empty());
        Self::with_token(token, base_url.to_string())
    }

    fn with_token(token: Option<String>, mut base_url: String) -> Self {
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            token,
            base_url,
            merge_method: "MERGE".into(),
            client: Client::new(),
        }
    }

    pub fn with_merge_method(mut self, method: impl Into<String>) -> Self {
        self.merge_method = method.into().to_uppercase();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn token(&self) -> Result<&str> {
        self.token.as_deref().ok_or_else(|| {
            OperationError::auth(format!(
                "GitHub access token not provided, set the {} environment variable",
                TOKEN_ENV
            ))
        })
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.token()?))
                .map_err(|_| OperationError::auth("invalid characters in access token"))?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert(USER_AGENT, HeaderValue::from_static("swissgit"));
        headers.insert("X-GitHub-Api-Version", HeaderValue::from_static("2022-11-28"));
        Ok(headers)
    }

    fn send_get(&self, url: &str, operation: &str) -> Result<Response> {
        debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .headers(self.headers()?)
            .send()
            .map_err(|e| OperationError::remote(operation, e))?;
        check_status(response, StatusCode::OK, operation)
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str, operation: &str) -> Result<T> {
        self.send_get(url, operation)?
            .json()
            .map_err(|e| OperationError::remote(operation, format!("could not parse response: {}", e)))
    }
}

/// Turn anything but `expected` into an error, keeping the response body as the reason
fn check_status(response: Response, expected: StatusCode, operation: &str) -> Result<Response> {
    let status = response.status();
    if status == expected {
        return Ok(response);
    }

    let body = response.text().unwrap_or_default();
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(OperationError::auth(format!(
            "GitHub rejected the access token ({})",
            status
        ))),
        _ => Err(OperationError::remote(
            operation,
            format!("unexpected status {}: {}", status, body.trim()),
        )),
    }
}

impl HostingPort for GitHubClient {
    fn check_credentials(&self) -> Result<()> {
        self.token().map(|_| ())
    }

    fn list_org_repos(&self, org: &str, team: Option<&str>) -> Result<Vec<RemoteRepo>> {
        let endpoint = match team {
            Some(team) => format!("{}/orgs/{}/teams/{}/repos", self.base_url, org, team),
            None => format!("{}/orgs/{}/repos", self.base_url, org),
        };

        let mut repos = Vec::new();
        let mut page = 1;
        loop {
            let url = format!("{}?page={}&per_page={}", endpoint, page, PER_PAGE);
            let response = self.send_get(&url, "list repositories")?;
            let more = has_next_page(response.headers().get(LINK).and_then(|v| v.to_str().ok()));

            let batch: Vec<RepoPayload> = response.json().map_err(|e| {
                OperationError::remote("list repositories", format!("could not parse response: {}", e))
            })?;
            repos.extend(batch.into_iter().map(|r| RemoteRepo {
                name: r.name,
                ssh_url: r.ssh_url,
            }));

            if !more {
                break;
            }
            page += 1;
        }

        info!("Found {} repositories in {}", repos.len(), org);
        Ok(repos)
    }

    fn find_pull_request(&self, owner: &str, repo: &str, search: &str) -> Result<PullRequest> {
        let url = format!(
            "{}/repos/{}/{}/pulls?state=open&per_page={}",
            self.base_url, owner, repo, PER_PAGE
        );
        let pulls: Vec<PullPayload> = self.get_json(&url, "list pull requests")?;

        pulls
            .into_iter()
            .map(PullRequest::from)
            .find(|pr| pr.matches(search))
            .ok_or_else(|| OperationError::PullRequestNotFound {
                search: search.to_string(),
            })
    }

    fn create_pull_request(&self, owner: &str, repo: &str, pr: &NewPullRequest) -> Result<PullRequest> {
        let url = format!("{}/repos/{}/{}/pulls", self.base_url, owner, repo);
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .headers(self.headers()?)
            .json(pr)
            .send()
            .map_err(|e| OperationError::PullRequestCreation {
                reason: e.to_string(),
            })?;

        let status = response.status();
        if status != StatusCode::CREATED {
            let body = response.text().unwrap_or_default();
            return Err(OperationError::PullRequestCreation {
                reason: format!("unexpected status {}: {}", status, body.trim()),
            });
        }

        response
            .json::<PullPayload>()
            .map(PullRequest::from)
            .map_err(|e| OperationError::PullRequestCreation {
                reason: format!("could not parse response: {}", e),
            })
    }

    fn enable_auto_merge(&self, pr: &PullRequest) -> Result<()> {
        let query = format!(
            "mutation($id: ID!) {{ enablePullRequestAutoMerge(input: {{pullRequestId: $id, mergeMethod: {}}}) {{ clientMutationId }} }}",
            self.merge_method
        );
        let body = json!({ "query": query, "variables": { "id": pr.node_id } });
        let url = graphql_url(&self.base_url);
        debug!("POST {} (auto-merge #{})", url, pr.number);

        let response = self
            .client
            .post(&url)
            .headers(self.headers()?)
            .json(&body)
            .send()
            .map_err(|e| OperationError::remote("enable auto-merge", e))?;
        let response = check_status(response, StatusCode::OK, "enable auto-merge")?;

        let parsed: GraphqlResponse = response.json().map_err(|e| {
            OperationError::remote("enable auto-merge", format!("could not parse response: {}", e))
        })?;
        if let Some(first) = parsed.errors.first() {
            return Err(OperationError::remote("enable auto-merge", &first.message));
        }
        Ok(())
    }
}
