//! GitHub REST v3 client: profile, recent repositories, profile README and languages.

use std::collections::BTreeMap;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

const USER_AGENT: &str = "Sonara-Skills-Extractor";
const ACCEPT: &str = "application/vnd.github.v3+json";
/// Only the most recently updated repositories are analysed.
pub const MAX_REPOS: usize = 10;

#[derive(Debug, Error)]
pub enum GithubError {
    #[error("GitHub user not found")]
    UserNotFound,

    #[error("Failed to fetch repositories")]
    Repositories,

    #[error("GitHub request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Everything the skill prompt gets to see about a GitHub account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GithubSummary {
    pub login: String,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub profile_readme_url: Option<String>,
    pub public_repos: u32,
    pub followers: u32,
    pub repositories: Vec<RepoSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepoSummary {
    pub name: String,
    pub description: Option<String>,
    pub topics: Vec<String>,
    /// Language name to bytes of code, e.g. `{"Python": 12040}`.
    pub languages: BTreeMap<String, u64>,
    pub stars: u32,
    pub forks: u32,
}

#[derive(Debug, Deserialize)]
struct ApiUser {
    login: String,
    name: Option<String>,
    bio: Option<String>,
    #[serde(default)]
    public_repos: u32,
    #[serde(default)]
    followers: u32,
}

#[derive(Debug, Deserialize)]
struct ApiRepo {
    name: String,
    description: Option<String>,
    #[serde(default)]
    topics: Vec<String>,
    language: Option<String>,
    #[serde(default)]
    stargazers_count: u32,
    #[serde(default)]
    forks_count: u32,
}

#[derive(Debug, Deserialize)]
struct ApiReadme {
    html_url: Option<String>,
}

impl ApiRepo {
    fn into_summary(self, languages: BTreeMap<String, u64>) -> RepoSummary {
        RepoSummary {
            name: self.name,
            description: self.description,
            topics: self.topics,
            languages,
            stars: self.stargazers_count,
            forks: self.forks_count,
        }
    }
}

/// Language map used when the languages endpoint could not be reached:
/// the repository's primary language with an unknown size.
fn fallback_languages(primary: Option<&str>) -> BTreeMap<String, u64> {
    primary
        .map(|lang| BTreeMap::from([(lang.to_string(), 0)]))
        .unwrap_or_default()
}

#[async_trait]
pub trait GithubSource: Send + Sync {
    async fn fetch_summary(&self, username: &str) -> Result<GithubSummary, GithubError>;
}

pub struct GithubClient {
    client: Client,
    api_url: String,
    token: Option<String>,
}

impl GithubClient {
    pub fn new(api_url: String, token: Option<String>) -> anyhow::Result<Self> {
        Ok(Self {
            client: Client::builder()
                .user_agent(USER_AGENT)
                .timeout(std::time::Duration::from_secs(30))
                .build()?,
            api_url: api_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    fn get(&self, path: &str) -> RequestBuilder {
        let request = self
            .client
            .get(format!("{}{}", self.api_url, path))
            .header(reqwest::header::ACCEPT, ACCEPT);
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn fetch_user(&self, username: &str) -> Result<ApiUser, GithubError> {
        let response = self.get(&format!("/users/{username}")).send().await?;
        if !response.status().is_success() {
            debug!("GitHub user lookup for {username} returned {}", response.status());
            return Err(GithubError::UserNotFound);
        }
        Ok(response.json().await?)
    }

    async fn fetch_repos(&self, username: &str) -> Result<Vec<ApiRepo>, GithubError> {
        let response = self
            .get(&format!("/users/{username}/repos"))
            .query(&[("sort", "updated"), ("per_page", "10")])
            .send()
            .await?;
        if !response.status().is_success() {
            warn!("GitHub repo listing for {username} returned {}", response.status());
            return Err(GithubError::Repositories);
        }
        Ok(response.json().await?)
    }

    /// The `<user>/<user>` profile README, if the account has one.
    async fn fetch_readme_url(&self, username: &str) -> Option<String> {
        let response = self
            .get(&format!("/repos/{username}/{username}/readme"))
            .send()
            .await
            .ok()?;
        if !response.status().is_success() {
            debug!("No profile README found for {username}");
            return None;
        }
        response.json::<ApiReadme>().await.ok()?.html_url
    }

    /// `Ok(None)` when GitHub answers with a non-success status.
    async fn fetch_languages(
        &self,
        username: &str,
        repo: &str,
    ) -> Result<Option<BTreeMap<String, u64>>, reqwest::Error> {
        let response = self
            .get(&format!("/repos/{username}/{repo}/languages"))
            .send()
            .await?;
        if response.status() == StatusCode::OK {
            Ok(Some(response.json().await?))
        } else {
            Ok(None)
        }
    }
}

#[async_trait]
impl GithubSource for GithubClient {
    async fn fetch_summary(&self, username: &str) -> Result<GithubSummary, GithubError> {
        let user = self.fetch_user(username).await?;
        let repos = self.fetch_repos(username).await?;
        let profile_readme_url = self.fetch_readme_url(username).await;

        let mut repositories = Vec::with_capacity(repos.len().min(MAX_REPOS));
        for repo in repos.into_iter().take(MAX_REPOS) {
            let languages = match self.fetch_languages(username, &repo.name).await {
                Ok(Some(languages)) => languages,
                Ok(None) => BTreeMap::new(),
                Err(e) => {
                    warn!("Failed to fetch languages for {}: {e}", repo.name);
                    fallback_languages(repo.language.as_deref())
                }
            };
            repositories.push(repo.into_summary(languages));
        }

        Ok(GithubSummary {
            login: user.login,
            name: user.name,
            bio: user.bio,
            profile_readme_url,
            public_repos: user.public_repos,
            followers: user.followers,
            repositories,
        })
    }
}
