pub mod reporter;
pub mod webhook;

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use anyhow::{Context, Result};
use async_trait::async_trait;
use octocrab::{Octocrab, models::IssueState};
use tokio::sync::OnceCell;
use triage_bot_core::{
    client::{
        ApiUsage, ClientFactory, IdentityProvider, IssueClient, IssueSnapshot, RepoClient,
    },
    config::{InputSource, RunInputs},
    event::RepoRef,
};

pub use reporter::TrackingIssueReporter;

pub(crate) fn build_client(token: &str) -> Result<Octocrab> {
    Octocrab::builder()
        .personal_token(token.to_string())
        .build()
        .context("Failed to create GitHub client")
}

/// Identity provider backed by the `/user` endpoint.
pub struct OctocrabIdentity {
    inputs: Arc<dyn InputSource>,
}

impl OctocrabIdentity {
    pub fn new(inputs: Arc<dyn InputSource>) -> Self {
        Self { inputs }
    }
}

#[async_trait]
impl IdentityProvider for OctocrabIdentity {
    async fn authenticated_user(&self) -> Result<String> {
        let inputs = self.inputs.run_inputs()?;
        let client = build_client(&inputs.token)?;
        let profile = client.current().user().await.context("Failed to fetch current user")?;
        Ok(profile.login)
    }
}

/// Octocrab-backed client factory. Builds one underlying API client per run,
/// shares it between scope flavours, and counts every outbound call the
/// scoped clients make.
pub struct OctocrabFactory {
    repo: RepoRef,
    client: OnceCell<Octocrab>,
    requests: Arc<AtomicU64>,
}

impl OctocrabFactory {
    pub fn new(repo: RepoRef) -> Self {
        Self { repo, client: OnceCell::new(), requests: Arc::new(AtomicU64::new(0)) }
    }

    async fn api_client(&self, inputs: &RunInputs) -> Result<Octocrab> {
        self.client
            .get_or_try_init(|| async { build_client(&inputs.token) })
            .await
            .cloned()
    }
}

#[async_trait]
impl ClientFactory for OctocrabFactory {
    async fn issue_client(
        &self,
        inputs: &RunInputs,
        number: u64,
    ) -> Result<Arc<dyn IssueClient>> {
        let client = self.api_client(inputs).await?;
        Ok(Arc::new(ScopedIssueClient {
            client,
            repo: self.repo.clone(),
            number,
            readonly: inputs.readonly,
            requests: self.requests.clone(),
        }))
    }

    async fn repo_client(&self, inputs: &RunInputs) -> Result<Arc<dyn RepoClient>> {
        let client = self.api_client(inputs).await?;
        Ok(Arc::new(ScopedRepoClient {
            client,
            repo: self.repo.clone(),
            readonly: inputs.readonly,
            requests: self.requests.clone(),
        }))
    }

    async fn usage(&self) -> Result<ApiUsage> {
        let client = self.client.get().context("No API client was constructed this run")?;
        let limits = client.ratelimit().get().await.context("Failed to fetch rate limit")?;
        Ok(ApiUsage {
            requests: self.requests.load(Ordering::Relaxed),
            core_used: limits.resources.core.used as u64,
            graphql_used: limits.resources.graphql.map(|rate| rate.used as u64).unwrap_or(0),
            search_used: limits.resources.search.used as u64,
        })
    }
}

struct ScopedIssueClient {
    client: Octocrab,
    repo: RepoRef,
    number: u64,
    readonly: bool,
    requests: Arc<AtomicU64>,
}

impl ScopedIssueClient {
    fn count(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
    }

    /// Readonly runs skip mutations entirely, without touching the counter.
    fn skip_write(&self, what: &str) -> bool {
        if self.readonly {
            tracing::info!("Readonly run: skipping {} on {}#{}", what, self.repo, self.number);
        }
        self.readonly
    }
}

#[async_trait]
impl IssueClient for ScopedIssueClient {
    fn issue_number(&self) -> u64 {
        self.number
    }

    fn readonly(&self) -> bool {
        self.readonly
    }

    async fn get_issue(&self) -> Result<IssueSnapshot> {
        self.count();
        let issue = self
            .client
            .issues(&self.repo.owner, &self.repo.name)
            .get(self.number)
            .await
            .with_context(|| format!("Failed to fetch issue {}#{}", self.repo, self.number))?;
        Ok(snapshot_from(issue))
    }

    async fn post_comment(&self, body: &str) -> Result<()> {
        if self.skip_write("comment") {
            return Ok(());
        }
        self.count();
        self.client
            .issues(&self.repo.owner, &self.repo.name)
            .create_comment(self.number, body)
            .await
            .context("Failed to post comment")?;
        Ok(())
    }

    async fn add_label(&self, label: &str) -> Result<()> {
        if self.skip_write("label add") {
            return Ok(());
        }
        self.count();
        self.client
            .issues(&self.repo.owner, &self.repo.name)
            .add_labels(self.number, &[label.to_string()])
            .await
            .with_context(|| format!("Failed to add label {label}"))?;
        Ok(())
    }

    async fn remove_label(&self, label: &str) -> Result<()> {
        if self.skip_write("label remove") {
            return Ok(());
        }
        self.count();
        self.client
            .issues(&self.repo.owner, &self.repo.name)
            .remove_label(self.number, label)
            .await
            .with_context(|| format!("Failed to remove label {label}"))?;
        Ok(())
    }

    async fn close_issue(&self) -> Result<()> {
        if self.skip_write("close") {
            return Ok(());
        }
        self.count();
        self.client
            .issues(&self.repo.owner, &self.repo.name)
            .update(self.number)
            .state(IssueState::Closed)
            .send()
            .await
            .context("Failed to close issue")?;
        Ok(())
    }
}

struct ScopedRepoClient {
    client: Octocrab,
    repo: RepoRef,
    readonly: bool,
    requests: Arc<AtomicU64>,
}

#[async_trait]
impl RepoClient for ScopedRepoClient {
    fn readonly(&self) -> bool {
        self.readonly
    }

    async fn create_issue(&self, title: &str, body: &str) -> Result<Option<u64>> {
        if self.readonly {
            tracing::info!("Readonly run: skipping issue creation on {}", self.repo);
            return Ok(None);
        }
        self.requests.fetch_add(1, Ordering::Relaxed);
        let issue = self
            .client
            .issues(&self.repo.owner, &self.repo.name)
            .create(title)
            .body(body)
            .send()
            .await
            .context("Failed to create issue")?;
        Ok(Some(issue.number))
    }

    async fn search_issues(&self, query: &str) -> Result<Vec<IssueSnapshot>> {
        self.requests.fetch_add(1, Ordering::Relaxed);
        let query = format!("repo:{} {}", self.repo, query);
        let page = self
            .client
            .search()
            .issues_and_pull_requests(&query)
            .send()
            .await
            .context("Failed to search issues")?;
        Ok(page.items.into_iter().map(snapshot_from).collect())
    }
}

fn snapshot_from(issue: octocrab::models::issues::Issue) -> IssueSnapshot {
    IssueSnapshot {
        number: issue.number,
        title: issue.title,
        body: issue.body.unwrap_or_default(),
        author: issue.user.login,
        labels: issue.labels.into_iter().map(|label| label.name).collect(),
        assignees: issue.assignees.into_iter().map(|user| user.login).collect(),
        open: matches!(issue.state, IssueState::Open),
    }
}
