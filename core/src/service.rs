//! Session-aware async driver.
//!
//! Every authenticated call reads the token from the `SessionStore` first;
//! with no token it returns `Unauthorized` without touching the transport.
//! Transport failures become `ApiError::Unknown`. Nothing is retried.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::aggregate::collect_counts;
use crate::client::JobMatchClient;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::ranking::{rank, RankedRecord};
use crate::session::{KeyValueStore, SessionStore, UserProfile};
use crate::transport::Transport;
use crate::types::{
    Application, ApplicationId, ApplicationRecord, ApplicationStatus, JobPosting, JobPostingMatch,
    NewJobPosting, NewResume, PostingId, Resume, ResumeId, ResumeMatch,
};

pub struct JobMatchService<T> {
    client: JobMatchClient,
    session: SessionStore,
    transport: T,
}

impl<T: Transport> JobMatchService<T> {
    pub fn new(client: JobMatchClient, session: SessionStore, transport: T) -> Self {
        Self {
            client,
            session,
            transport,
        }
    }

    /// Service against `config.base_url` with a session persisted in
    /// `storage`. The timeout in `config` belongs to the transport.
    pub fn with_storage(
        config: &ClientConfig,
        storage: Arc<dyn KeyValueStore>,
        transport: T,
    ) -> Self {
        Self::new(
            JobMatchClient::new(&config.base_url),
            SessionStore::new(storage),
            transport,
        )
    }

    pub fn client(&self) -> &JobMatchClient {
        &self.client
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    fn token(&self) -> Result<String, ApiError> {
        self.session.get().ok_or_else(|| {
            tracing::debug!("no stored token, skipping request");
            ApiError::login_required()
        })
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        tracing::debug!(method = request.method.as_str(), url = %request.url, "sending request");
        self.transport.execute(request).await.map_err(|err| {
            tracing::warn!(error = %err, "transport failure");
            ApiError::Unknown
        })
    }

    // --- auth ---

    /// Log in and keep the token durably when `remember` is set.
    #[tracing::instrument(skip(self, password))]
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        remember: bool,
    ) -> Result<UserProfile, ApiError> {
        let request = self.client.build_login(email, password)?;
        let response = self.send(request).await?;
        let login = self.client.parse_login(&response)?;

        let profile = UserProfile {
            name: login.name,
            email: login.email,
            account_type: login.user_type,
        };
        self.session.login(&login.token, remember, &profile);
        tracing::info!(account_type = profile.account_type.as_str(), "logged in");
        Ok(profile)
    }

    /// Forget the token in both tiers and the stored profile. Local only.
    pub fn logout(&self) {
        self.session.logout();
        tracing::info!("logged out");
    }

    // --- resumes ---

    #[tracing::instrument(skip(self))]
    pub async fn my_resumes(&self) -> Result<Vec<Resume>, ApiError> {
        let request = self.client.build_my_resumes(&self.token()?);
        self.client.parse_my_resumes(&self.send(request).await?)
    }

    #[tracing::instrument(skip(self))]
    pub async fn resume(&self, id: ResumeId) -> Result<Resume, ApiError> {
        let request = self.client.build_resume(&self.token()?, id);
        self.client.parse_resume(&self.send(request).await?)
    }

    #[tracing::instrument(skip(self, input))]
    pub async fn create_resume(&self, input: &NewResume) -> Result<Resume, ApiError> {
        let request = self.client.build_create_resume(&self.token()?, input)?;
        self.client.parse_create_resume(&self.send(request).await?)
    }

    // --- job postings ---

    #[tracing::instrument(skip(self))]
    pub async fn job_postings(&self) -> Result<Vec<JobPosting>, ApiError> {
        let request = self.client.build_job_postings(&self.token()?);
        self.client.parse_job_postings(&self.send(request).await?)
    }

    #[tracing::instrument(skip(self))]
    pub async fn job_posting(&self, id: PostingId) -> Result<JobPosting, ApiError> {
        let request = self.client.build_job_posting(&self.token()?, id);
        self.client.parse_job_posting(&self.send(request).await?)
    }

    #[tracing::instrument(skip(self))]
    pub async fn my_job_postings(&self) -> Result<Vec<JobPosting>, ApiError> {
        let request = self.client.build_my_job_postings(&self.token()?);
        self.client.parse_my_job_postings(&self.send(request).await?)
    }

    #[tracing::instrument(skip(self, input))]
    pub async fn create_job_posting(&self, input: &NewJobPosting) -> Result<JobPosting, ApiError> {
        let request = self.client.build_create_job_posting(&self.token()?, input)?;
        self.client.parse_create_job_posting(&self.send(request).await?)
    }

    #[tracing::instrument(skip(self))]
    pub async fn job_categories(&self) -> Result<Vec<String>, ApiError> {
        let request = self.client.build_job_categories(&self.token()?);
        self.client.parse_job_categories(&self.send(request).await?)
    }

    // --- applications ---

    #[tracing::instrument(skip(self))]
    pub async fn apply(
        &self,
        job_posting_id: PostingId,
        resume_id: ResumeId,
    ) -> Result<Application, ApiError> {
        let request = self.client.build_apply(&self.token()?, job_posting_id, resume_id)?;
        self.client.parse_apply(&self.send(request).await?)
    }

    #[tracing::instrument(skip(self))]
    pub async fn my_applications(&self) -> Result<Vec<Application>, ApiError> {
        let request = self.client.build_my_applications(&self.token()?);
        self.client.parse_my_applications(&self.send(request).await?)
    }

    #[tracing::instrument(skip(self))]
    pub async fn posting_applications(
        &self,
        posting_id: PostingId,
    ) -> Result<Vec<ApplicationRecord>, ApiError> {
        let request = self.client.build_posting_applications(&self.token()?, posting_id);
        self.client.parse_posting_applications(&self.send(request).await?)
    }

    #[tracing::instrument(skip(self))]
    pub async fn applicant_count(&self, posting_id: PostingId) -> Result<u64, ApiError> {
        let request = self.client.build_applicant_count(&self.token()?, posting_id);
        self.client.parse_applicant_count(&self.send(request).await?)
    }

    #[tracing::instrument(skip(self))]
    pub async fn update_application_status(
        &self,
        id: ApplicationId,
        status: ApplicationStatus,
    ) -> Result<(), ApiError> {
        let request = self.client.build_update_application_status(&self.token()?, id, status)?;
        self.client.parse_update_application_status(&self.send(request).await?)
    }

    /// Applicant count per posting, one request at a time. Never fails:
    /// postings whose count could not be fetched map to `0`.
    #[tracing::instrument(skip(self, postings), fields(postings = postings.len()))]
    pub async fn collect_applicant_counts(
        &self,
        postings: &[JobPosting],
    ) -> BTreeMap<PostingId, u64> {
        collect_counts(postings.iter().map(|p| p.id), |id| self.applicant_count(id)).await
    }

    // --- matching ---

    /// Postings scored against `resume_id`, ranked for display.
    #[tracing::instrument(skip(self))]
    pub async fn match_postings_for_resume(
        &self,
        resume_id: ResumeId,
        top_n: u32,
    ) -> Result<Vec<RankedRecord<JobPostingMatch>>, ApiError> {
        let request = self
            .client
            .build_match_postings_for_resume(&self.token()?, resume_id, top_n)?;
        let matches = self
            .client
            .parse_match_postings_for_resume(&self.send(request).await?)?;
        Ok(rank(matches))
    }

    /// Candidate resumes scored against `posting_id`, ranked for display.
    #[tracing::instrument(skip(self))]
    pub async fn match_resumes_for_posting(
        &self,
        posting_id: PostingId,
        top_n: u32,
    ) -> Result<Vec<RankedRecord<ResumeMatch>>, ApiError> {
        let request = self
            .client
            .build_match_resumes_for_posting(&self.token()?, posting_id, top_n)?;
        let matches = self
            .client
            .parse_match_resumes_for_posting(&self.send(request).await?)?;
        Ok(rank(matches))
    }
}
