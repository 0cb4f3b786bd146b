//! Stateless request builder and response parser for the job-matching API.
//!
//! # Design
//! `JobMatchClient` holds only a `base_url`. Each endpoint is a `build_*`
//! method producing an `HttpRequest` and a `parse_*` method consuming the
//! `HttpResponse`. Tokens are passed in, never stored here; the session-aware
//! driver is `JobMatchService`. Hosts that do their own I/O (the C binding)
//! use this type directly.

use crate::classify::classify;
use crate::decode::{decode_lenient, decode_list, decode_one, decode_string_list};
use crate::endpoint::Endpoint;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::request::{build_request, json_body};
use crate::types::{
    Application, ApplicationId, ApplicationRecord, ApplicationStatus, ApplyRequest, JobPosting,
    JobPostingMatch, LoginRequest, LoginResponse, NewJobPosting, NewResume, PostingId, Resume,
    ResumeId, ResumeMatch, StatusUpdate,
};

#[derive(Debug, Clone)]
pub struct JobMatchClient {
    base_url: String,
}

impl JobMatchClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(
        &self,
        endpoint: Endpoint,
        path: &str,
        token: Option<&str>,
        query: &[(&str, String)],
        body: Option<String>,
    ) -> HttpRequest {
        build_request(&self.base_url, path, endpoint.method(), token, query, body)
    }

    // --- auth ---

    pub fn build_login(&self, email: &str, password: &str) -> Result<HttpRequest, ApiError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(ApiError::InvalidInput);
        }
        let body = json_body(&LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        })?;
        Ok(self.request(Endpoint::Login, "/api/auth/login", None, &[], Some(body)))
    }

    pub fn parse_login(&self, response: &HttpResponse) -> Result<LoginResponse, ApiError> {
        let body = classify(Endpoint::Login, response)?;
        decode_one(Endpoint::Login, body)
    }

    // --- resumes ---

    pub fn build_my_resumes(&self, token: &str) -> HttpRequest {
        self.request(Endpoint::MyResumes, "/api/resumes/my", Some(token), &[], None)
    }

    pub fn parse_my_resumes(&self, response: &HttpResponse) -> Result<Vec<Resume>, ApiError> {
        let body = classify(Endpoint::MyResumes, response)?;
        decode_list(Endpoint::MyResumes, body)
    }

    pub fn build_resume(&self, token: &str, id: ResumeId) -> HttpRequest {
        let path = format!("/api/resumes/{id}");
        self.request(Endpoint::ResumeDetail, &path, Some(token), &[], None)
    }

    pub fn parse_resume(&self, response: &HttpResponse) -> Result<Resume, ApiError> {
        let body = classify(Endpoint::ResumeDetail, response)?;
        decode_one(Endpoint::ResumeDetail, body)
    }

    pub fn build_create_resume(
        &self,
        token: &str,
        input: &NewResume,
    ) -> Result<HttpRequest, ApiError> {
        let body = json_body(input)?;
        Ok(self.request(Endpoint::CreateResume, "/api/resumes", Some(token), &[], Some(body)))
    }

    pub fn parse_create_resume(&self, response: &HttpResponse) -> Result<Resume, ApiError> {
        let body = classify(Endpoint::CreateResume, response)?;
        decode_one(Endpoint::CreateResume, body)
    }

    // --- job postings ---

    pub fn build_job_postings(&self, token: &str) -> HttpRequest {
        self.request(Endpoint::JobPostings, "/api/job-postings", Some(token), &[], None)
    }

    pub fn parse_job_postings(&self, response: &HttpResponse) -> Result<Vec<JobPosting>, ApiError> {
        let body = classify(Endpoint::JobPostings, response)?;
        decode_list(Endpoint::JobPostings, body)
    }

    pub fn build_job_posting(&self, token: &str, id: PostingId) -> HttpRequest {
        let path = format!("/api/job-postings/{id}");
        self.request(Endpoint::JobPostingDetail, &path, Some(token), &[], None)
    }

    pub fn parse_job_posting(&self, response: &HttpResponse) -> Result<JobPosting, ApiError> {
        let body = classify(Endpoint::JobPostingDetail, response)?;
        decode_one(Endpoint::JobPostingDetail, body)
    }

    pub fn build_my_job_postings(&self, token: &str) -> HttpRequest {
        self.request(Endpoint::MyJobPostings, "/api/job-postings/my", Some(token), &[], None)
    }

    pub fn parse_my_job_postings(
        &self,
        response: &HttpResponse,
    ) -> Result<Vec<JobPosting>, ApiError> {
        let body = classify(Endpoint::MyJobPostings, response)?;
        decode_list(Endpoint::MyJobPostings, body)
    }

    pub fn build_create_job_posting(
        &self,
        token: &str,
        input: &NewJobPosting,
    ) -> Result<HttpRequest, ApiError> {
        let body = json_body(input)?;
        Ok(self.request(
            Endpoint::CreateJobPosting,
            "/api/job-postings",
            Some(token),
            &[],
            Some(body),
        ))
    }

    pub fn parse_create_job_posting(
        &self,
        response: &HttpResponse,
    ) -> Result<JobPosting, ApiError> {
        let body = classify(Endpoint::CreateJobPosting, response)?;
        decode_one(Endpoint::CreateJobPosting, body)
    }

    pub fn build_job_categories(&self, token: &str) -> HttpRequest {
        let path = "/api/job-postings/categories";
        self.request(Endpoint::JobCategories, path, Some(token), &[], None)
    }

    pub fn parse_job_categories(&self, response: &HttpResponse) -> Result<Vec<String>, ApiError> {
        let body = classify(Endpoint::JobCategories, response)?;
        decode_string_list(Endpoint::JobCategories, body)
    }

    // --- applications ---

    pub fn build_apply(
        &self,
        token: &str,
        job_posting_id: PostingId,
        resume_id: ResumeId,
    ) -> Result<HttpRequest, ApiError> {
        let body = json_body(&ApplyRequest {
            job_posting_id,
            resume_id,
        })?;
        Ok(self.request(Endpoint::Apply, "/api/applications", Some(token), &[], Some(body)))
    }

    pub fn parse_apply(&self, response: &HttpResponse) -> Result<Application, ApiError> {
        let body = classify(Endpoint::Apply, response)?;
        decode_one(Endpoint::Apply, body)
    }

    pub fn build_my_applications(&self, token: &str) -> HttpRequest {
        self.request(Endpoint::MyApplications, "/api/applications/my", Some(token), &[], None)
    }

    /// An empty 200 body means the user has not applied anywhere yet.
    pub fn parse_my_applications(
        &self,
        response: &HttpResponse,
    ) -> Result<Vec<Application>, ApiError> {
        let body = classify(Endpoint::MyApplications, response)?;
        decode_list(Endpoint::MyApplications, body)
    }

    pub fn build_posting_applications(&self, token: &str, posting_id: PostingId) -> HttpRequest {
        let path = format!("/api/applications/job-posting/{posting_id}");
        self.request(Endpoint::PostingApplications, &path, Some(token), &[], None)
    }

    /// Malformed entries are dropped; the call still succeeds.
    pub fn parse_posting_applications(
        &self,
        response: &HttpResponse,
    ) -> Result<Vec<ApplicationRecord>, ApiError> {
        let body = classify(Endpoint::PostingApplications, response)?;
        decode_lenient(Endpoint::PostingApplications, body)
    }

    pub fn build_applicant_count(&self, token: &str, posting_id: PostingId) -> HttpRequest {
        let path = format!("/api/applications/job-posting/{posting_id}/count");
        self.request(Endpoint::ApplicantCount, &path, Some(token), &[], None)
    }

    pub fn parse_applicant_count(&self, response: &HttpResponse) -> Result<u64, ApiError> {
        let body = classify(Endpoint::ApplicantCount, response)?;
        decode_one(Endpoint::ApplicantCount, body)
    }

    pub fn build_update_application_status(
        &self,
        token: &str,
        id: ApplicationId,
        status: ApplicationStatus,
    ) -> Result<HttpRequest, ApiError> {
        let body = json_body(&StatusUpdate { status })?;
        let path = format!("/api/applications/{id}/status");
        Ok(self.request(Endpoint::UpdateApplicationStatus, &path, Some(token), &[], Some(body)))
    }

    pub fn parse_update_application_status(&self, response: &HttpResponse) -> Result<(), ApiError> {
        classify(Endpoint::UpdateApplicationStatus, response)?;
        Ok(())
    }

    // --- matching ---

    pub fn build_match_postings_for_resume(
        &self,
        token: &str,
        resume_id: ResumeId,
        top_n: u32,
    ) -> Result<HttpRequest, ApiError> {
        if top_n == 0 {
            return Err(ApiError::InvalidInput);
        }
        let path = format!("/api/matching/resume/{resume_id}/job-postings");
        let query = [("topN", top_n.to_string())];
        Ok(self.request(Endpoint::MatchPostingsForResume, &path, Some(token), &query, None))
    }

    pub fn parse_match_postings_for_resume(
        &self,
        response: &HttpResponse,
    ) -> Result<Vec<JobPostingMatch>, ApiError> {
        let body = classify(Endpoint::MatchPostingsForResume, response)?;
        decode_list(Endpoint::MatchPostingsForResume, body)
    }

    pub fn build_match_resumes_for_posting(
        &self,
        token: &str,
        posting_id: PostingId,
        top_n: u32,
    ) -> Result<HttpRequest, ApiError> {
        if top_n == 0 {
            return Err(ApiError::InvalidInput);
        }
        let path = format!("/api/matching/job-posting/{posting_id}/resumes");
        let query = [("topN", top_n.to_string())];
        Ok(self.request(Endpoint::MatchResumesForPosting, &path, Some(token), &query, None))
    }

    pub fn parse_match_resumes_for_posting(
        &self,
        response: &HttpResponse,
    ) -> Result<Vec<ResumeMatch>, ApiError> {
        let body = classify(Endpoint::MatchResumesForPosting, response)?;
        decode_list(Endpoint::MatchResumesForPosting, body)
    }
}
