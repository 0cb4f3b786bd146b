//! Endpoint catalogue.
//!
//! Each backend endpoint declares how its 404 reads, how its payload is
//! decoded, and whether an empty 200 body means "no records". Parse paths
//! consult this table instead of branching ad hoc.

use crate::http::HttpMethod;

/// What kind of record an endpoint addresses; drives the 404 message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Resume,
    JobPosting,
    Application,
    Generic,
}

impl ResourceKind {
    pub fn not_found_message(&self) -> &'static str {
        match self {
            ResourceKind::Resume => "resume not found",
            ResourceKind::JobPosting => "job posting not found",
            ResourceKind::Application => "application not found",
            ResourceKind::Generic => "requested resource not found",
        }
    }
}

/// How a 200 body is turned into typed records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeStrategy {
    /// Deserialize directly; any mismatch fails the whole call.
    Strict,
    /// Untyped list of maps; malformed entries are dropped individually.
    Lenient,
    /// A bare list of strings, or an object holding it under `field`.
    StringListOrWrapped { field: &'static str },
    /// Body is ignored on success.
    Discard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Login,
    MyResumes,
    ResumeDetail,
    CreateResume,
    JobPostings,
    JobPostingDetail,
    MyJobPostings,
    CreateJobPosting,
    JobCategories,
    Apply,
    MyApplications,
    PostingApplications,
    ApplicantCount,
    UpdateApplicationStatus,
    MatchPostingsForResume,
    MatchResumesForPosting,
}

impl Endpoint {
    pub const ALL: [Endpoint; 16] = [
        Endpoint::Login,
        Endpoint::MyResumes,
        Endpoint::ResumeDetail,
        Endpoint::CreateResume,
        Endpoint::JobPostings,
        Endpoint::JobPostingDetail,
        Endpoint::MyJobPostings,
        Endpoint::CreateJobPosting,
        Endpoint::JobCategories,
        Endpoint::Apply,
        Endpoint::MyApplications,
        Endpoint::PostingApplications,
        Endpoint::ApplicantCount,
        Endpoint::UpdateApplicationStatus,
        Endpoint::MatchPostingsForResume,
        Endpoint::MatchResumesForPosting,
    ];

    pub fn method(&self) -> HttpMethod {
        match self {
            Endpoint::Login
            | Endpoint::CreateResume
            | Endpoint::CreateJobPosting
            | Endpoint::Apply => HttpMethod::Post,
            Endpoint::UpdateApplicationStatus => HttpMethod::Put,
            _ => HttpMethod::Get,
        }
    }

    pub fn resource(&self) -> ResourceKind {
        match self {
            Endpoint::MyResumes
            | Endpoint::ResumeDetail
            | Endpoint::CreateResume
            | Endpoint::MatchPostingsForResume => ResourceKind::Resume,
            Endpoint::JobPostings
            | Endpoint::JobPostingDetail
            | Endpoint::MyJobPostings
            | Endpoint::CreateJobPosting
            | Endpoint::PostingApplications
            | Endpoint::ApplicantCount
            | Endpoint::MatchResumesForPosting => ResourceKind::JobPosting,
            Endpoint::Apply | Endpoint::MyApplications | Endpoint::UpdateApplicationStatus => {
                ResourceKind::Application
            }
            Endpoint::Login | Endpoint::JobCategories => ResourceKind::Generic,
        }
    }

    pub fn decode_strategy(&self) -> DecodeStrategy {
        match self {
            Endpoint::PostingApplications => DecodeStrategy::Lenient,
            Endpoint::JobCategories => DecodeStrategy::StringListOrWrapped {
                field: "categories",
            },
            Endpoint::UpdateApplicationStatus => DecodeStrategy::Discard,
            _ => DecodeStrategy::Strict,
        }
    }

    pub fn requires_auth(&self) -> bool {
        !matches!(self, Endpoint::Login)
    }

    /// List endpoints whose backend answers "no records" with an empty body.
    pub fn empty_body_is_empty_list(&self) -> bool {
        matches!(
            self,
            Endpoint::MyResumes
                | Endpoint::JobPostings
                | Endpoint::MyJobPostings
                | Endpoint::MyApplications
                | Endpoint::PostingApplications
                | Endpoint::JobCategories
                | Endpoint::MatchPostingsForResume
                | Endpoint::MatchResumesForPosting
        )
    }
}
