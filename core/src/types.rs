//! Domain DTOs for the job-matching API.
//!
//! Wire names are camelCase. Timestamps stay raw strings on received
//! records (see `timestamp`); only outbound dates are typed.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::timestamp::parse_timestamp;

pub type ResumeId = i64;
pub type PostingId = i64;
pub type ApplicationId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountType {
    Individual,
    Company,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Individual => "INDIVIDUAL",
            AccountType::Company => "COMPANY",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "INDIVIDUAL" => Some(AccountType::Individual),
            "COMPANY" => Some(AccountType::Company),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub name: String,
    pub email: String,
    pub user_type: AccountType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resume {
    pub id: ResumeId,
    pub title: String,
    pub content: String,
    pub created_at: String,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Resume {
    pub fn created_at_time(&self) -> Option<NaiveDateTime> {
        parse_timestamp(&self.created_at)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewResume {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPosting {
    pub id: PostingId,
    pub title: String,
    pub description: String,
    pub company_name: String,
    #[serde(default)]
    pub location: Option<String>,
    pub created_at: String,
    #[serde(default)]
    pub deadline: Option<String>,
}

impl JobPosting {
    pub fn created_at_time(&self) -> Option<NaiveDateTime> {
        parse_timestamp(&self.created_at)
    }

    pub fn deadline_time(&self) -> Option<NaiveDateTime> {
        self.deadline.as_deref().and_then(parse_timestamp)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewJobPosting {
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(with = "crate::timestamp::wire")]
    pub deadline: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    Pending,
    Reviewed,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "PENDING" => Some(ApplicationStatus::Pending),
            "REVIEWED" => Some(ApplicationStatus::Reviewed),
            "ACCEPTED" => Some(ApplicationStatus::Accepted),
            "REJECTED" => Some(ApplicationStatus::Rejected),
            _ => None,
        }
    }
}

/// An application as seen by the applicant ("my applications").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: ApplicationId,
    pub job_posting_id: PostingId,
    pub job_posting_title: String,
    pub resume_id: ResumeId,
    pub status: ApplicationStatus,
    pub applied_at: String,
}

/// An application as seen by the posting company. Decoded leniently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRecord {
    pub id: ApplicationId,
    pub job_posting_id: PostingId,
    pub applicant_id: i64,
    pub applicant_name: String,
    pub applicant_email: String,
    pub applied_at: String,
    pub status: ApplicationStatus,
}

impl ApplicationRecord {
    pub fn applied_at_time(&self) -> Option<NaiveDateTime> {
        parse_timestamp(&self.applied_at)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyRequest {
    pub job_posting_id: PostingId,
    pub resume_id: ResumeId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: ApplicationStatus,
}

/// A posting scored against one of the caller's resumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPostingMatch {
    pub job_posting_id: PostingId,
    pub title: String,
    pub company_name: String,
    pub description: String,
    pub created_at: String,
    pub score: f64,
}

/// A candidate resume scored against one of the caller's postings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeMatch {
    pub resume_id: ResumeId,
    pub title: String,
    pub owner_name: String,
    pub content: String,
    pub created_at: String,
    pub score: f64,
}
