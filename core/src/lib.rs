//! API client core for the job-matching platform.
//!
//! # Overview
//! Individuals manage resumes and applications, companies manage postings
//! and review applicants, and both consume server-side match scores. This
//! crate owns the typed client underneath those screens: the auth token's
//! lifecycle, request construction, response classification, payload
//! decoding, match ranking, and per-posting aggregation.
//!
//! # Design
//! - `JobMatchClient` is stateless: `build_*` produces an `HttpRequest`,
//!   `parse_*` consumes an `HttpResponse`. Hosts doing their own I/O (the C
//!   binding) stop here.
//! - `JobMatchService` adds the `SessionStore` and a `Transport`, and runs
//!   build, send, classify, decode in one async call.
//! - Decoding is strict or lenient per endpoint (`endpoint::DecodeStrategy`).
//! - `ranking::rank` serves both matching directions via `Scored`.

pub mod aggregate;
pub mod classify;
pub mod client;
pub mod config;
pub mod decode;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod ranking;
pub mod request;
pub mod service;
pub mod session;
pub mod timestamp;
pub mod transport;
pub mod types;

pub use aggregate::collect_counts;
pub use client::JobMatchClient;
pub use config::{ClientConfig, ConfigError};
pub use endpoint::{DecodeStrategy, Endpoint};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use ranking::{rank, MatchBucket, RankedRecord, Scored, Severity};
pub use service::JobMatchService;
pub use session::{KeyValueStore, MemoryStore, SessionStore, UserProfile};
#[cfg(feature = "http-client")]
pub use transport::ReqwestTransport;
pub use transport::{Transport, TransportError};
pub use types::{
    AccountType, Application, ApplicationRecord, ApplicationStatus, JobPosting, JobPostingMatch,
    LoginResponse, NewJobPosting, NewResume, PostingId, Resume, ResumeId, ResumeMatch,
};
