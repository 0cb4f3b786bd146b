//! In-memory stand-in for the job-matching backend.
//!
//! Seeded with two individuals, one company, a handful of postings and
//! match scores. It reproduces the payload quirks the client has to live
//! with: an empty body for "no applications", an untyped applicant list
//! containing a legacy row with missing fields, a wrapped category list,
//! and a posting whose applicant count always fails.

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};

pub const PASSWORD: &str = "secret";
pub const INDIVIDUAL_EMAIL: &str = "kim@example.com";
pub const NEWCOMER_EMAIL: &str = "new@example.com";
pub const COMPANY_EMAIL: &str = "hr@acme.com";

/// Posting whose count endpoint answers 500.
pub const FLAKY_POSTING_ID: i64 = 11;

const SEEDED_AT: &str = "2024-03-01T09:30:00";
const DEFAULT_TOP_N: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Role {
    Individual,
    Company,
}

#[derive(Clone, Debug)]
struct User {
    id: i64,
    email: &'static str,
    name: &'static str,
    role: Role,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resume {
    pub id: i64,
    #[serde(skip)]
    pub owner_id: i64,
    pub title: String,
    pub content: String,
    pub created_at: String,
    pub updated_at: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Posting {
    pub id: i64,
    #[serde(skip)]
    pub company_id: i64,
    pub title: String,
    pub description: String,
    pub company_name: String,
    pub location: Option<String>,
    pub created_at: String,
    pub deadline: Option<String>,
}

#[derive(Clone, Debug)]
struct Application {
    id: i64,
    posting_id: i64,
    resume_id: i64,
    applicant_id: i64,
    status: String,
    applied_at: String,
}

pub struct Backend {
    users: Vec<User>,
    resumes: Vec<Resume>,
    postings: Vec<Posting>,
    applications: Vec<Application>,
    /// Pre-migration applicant rows served as-is by the applicant list.
    legacy_rows: HashMap<i64, Vec<Value>>,
    resume_scores: HashMap<i64, Vec<(i64, f64)>>,
    posting_scores: HashMap<i64, Vec<(i64, f64)>>,
    flaky_counts: HashSet<i64>,
    categories: Vec<&'static str>,
}

impl Backend {
    fn seeded() -> Self {
        let users = vec![
            User {
                id: 1,
                email: INDIVIDUAL_EMAIL,
                name: "Kim",
                role: Role::Individual,
            },
            User {
                id: 2,
                email: COMPANY_EMAIL,
                name: "Acme",
                role: Role::Company,
            },
            User {
                id: 3,
                email: NEWCOMER_EMAIL,
                name: "Lee",
                role: Role::Individual,
            },
            User {
                id: 4,
                email: "jobs@globex.com",
                name: "Globex",
                role: Role::Company,
            },
        ];
        let resume = |id, title: &str| Resume {
            id,
            owner_id: 1,
            title: title.to_string(),
            content: format!("{title} content"),
            created_at: SEEDED_AT.to_string(),
            updated_at: None,
        };
        let posting = |id, company_id, company: &str, title: &str| Posting {
            id,
            company_id,
            title: title.to_string(),
            description: format!("{title} at {company}"),
            company_name: company.to_string(),
            location: Some("Seoul".to_string()),
            created_at: "2024-02-20 10:00".to_string(),
            deadline: Some("2024-12-31T23:59:00".to_string()),
        };
        Self {
            users,
            resumes: vec![resume(1, "Backend engineer"), resume(2, "Data analyst")],
            postings: vec![
                posting(10, 2, "Acme", "Rust Engineer"),
                posting(11, 2, "Acme", "iOS Engineer"),
                posting(12, 4, "Globex", "Data Analyst"),
            ],
            applications: vec![Application {
                id: 1,
                posting_id: 10,
                resume_id: 1,
                applicant_id: 1,
                status: "PENDING".to_string(),
                applied_at: SEEDED_AT.to_string(),
            }],
            legacy_rows: HashMap::from([(10, vec![json!({ "id": 99, "jobPostingId": 10 })])]),
            resume_scores: HashMap::from([
                (1, vec![(10, 0.72), (11, 0.95), (12, 0.95)]),
                (2, vec![(12, 0.61)]),
            ]),
            posting_scores: HashMap::from([(10, vec![(2, 0.599), (1, 0.88)])]),
            flaky_counts: HashSet::from([FLAKY_POSTING_ID]),
            categories: vec!["IT", "Design", "Marketing"],
        }
    }

    fn user_by_token(&self, token: &str) -> Option<&User> {
        let id: i64 = token.strip_prefix("token-")?.parse().ok()?;
        self.users.iter().find(|u| u.id == id)
    }

    fn posting(&self, id: i64) -> Result<&Posting, Failure> {
        self.postings.iter().find(|p| p.id == id).ok_or(Failure::NotFound)
    }

    fn owned_posting(&self, user: &User, id: i64) -> Result<&Posting, Failure> {
        let posting = self.posting(id)?;
        if posting.company_id != user.id {
            return Err(Failure::Forbidden("not your posting"));
        }
        Ok(posting)
    }

    fn owned_resume(&self, user: &User, id: i64) -> Result<&Resume, Failure> {
        self.resumes
            .iter()
            .find(|r| r.id == id && r.owner_id == user.id)
            .ok_or(Failure::NotFound)
    }
}

pub type Db = Arc<RwLock<Backend>>;

/// Error responses in the shapes the real backend uses: JSON for 401, plain
/// text otherwise.
#[derive(Debug)]
pub enum Failure {
    Unauthorized(&'static str),
    Forbidden(&'static str),
    NotFound,
    BadRequest(&'static str),
    Internal(&'static str),
}

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        match self {
            Failure::Unauthorized(message) => {
                (StatusCode::UNAUTHORIZED, Json(json!({ "message": message }))).into_response()
            }
            Failure::Forbidden(text) => (StatusCode::FORBIDDEN, text).into_response(),
            Failure::NotFound => (StatusCode::NOT_FOUND, "Not Found").into_response(),
            Failure::BadRequest(text) => (StatusCode::BAD_REQUEST, text).into_response(),
            Failure::Internal(text) => (StatusCode::INTERNAL_SERVER_ERROR, text).into_response(),
        }
    }
}

fn authenticate(
    headers: &HeaderMap,
    backend: &Backend,
    role: Option<Role>,
) -> Result<User, Failure> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(Failure::Unauthorized("missing bearer token"))?;
    let user = backend
        .user_by_token(token)
        .ok_or(Failure::Unauthorized("invalid token"))?;
    match role {
        Some(Role::Company) if user.role != Role::Company => {
            Err(Failure::Forbidden("company accounts only"))
        }
        Some(Role::Individual) if user.role != Role::Individual => {
            Err(Failure::Forbidden("individual accounts only"))
        }
        _ => Ok(user.clone()),
    }
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Backend::seeded()));
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/resumes", post(create_resume))
        .route("/api/resumes/my", get(my_resumes))
        .route("/api/resumes/{id}", get(get_resume))
        .route("/api/job-postings", get(list_postings).post(create_posting))
        .route("/api/job-postings/my", get(my_postings))
        .route("/api/job-postings/categories", get(categories))
        .route("/api/job-postings/{id}", get(get_posting))
        .route("/api/applications", post(apply))
        .route("/api/applications/my", get(my_applications))
        .route("/api/applications/job-posting/{id}", get(posting_applications))
        .route("/api/applications/job-posting/{id}/count", get(applicant_count))
        .route("/api/applications/{id}/status", put(update_status))
        .route("/api/matching/resume/{id}/job-postings", get(match_postings))
        .route("/api/matching/job-posting/{id}/resumes", get(match_resumes))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

// --- auth ---

#[derive(Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

async fn login(
    State(db): State<Db>,
    Json(input): Json<LoginInput>,
) -> Result<Json<Value>, Failure> {
    let backend = db.read().await;
    let user = backend
        .users
        .iter()
        .find(|u| u.email == input.email && input.password == PASSWORD)
        .ok_or(Failure::Unauthorized("invalid credentials"))?;
    tracing::info!(user_id = user.id, "login");
    Ok(Json(json!({
        "token": format!("token-{}", user.id),
        "name": user.name,
        "email": user.email,
        "userType": match user.role {
            Role::Individual => "INDIVIDUAL",
            Role::Company => "COMPANY",
        },
    })))
}

// --- resumes ---

#[derive(Deserialize)]
pub struct ResumeInput {
    pub title: String,
    pub content: String,
}

async fn my_resumes(
    State(db): State<Db>,
    headers: HeaderMap,
) -> Result<Json<Vec<Resume>>, Failure> {
    let backend = db.read().await;
    let user = authenticate(&headers, &backend, Some(Role::Individual))?;
    let resumes = backend.resumes.iter().filter(|r| r.owner_id == user.id).cloned().collect();
    Ok(Json(resumes))
}

async fn get_resume(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<Resume>, Failure> {
    let backend = db.read().await;
    let user = authenticate(&headers, &backend, Some(Role::Individual))?;
    backend.owned_resume(&user, id).cloned().map(Json)
}

async fn create_resume(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<ResumeInput>,
) -> Result<Json<Resume>, Failure> {
    let mut backend = db.write().await;
    let user = authenticate(&headers, &backend, Some(Role::Individual))?;
    let resume = Resume {
        id: backend.resumes.iter().map(|r| r.id).max().unwrap_or(0) + 1,
        owner_id: user.id,
        title: input.title,
        content: input.content,
        created_at: SEEDED_AT.to_string(),
        updated_at: None,
    };
    backend.resumes.push(resume.clone());
    Ok(Json(resume))
}

// --- postings ---

#[derive(Deserialize)]
pub struct PostingInput {
    pub title: String,
    pub description: String,
    pub location: Option<String>,
    pub deadline: String,
}

async fn list_postings(
    State(db): State<Db>,
    headers: HeaderMap,
) -> Result<Json<Vec<Posting>>, Failure> {
    let backend = db.read().await;
    authenticate(&headers, &backend, None)?;
    Ok(Json(backend.postings.clone()))
}

async fn my_postings(
    State(db): State<Db>,
    headers: HeaderMap,
) -> Result<Json<Vec<Posting>>, Failure> {
    let backend = db.read().await;
    let user = authenticate(&headers, &backend, Some(Role::Company))?;
    let postings = backend.postings.iter().filter(|p| p.company_id == user.id).cloned().collect();
    Ok(Json(postings))
}

async fn get_posting(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<Posting>, Failure> {
    let backend = db.read().await;
    authenticate(&headers, &backend, None)?;
    backend.posting(id).cloned().map(Json)
}

async fn create_posting(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<PostingInput>,
) -> Result<Json<Posting>, Failure> {
    let mut backend = db.write().await;
    let user = authenticate(&headers, &backend, Some(Role::Company))?;
    let posting = Posting {
        id: backend.postings.iter().map(|p| p.id).max().unwrap_or(0) + 1,
        company_id: user.id,
        title: input.title,
        description: input.description,
        company_name: user.name.to_string(),
        location: input.location,
        created_at: SEEDED_AT.to_string(),
        deadline: Some(input.deadline),
    };
    backend.postings.push(posting.clone());
    Ok(Json(posting))
}

async fn categories(State(db): State<Db>, headers: HeaderMap) -> Result<Json<Value>, Failure> {
    let backend = db.read().await;
    authenticate(&headers, &backend, None)?;
    Ok(Json(json!({ "categories": backend.categories })))
}

// --- applications ---

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyInput {
    pub job_posting_id: i64,
    pub resume_id: i64,
}

#[derive(Deserialize)]
pub struct StatusInput {
    pub status: String,
}

fn my_application_json(backend: &Backend, app: &Application) -> Value {
    let title = backend
        .posting(app.posting_id)
        .map(|p| p.title.clone())
        .unwrap_or_default();
    json!({
        "id": app.id,
        "jobPostingId": app.posting_id,
        "jobPostingTitle": title,
        "resumeId": app.resume_id,
        "status": app.status,
        "appliedAt": app.applied_at,
    })
}

async fn apply(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<ApplyInput>,
) -> Result<Json<Value>, Failure> {
    let mut backend = db.write().await;
    let user = authenticate(&headers, &backend, Some(Role::Individual))?;
    backend.posting(input.job_posting_id)?;
    backend.owned_resume(&user, input.resume_id)?;
    let application = Application {
        id: backend.applications.iter().map(|a| a.id).max().unwrap_or(0) + 1,
        posting_id: input.job_posting_id,
        resume_id: input.resume_id,
        applicant_id: user.id,
        status: "PENDING".to_string(),
        applied_at: "2024-03-02 14:05".to_string(),
    };
    backend.applications.push(application.clone());
    Ok(Json(my_application_json(&backend, &application)))
}

/// Answers an empty body, not `[]`, when the user has no applications.
async fn my_applications(State(db): State<Db>, headers: HeaderMap) -> Result<Response, Failure> {
    let backend = db.read().await;
    let user = authenticate(&headers, &backend, Some(Role::Individual))?;
    let mine: Vec<Value> = backend
        .applications
        .iter()
        .filter(|a| a.applicant_id == user.id)
        .map(|a| my_application_json(&backend, a))
        .collect();
    if mine.is_empty() {
        return Ok((StatusCode::OK, String::new()).into_response());
    }
    Ok(Json(mine).into_response())
}

async fn posting_applications(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<Vec<Value>>, Failure> {
    let backend = db.read().await;
    let user = authenticate(&headers, &backend, Some(Role::Company))?;
    backend.owned_posting(&user, id)?;
    let mut rows: Vec<Value> = backend
        .applications
        .iter()
        .filter(|a| a.posting_id == id)
        .filter_map(|a| {
            let applicant = backend.users.iter().find(|u| u.id == a.applicant_id)?;
            Some(json!({
                "id": a.id,
                "jobPostingId": a.posting_id,
                "applicantId": applicant.id,
                "applicantName": applicant.name,
                "applicantEmail": applicant.email,
                "appliedAt": a.applied_at,
                "status": a.status,
            }))
        })
        .collect();
    rows.extend(backend.legacy_rows.get(&id).cloned().unwrap_or_default());
    Ok(Json(rows))
}

async fn applicant_count(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<usize>, Failure> {
    let backend = db.read().await;
    authenticate(&headers, &backend, Some(Role::Company))?;
    backend.posting(id)?;
    if backend.flaky_counts.contains(&id) {
        tracing::warn!(posting_id = id, "count backend unavailable");
        return Err(Failure::Internal("count service unavailable"));
    }
    Ok(Json(backend.applications.iter().filter(|a| a.posting_id == id).count()))
}

async fn update_status(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(input): Json<StatusInput>,
) -> Result<StatusCode, Failure> {
    let mut backend = db.write().await;
    let user = authenticate(&headers, &backend, Some(Role::Company))?;
    if !["PENDING", "REVIEWED", "ACCEPTED", "REJECTED"].contains(&input.status.as_str()) {
        return Err(Failure::BadRequest("unknown status"));
    }
    let posting_id = backend
        .applications
        .iter()
        .find(|a| a.id == id)
        .map(|a| a.posting_id)
        .ok_or(Failure::NotFound)?;
    backend.owned_posting(&user, posting_id)?;
    if let Some(app) = backend.applications.iter_mut().find(|a| a.id == id) {
        app.status = input.status;
    }
    Ok(StatusCode::OK)
}

// --- matching ---

#[derive(Deserialize)]
pub struct MatchQuery {
    #[serde(rename = "topN")]
    pub top_n: Option<usize>,
}

/// Scores are returned in storage order; ranking is the client's job.
async fn match_postings(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Query(query): Query<MatchQuery>,
) -> Result<Json<Vec<Value>>, Failure> {
    let backend = db.read().await;
    let user = authenticate(&headers, &backend, Some(Role::Individual))?;
    backend.owned_resume(&user, id)?;
    let matches = backend
        .resume_scores
        .get(&id)
        .into_iter()
        .flatten()
        .take(query.top_n.unwrap_or(DEFAULT_TOP_N))
        .filter_map(|&(posting_id, score)| {
            let posting = backend.posting(posting_id).ok()?;
            Some(json!({
                "jobPostingId": posting.id,
                "title": posting.title,
                "companyName": posting.company_name,
                "description": posting.description,
                "createdAt": posting.created_at,
                "score": score,
            }))
        })
        .collect();
    Ok(Json(matches))
}

async fn match_resumes(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Query(query): Query<MatchQuery>,
) -> Result<Json<Vec<Value>>, Failure> {
    let backend = db.read().await;
    let user = authenticate(&headers, &backend, Some(Role::Company))?;
    backend.owned_posting(&user, id)?;
    let matches = backend
        .posting_scores
        .get(&id)
        .into_iter()
        .flatten()
        .take(query.top_n.unwrap_or(DEFAULT_TOP_N))
        .filter_map(|&(resume_id, score)| {
            let resume = backend.resumes.iter().find(|r| r.id == resume_id)?;
            let owner = backend.users.iter().find(|u| u.id == resume.owner_id)?;
            Some(json!({
                "resumeId": resume.id,
                "title": resume.title,
                "ownerName": owner.name,
                "content": resume.content,
                "createdAt": resume.created_at,
                "score": score,
            }))
        })
        .collect();
    Ok(Json(matches))
}
