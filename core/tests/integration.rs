//! End-to-end flows against the live mock backend.
//!
//! # Design
//! The first test plays a host doing its own I/O: it builds requests with
//! `JobMatchClient`, executes them with ureq, and hands the responses back to
//! the `parse_*` methods. The remaining tests run `JobMatchService` over
//! `ReqwestTransport`. Each test starts its own server on a random port.

use jobmatch_core::{
    rank, AccountType, ApiError, HttpMethod, HttpRequest, HttpResponse, JobMatchClient, MatchBucket,
};
use mock_server::{COMPANY_EMAIL, INDIVIDUAL_EMAIL, NEWCOMER_EMAIL, PASSWORD};

fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    for (key, value) in headers {
        builder = builder.header(key.as_str(), value.as_str());
    }
    builder
}

/// Execute an `HttpRequest` using ureq and return an `HttpResponse`.
///
/// Status codes are returned as data so the core does the classification.
fn execute(req: HttpRequest) -> HttpResponse {
    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();

    let mut response = match (req.method, req.body) {
        (HttpMethod::Get, _) => with_headers(agent.get(&req.url), &req.headers).call(),
        (HttpMethod::Post, Some(body)) => {
            with_headers(agent.post(&req.url), &req.headers).send(body.as_bytes())
        }
        (HttpMethod::Post, None) => with_headers(agent.post(&req.url), &req.headers).send_empty(),
        (HttpMethod::Put, Some(body)) => {
            with_headers(agent.put(&req.url), &req.headers).send(body.as_bytes())
        }
        (HttpMethod::Put, None) => with_headers(agent.put(&req.url), &req.headers).send_empty(),
    }
    .expect("HTTP transport error");

    let status = response.status().as_u16();
    let body = response.body_mut().read_to_string().unwrap_or_default();
    HttpResponse::new(status, body)
}

fn start_blocking_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });
    format!("http://{addr}")
}

#[test]
fn host_driven_session() {
    let client = JobMatchClient::new(&start_blocking_server());

    // Step 1: bad password is classified from the 401 body.
    let req = client.build_login(INDIVIDUAL_EMAIL, "wrong").unwrap();
    let err = client.parse_login(&execute(req)).unwrap_err();
    assert_eq!(err, ApiError::Unauthorized("invalid credentials".into()));

    // Step 2: log in.
    let req = client.build_login(INDIVIDUAL_EMAIL, PASSWORD).unwrap();
    let login = client.parse_login(&execute(req)).unwrap();
    assert_eq!(login.user_type, AccountType::Individual);
    let token = login.token;

    // Step 3: list resumes.
    let resumes = client.parse_my_resumes(&execute(client.build_my_resumes(&token))).unwrap();
    assert_eq!(resumes.len(), 2);
    assert!(resumes[0].created_at_time().is_some());

    // Step 4: unknown resume reads as a resume-specific 404.
    let err = client.parse_resume(&execute(client.build_resume(&token, 404))).unwrap_err();
    assert_eq!(err, ApiError::ServerError("resume not found".into()));

    // Step 5: categories arrive wrapped.
    let categories = client
        .parse_job_categories(&execute(client.build_job_categories(&token)))
        .unwrap();
    assert_eq!(categories, vec!["IT", "Design", "Marketing"]);

    // Step 6: match postings and rank them on the host side.
    let req = client.build_match_postings_for_resume(&token, 1, 10).unwrap();
    let matches = client.parse_match_postings_for_resume(&execute(req)).unwrap();
    let ranked = rank(matches);
    let order: Vec<_> = ranked.iter().map(|r| (r.rank, r.record.job_posting_id)).collect();
    assert_eq!(order, vec![(1, 11), (2, 12), (3, 10)]);
    assert_eq!(ranked[2].bucket, MatchBucket::Good);

    // Step 7: company-only endpoint is forbidden with the server's text.
    let err = client
        .parse_my_job_postings(&execute(client.build_my_job_postings(&token)))
        .unwrap_err();
    assert_eq!(err, ApiError::Forbidden("company accounts only".into()));

    // Step 8: a newcomer without applications gets an empty body, read as [].
    let req = client.build_login(NEWCOMER_EMAIL, PASSWORD).unwrap();
    let newcomer = client.parse_login(&execute(req)).unwrap().token;
    let apps = client
        .parse_my_applications(&execute(client.build_my_applications(&newcomer)))
        .unwrap();
    assert!(apps.is_empty());

    // Step 9: company sees applicants; the legacy row is dropped.
    let req = client.build_login(COMPANY_EMAIL, PASSWORD).unwrap();
    let company = client.parse_login(&execute(req)).unwrap().token;
    let applicants = client
        .parse_posting_applications(&execute(client.build_posting_applications(&company, 10)))
        .unwrap();
    assert_eq!(applicants.len(), 1);
    assert_eq!(applicants[0].applicant_email, INDIVIDUAL_EMAIL);
}

#[cfg(feature = "http-client")]
mod over_reqwest {
    use std::collections::BTreeMap;
    use std::sync::Arc;
    use std::time::Duration;

    use jobmatch_core::{
        ApiError, ApplicationStatus, ClientConfig, JobMatchService, MatchBucket, MemoryStore,
        NewResume, ReqwestTransport, Severity,
    };
    use mock_server::{COMPANY_EMAIL, INDIVIDUAL_EMAIL, NEWCOMER_EMAIL, PASSWORD};

    async fn spawn_server() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { mock_server::run(listener).await.unwrap() });
        format!("http://{addr}")
    }

    fn service(base_url: &str) -> JobMatchService<ReqwestTransport> {
        let config = ClientConfig::new(base_url).with_timeout(Duration::from_secs(5));
        let transport = ReqwestTransport::new(&config).unwrap();
        JobMatchService::with_storage(&config, Arc::new(MemoryStore::new()), transport)
    }

    #[tokio::test]
    async fn company_dashboard_counts_default_failures_to_zero() {
        let service = service(&spawn_server().await);
        service.login(COMPANY_EMAIL, PASSWORD, true).await.unwrap();

        let postings = service.my_job_postings().await.unwrap();
        let ids: Vec<_> = postings.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![10, 11]);

        let counts = service.collect_applicant_counts(&postings).await;
        assert_eq!(counts, BTreeMap::from([(10, 1), (11, 0)]));
    }

    #[tokio::test]
    async fn candidates_are_ranked_for_a_posting() {
        let service = service(&spawn_server().await);
        service.login(COMPANY_EMAIL, PASSWORD, false).await.unwrap();

        let ranked = service.match_resumes_for_posting(10, 10).await.unwrap();
        let summary: Vec<_> = ranked
            .iter()
            .map(|r| (r.rank, r.record.resume_id, r.percentage, r.bucket))
            .collect();
        assert_eq!(
            summary,
            vec![(1, 1, 88, MatchBucket::High), (2, 2, 59, MatchBucket::Low)]
        );
        assert_eq!(ranked[0].record.owner_name, "Kim");
        assert_eq!(ranked[1].severity(), Severity::Gray);
    }

    #[tokio::test]
    async fn applying_shows_up_in_my_applications() {
        let service = service(&spawn_server().await);
        service.login(NEWCOMER_EMAIL, PASSWORD, false).await.unwrap();
        assert!(service.my_applications().await.unwrap().is_empty());

        let resume = service
            .create_resume(&NewResume {
                title: "Mobile developer".into(),
                content: "Swift, Kotlin".into(),
            })
            .await
            .unwrap();
        let application = service.apply(12, resume.id).await.unwrap();
        assert_eq!(application.status, ApplicationStatus::Pending);

        let mine = service.my_applications().await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].job_posting_title, "Data Analyst");
    }

    #[tokio::test]
    async fn company_can_review_an_application() {
        let service = service(&spawn_server().await);
        service.login(COMPANY_EMAIL, PASSWORD, false).await.unwrap();
        service
            .update_application_status(1, ApplicationStatus::Reviewed)
            .await
            .unwrap();

        let applicants = service.posting_applications(10).await.unwrap();
        assert_eq!(applicants[0].status, ApplicationStatus::Reviewed);
    }

    #[tokio::test]
    async fn logout_stops_further_calls_locally() {
        let service = service(&spawn_server().await);
        service.login(INDIVIDUAL_EMAIL, PASSWORD, true).await.unwrap();
        assert!(service.session().profile().is_some());

        service.logout();
        assert!(service.session().profile().is_none());
        assert!(matches!(service.my_resumes().await, Err(ApiError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn unreachable_host_is_unknown() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let service = service(&format!("http://{addr}"));
        let err = service.login(INDIVIDUAL_EMAIL, PASSWORD, false).await.unwrap_err();
        assert_eq!(err, ApiError::Unknown);
        assert!(service.session().get().is_none());
    }
}
