//! Drives the C surface the way a mobile host does: build through `jm_*`,
//! execute with its own HTTP stack (ureq here), parse through `jm_*`.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use mock_server::{COMPANY_EMAIL, FLAKY_POSTING_ID, INDIVIDUAL_EMAIL, PASSWORD};

use crate::types::*;
use crate::*;

fn c_str(ptr: *const c_char) -> String {
    unsafe { CStr::from_ptr(ptr) }.to_str().unwrap().to_string()
}

fn start_server() -> String {
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

/// Execute a request built by the library, free it, and return status + body.
fn execute(req: *mut FfiHttpRequest) -> (u16, CString) {
    assert!(!req.is_null());
    let r = unsafe { &*req };
    let url = c_str(r.url);
    let headers: Vec<(String, String)> = if r.headers.is_null() {
        Vec::new()
    } else {
        unsafe { std::slice::from_raw_parts(r.headers, r.headers_len as usize) }
            .iter()
            .map(|h| (c_str(h.key), c_str(h.value)))
            .collect()
    };
    let body = (!r.body.is_null()).then(|| c_str(r.body));
    let method = r.method;
    jm_free_request(req);

    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();
    let mut response = match method {
        FfiHttpMethod::Get => {
            let mut builder = agent.get(&url);
            for (k, v) in &headers {
                builder = builder.header(k.as_str(), v.as_str());
            }
            builder.call()
        }
        FfiHttpMethod::Post => {
            let mut builder = agent.post(&url);
            for (k, v) in &headers {
                builder = builder.header(k.as_str(), v.as_str());
            }
            builder.send(body.unwrap_or_default().as_bytes())
        }
        other => panic!("method not used by the binding: {other:?}"),
    }
    .expect("HTTP transport error");

    let status = response.status().as_u16();
    let text = response.body_mut().read_to_string().unwrap_or_default();
    (status, CString::new(text).unwrap())
}

fn login(client: *const FfiClient, email: &str) -> String {
    let email = CString::new(email).unwrap();
    let password = CString::new(PASSWORD).unwrap();
    let (status, body) = execute(jm_build_login(client, email.as_ptr(), password.as_ptr()));
    let resp = FfiHttpResponse {
        status,
        body: body.as_ptr(),
    };
    let result = jm_parse_login(client, &resp);
    let r = unsafe { &*result };
    assert_eq!(r.error_code, FfiErrorCode::Ok);
    let token = c_str(unsafe { &*(r.data as *const FfiLogin) }.token);
    jm_free_result(result);
    token
}

#[test]
fn ranked_postings_for_an_individual() {
    let url = CString::new(start_server()).unwrap();
    let client = jm_client_new(url.as_ptr());
    let token = CString::new(login(client, INDIVIDUAL_EMAIL)).unwrap();

    let (status, body) =
        execute(jm_build_match_postings_for_resume(client, token.as_ptr(), 1, 10));
    let resp = FfiHttpResponse {
        status,
        body: body.as_ptr(),
    };
    let result = jm_parse_match_postings_for_resume(client, &resp);
    let r = unsafe { &*result };
    assert_eq!(r.error_code, FfiErrorCode::Ok);

    let list = unsafe { &*(r.data as *const FfiRankedList) };
    let items = unsafe { std::slice::from_raw_parts(list.items, list.len as usize) };
    let order: Vec<_> = items.iter().map(|m| (m.rank, m.target_id)).collect();
    assert_eq!(order, vec![(1, 11), (2, 12), (3, 10)]);
    assert_eq!(c_str(items[1].subtitle), "Globex");

    jm_free_result(result);
    jm_client_free(client);
}

#[test]
fn applicant_counts_for_a_company() {
    let url = CString::new(start_server()).unwrap();
    let client = jm_client_new(url.as_ptr());
    let token = CString::new(login(client, COMPANY_EMAIL)).unwrap();

    let (status, body) = execute(jm_build_applicant_count(client, token.as_ptr(), 10));
    let resp = FfiHttpResponse {
        status,
        body: body.as_ptr(),
    };
    let result = jm_parse_applicant_count(client, &resp);
    let r = unsafe { &*result };
    assert_eq!(r.data_tag, FfiDataTag::Count);
    assert_eq!(unsafe { &*(r.data as *const FfiCount) }.count, 1);
    jm_free_result(result);

    let (status, body) = execute(jm_build_applicant_count(
        client,
        token.as_ptr(),
        FLAKY_POSTING_ID,
    ));
    let resp = FfiHttpResponse {
        status,
        body: body.as_ptr(),
    };
    let result = jm_parse_applicant_count(client, &resp);
    let r = unsafe { &*result };
    assert_eq!(r.error_code, FfiErrorCode::ServerError);
    assert_eq!(c_str(r.error_message), "500: count service unavailable");
    jm_free_result(result);

    jm_client_free(client);
}

#[test]
fn posting_applicants_skip_the_legacy_row() {
    let url = CString::new(start_server()).unwrap();
    let client = jm_client_new(url.as_ptr());
    let token = CString::new(login(client, COMPANY_EMAIL)).unwrap();

    let (status, body) = execute(jm_build_posting_applications(client, token.as_ptr(), 10));
    let resp = FfiHttpResponse {
        status,
        body: body.as_ptr(),
    };
    let result = jm_parse_posting_applications(client, &resp);
    let r = unsafe { &*result };
    assert_eq!(r.error_code, FfiErrorCode::Ok);

    let list = unsafe { &*(r.data as *const FfiApplicationList) };
    let items = unsafe { std::slice::from_raw_parts(list.items, list.len as usize) };
    assert_eq!(items.len(), 1);
    assert_eq!(c_str(items[0].applicant_name), "Kim");
    assert_eq!(items[0].status, FfiApplicationStatus::Pending);

    jm_free_result(result);
    jm_client_free(client);
}
