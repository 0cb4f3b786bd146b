//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type with C-compatible representations:
//! `*mut c_char` instead of `String`, pointer plus length instead of `Vec`,
//! and enums with explicit discriminants. Conversions live here so `lib.rs`
//! stays focused on the `extern "C"` surface.

use std::ffi::{c_void, CString};
use std::os::raw::c_char;

use jobmatch_core::{
    AccountType, ApiError, ApplicationRecord, ApplicationStatus, HttpMethod, HttpRequest,
    JobMatchClient, JobPostingMatch, LoginResponse, MatchBucket, RankedRecord, ResumeMatch, Scored,
    Severity,
};

/// Opaque handle to a `JobMatchClient`.
pub struct FfiClient {
    pub(crate) inner: JobMatchClient,
}

/// Convert to a heap C string. Interior NUL bytes are dropped rather than
/// failing the whole call.
pub(crate) fn to_c_string(s: String) -> *mut c_char {
    CString::new(s)
        .unwrap_or_else(|err| {
            let mut bytes = err.into_vec();
            bytes.retain(|&b| b != 0);
            CString::new(bytes).unwrap_or_default()
        })
        .into_raw()
}

/// Release a string produced by `to_c_string`. Null is ignored.
///
/// # Safety
/// `ptr` must be null or come from `to_c_string` and not be freed yet.
pub(crate) unsafe fn free_c_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(unsafe { CString::from_raw(ptr) });
    }
}

/// Leak a vector as pointer + length. Empty vectors become null.
fn into_raw_parts<T>(items: Vec<T>) -> (*mut T, u32) {
    if items.is_empty() {
        return (std::ptr::null_mut(), 0);
    }
    let mut items = items.into_boxed_slice();
    let len = items.len() as u32;
    let ptr = items.as_mut_ptr();
    std::mem::forget(items);
    (ptr, len)
}

/// Reclaim a slice leaked by `into_raw_parts`.
///
/// # Safety
/// `ptr`/`len` must come from `into_raw_parts` and not be reclaimed yet.
pub(crate) unsafe fn from_raw_parts<T>(ptr: *mut T, len: u32) -> Vec<T> {
    if ptr.is_null() || len == 0 {
        return Vec::new();
    }
    let slice = std::ptr::slice_from_raw_parts_mut(ptr, len as usize);
    unsafe { Box::from_raw(slice) }.into_vec()
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiHttpMethod {
    Get = 0,
    Post = 1,
    Put = 2,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
            HttpMethod::Post => FfiHttpMethod::Post,
            HttpMethod::Put => FfiHttpMethod::Put,
        }
    }
}

#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// A request for the host to execute. `url` is absolute, query included.
/// `body` is null when there is none.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub url: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    pub body: *mut c_char,
}

impl FfiHttpRequest {
    pub(crate) fn from_core(req: HttpRequest) -> *mut Self {
        let headers: Vec<FfiHeader> = req
            .headers
            .into_iter()
            .map(|(k, v)| FfiHeader {
                key: to_c_string(k),
                value: to_c_string(v),
            })
            .collect();
        let (headers, headers_len) = into_raw_parts(headers);

        Box::into_raw(Box::new(FfiHttpRequest {
            method: req.method.into(),
            url: to_c_string(req.url),
            headers,
            headers_len,
            body: req.body.map_or(std::ptr::null_mut(), to_c_string),
        }))
    }

    /// # Safety
    /// `req` must come from `from_core` and not be freed yet.
    pub(crate) unsafe fn free(req: *mut Self) {
        let req = unsafe { Box::from_raw(req) };
        unsafe {
            free_c_string(req.url);
            free_c_string(req.body);
            for header in from_raw_parts(req.headers, req.headers_len) {
                free_c_string(header.key);
                free_c_string(header.value);
            }
        }
    }
}

/// Response filled in by the host after executing a request. Read, never
/// freed, by this library. A null `body` reads as empty.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const c_char,
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Mirrors `ApiError`, plus the two failures only the binding can produce.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    InvalidInput = 1,
    NoData = 2,
    DecodingFailure = 3,
    Unauthorized = 4,
    Forbidden = 5,
    ServerError = 6,
    Unknown = 7,
    Panic = 8,
    NullArg = 9,
}

impl From<&ApiError> for FfiErrorCode {
    fn from(err: &ApiError) -> Self {
        match err {
            ApiError::InvalidInput => FfiErrorCode::InvalidInput,
            ApiError::NoData => FfiErrorCode::NoData,
            ApiError::DecodingFailure => FfiErrorCode::DecodingFailure,
            ApiError::Unauthorized(_) => FfiErrorCode::Unauthorized,
            ApiError::Forbidden(_) => FfiErrorCode::Forbidden,
            ApiError::ServerError(_) => FfiErrorCode::ServerError,
            ApiError::Unknown => FfiErrorCode::Unknown,
        }
    }
}

/// What `FfiResult::data` points to.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiDataTag {
    None = 0,
    Login = 1,
    RankedList = 2,
    Count = 3,
    StringList = 4,
    ApplicationList = 5,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiAccountType {
    Individual = 0,
    Company = 1,
}

impl From<AccountType> for FfiAccountType {
    fn from(t: AccountType) -> Self {
        match t {
            AccountType::Individual => FfiAccountType::Individual,
            AccountType::Company => FfiAccountType::Company,
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiMatchBucket {
    Low = 0,
    Basic = 1,
    Good = 2,
    High = 3,
    Perfect = 4,
}

impl From<MatchBucket> for FfiMatchBucket {
    fn from(b: MatchBucket) -> Self {
        match b {
            MatchBucket::Low => FfiMatchBucket::Low,
            MatchBucket::Basic => FfiMatchBucket::Basic,
            MatchBucket::Good => FfiMatchBucket::Good,
            MatchBucket::High => FfiMatchBucket::High,
            MatchBucket::Perfect => FfiMatchBucket::Perfect,
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiSeverity {
    Red = 0,
    Green = 1,
    Orange = 2,
    Blue = 3,
    Gray = 4,
}

impl From<Severity> for FfiSeverity {
    fn from(s: Severity) -> Self {
        match s {
            Severity::Red => FfiSeverity::Red,
            Severity::Green => FfiSeverity::Green,
            Severity::Orange => FfiSeverity::Orange,
            Severity::Blue => FfiSeverity::Blue,
            Severity::Gray => FfiSeverity::Gray,
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiApplicationStatus {
    Pending = 0,
    Reviewed = 1,
    Accepted = 2,
    Rejected = 3,
}

impl From<ApplicationStatus> for FfiApplicationStatus {
    fn from(s: ApplicationStatus) -> Self {
        match s {
            ApplicationStatus::Pending => FfiApplicationStatus::Pending,
            ApplicationStatus::Reviewed => FfiApplicationStatus::Reviewed,
            ApplicationStatus::Accepted => FfiApplicationStatus::Accepted,
            ApplicationStatus::Rejected => FfiApplicationStatus::Rejected,
        }
    }
}

#[repr(C)]
pub struct FfiLogin {
    pub token: *mut c_char,
    pub name: *mut c_char,
    pub email: *mut c_char,
    pub account_type: FfiAccountType,
}

/// One ranked match, flattened for display.
///
/// `target_id` is the posting id (resume-side matching) or the resume id
/// (posting-side matching). `subtitle` is the company name or the resume
/// owner's name respectively.
#[repr(C)]
pub struct FfiRankedMatch {
    pub rank: u32,
    pub percentage: u32,
    pub bucket: FfiMatchBucket,
    pub severity: FfiSeverity,
    pub label: *mut c_char,
    pub score: f64,
    pub target_id: i64,
    pub title: *mut c_char,
    pub subtitle: *mut c_char,
}

#[repr(C)]
pub struct FfiRankedList {
    pub items: *mut FfiRankedMatch,
    pub len: u32,
}

#[repr(C)]
pub struct FfiCount {
    pub count: u64,
}

#[repr(C)]
pub struct FfiStringList {
    pub items: *mut *mut c_char,
    pub len: u32,
}

/// An applicant on one of the company's postings. `applied_at` is the raw
/// wire timestamp.
#[repr(C)]
pub struct FfiApplicationRecord {
    pub id: i64,
    pub job_posting_id: i64,
    pub applicant_id: i64,
    pub applicant_name: *mut c_char,
    pub applicant_email: *mut c_char,
    pub applied_at: *mut c_char,
    pub status: FfiApplicationStatus,
}

#[repr(C)]
pub struct FfiApplicationList {
    pub items: *mut FfiApplicationRecord,
    pub len: u32,
}

/// The display fields the binding needs from either match direction.
pub(crate) trait MatchTarget {
    fn target_id(&self) -> i64;
    fn into_title_and_subtitle(self) -> (String, String);
}

impl MatchTarget for JobPostingMatch {
    fn target_id(&self) -> i64 {
        self.job_posting_id
    }

    fn into_title_and_subtitle(self) -> (String, String) {
        (self.title, self.company_name)
    }
}

impl MatchTarget for ResumeMatch {
    fn target_id(&self) -> i64 {
        self.resume_id
    }

    fn into_title_and_subtitle(self) -> (String, String) {
        (self.title, self.owner_name)
    }
}

/// Result envelope for every parse operation.
///
/// On success `error_code` is `Ok`, `error_message` is null and `data` is
/// tagged by `data_tag`. On failure `data` is null and `error_message`
/// holds the text to show the user.
#[repr(C)]
pub struct FfiResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub data_tag: FfiDataTag,
    pub data: *mut c_void,
}

impl FfiResult {
    fn ok(data_tag: FfiDataTag, data: *mut c_void) -> *mut Self {
        Box::into_raw(Box::new(FfiResult {
            error_code: FfiErrorCode::Ok,
            error_message: std::ptr::null_mut(),
            data_tag,
            data,
        }))
    }

    fn failure(error_code: FfiErrorCode, message: String) -> *mut Self {
        Box::into_raw(Box::new(FfiResult {
            error_code,
            error_message: to_c_string(message),
            data_tag: FfiDataTag::None,
            data: std::ptr::null_mut(),
        }))
    }

    pub(crate) fn ok_login(login: LoginResponse) -> *mut Self {
        let data = Box::new(FfiLogin {
            token: to_c_string(login.token),
            name: to_c_string(login.name),
            email: to_c_string(login.email),
            account_type: login.user_type.into(),
        });
        Self::ok(FfiDataTag::Login, Box::into_raw(data).cast())
    }

    pub(crate) fn ok_ranked<T: MatchTarget + Scored>(ranked: Vec<RankedRecord<T>>) -> *mut Self {
        let items: Vec<FfiRankedMatch> = ranked
            .into_iter()
            .map(|entry| {
                let label = entry.label();
                let severity = entry.severity();
                let target_id = entry.record.target_id();
                let score = entry.record.score();
                let (title, subtitle) = entry.record.into_title_and_subtitle();
                FfiRankedMatch {
                    rank: entry.rank as u32,
                    percentage: entry.percentage,
                    bucket: entry.bucket.into(),
                    severity: severity.into(),
                    label: to_c_string(label.to_string()),
                    score,
                    target_id,
                    title: to_c_string(title),
                    subtitle: to_c_string(subtitle),
                }
            })
            .collect();
        let (items, len) = into_raw_parts(items);
        let data = Box::new(FfiRankedList { items, len });
        Self::ok(FfiDataTag::RankedList, Box::into_raw(data).cast())
    }

    pub(crate) fn ok_count(count: u64) -> *mut Self {
        Self::ok(FfiDataTag::Count, Box::into_raw(Box::new(FfiCount { count })).cast())
    }

    pub(crate) fn ok_strings(strings: Vec<String>) -> *mut Self {
        let items: Vec<*mut c_char> = strings.into_iter().map(to_c_string).collect();
        let (items, len) = into_raw_parts(items);
        let data = Box::new(FfiStringList { items, len });
        Self::ok(FfiDataTag::StringList, Box::into_raw(data).cast())
    }

    pub(crate) fn ok_applications(records: Vec<ApplicationRecord>) -> *mut Self {
        let items: Vec<FfiApplicationRecord> = records
            .into_iter()
            .map(|record| FfiApplicationRecord {
                id: record.id,
                job_posting_id: record.job_posting_id,
                applicant_id: record.applicant_id,
                applicant_name: to_c_string(record.applicant_name),
                applicant_email: to_c_string(record.applicant_email),
                applied_at: to_c_string(record.applied_at),
                status: record.status.into(),
            })
            .collect();
        let (items, len) = into_raw_parts(items);
        let data = Box::new(FfiApplicationList { items, len });
        Self::ok(FfiDataTag::ApplicationList, Box::into_raw(data).cast())
    }

    pub(crate) fn from_error(err: ApiError) -> *mut Self {
        Self::failure(FfiErrorCode::from(&err), err.message())
    }

    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::failure(FfiErrorCode::NullArg, format!("null argument: {name}"))
    }

    pub(crate) fn panic(context: &str) -> *mut Self {
        Self::failure(FfiErrorCode::Panic, format!("panic in {context}"))
    }

    /// # Safety
    /// `result` must come from one of the constructors above and not be
    /// freed yet.
    pub(crate) unsafe fn free(result: *mut Self) {
        let result = unsafe { Box::from_raw(result) };
        unsafe { free_c_string(result.error_message) };
        if result.data.is_null() {
            return;
        }
        match result.data_tag {
            FfiDataTag::Login => {
                let login = unsafe { Box::from_raw(result.data.cast::<FfiLogin>()) };
                unsafe {
                    free_c_string(login.token);
                    free_c_string(login.name);
                    free_c_string(login.email);
                }
            }
            FfiDataTag::RankedList => {
                let list = unsafe { Box::from_raw(result.data.cast::<FfiRankedList>()) };
                for item in unsafe { from_raw_parts(list.items, list.len) } {
                    unsafe {
                        free_c_string(item.label);
                        free_c_string(item.title);
                        free_c_string(item.subtitle);
                    }
                }
            }
            FfiDataTag::StringList => {
                let list = unsafe { Box::from_raw(result.data.cast::<FfiStringList>()) };
                for item in unsafe { from_raw_parts(list.items, list.len) } {
                    unsafe { free_c_string(item) };
                }
            }
            FfiDataTag::ApplicationList => {
                let list = unsafe { Box::from_raw(result.data.cast::<FfiApplicationList>()) };
                for item in unsafe { from_raw_parts(list.items, list.len) } {
                    unsafe {
                        free_c_string(item.applicant_name);
                        free_c_string(item.applicant_email);
                        free_c_string(item.applied_at);
                    }
                }
            }
            FfiDataTag::Count => drop(unsafe { Box::from_raw(result.data.cast::<FfiCount>()) }),
            FfiDataTag::None => {}
        }
    }
}
