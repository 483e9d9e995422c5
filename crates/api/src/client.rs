//! LMS HTTP client.
//!
//! Blocking reqwest client (no Tokio runtime required). Two wire flows:
//!
//! - `fetch_all` — cursor pagination: GET, append the page, follow the
//!   `Link` header's `rel="next"` URL until the chain ends. A non-2xx
//!   anywhere fails the whole fetch; a partial collection is never
//!   returned. No retry, no backoff: runs are manual and user-triggered.
//! - `submit_grade` / `submit_grades` — one PUT per (student,
//!   assignment), addressed by SIS id. Submission failures are outcomes,
//!   not errors: one student must never block the rest of a batch.

use std::thread;
use std::time::Duration;

use crate::auth::{load_auth, normalize_domain, Credentials};
use crate::error::{body_excerpt, LmsError};
use crate::grade::{GradeValue, GradeWriteOutcome};
use crate::link::next_link;
use crate::progress::{Progress, ProgressTicker};

// ── Constants ───────────────────────────────────────────────────────

pub(crate) const USER_AGENT: &str = concat!("marksync/", env!("CARGO_PKG_VERSION"));

/// Records requested per page.
const PER_PAGE: u32 = 100;

/// Defensive cap on the pagination chain. The server is trusted to
/// terminate it; this bounds the damage when it doesn't.
const MAX_PAGES: usize = 10_000;

// ── Client ──────────────────────────────────────────────────────────

/// LMS API client (blocking).
#[derive(Clone)]
pub struct LmsClient {
    http: reqwest::blocking::Client,
    api_base: String,
    token: String,
}

/// Token owner info from /api/v1/users/self.
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
pub struct UserInfo {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub primary_email: Option<String>,
}

impl LmsClient {
    /// Create a client using saved credentials.
    pub fn from_saved_auth() -> Result<Self, LmsError> {
        let creds = load_auth().ok_or(LmsError::NotAuthenticated)?;
        Ok(Self::from_credentials(&creds))
    }

    pub fn from_credentials(creds: &Credentials) -> Self {
        Self::new(&creds.domain, creds.token.clone())
    }

    /// Create a client with an explicit domain and token.
    pub fn new(domain: &str, token: String) -> Self {
        let http = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .expect("failed to build HTTP client");

        Self {
            http,
            api_base: normalize_domain(domain),
            token,
        }
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    // ── Endpoint builders ───────────────────────────────────────────

    fn endpoint(&self, path: &str, params: &[(&str, &str)]) -> Result<String, LmsError> {
        let mut url = url::Url::parse(&self.api_base)
            .and_then(|u| u.join(path))
            .map_err(|e| LmsError::InvalidUrl(format!("{}: {e}", self.api_base)))?;
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
        }
        Ok(url.into())
    }

    /// Students enrolled in a course, with SIS ids.
    pub fn course_users_url(&self, course_id: &str) -> Result<String, LmsError> {
        self.endpoint(
            &format!("/api/v1/courses/{course_id}/users"),
            &[
                ("enrollment_type[]", "student"),
                ("per_page", &PER_PAGE.to_string()),
            ],
        )
    }

    /// All assignments in a course.
    pub fn course_assignments_url(&self, course_id: &str) -> Result<String, LmsError> {
        self.endpoint(
            &format!("/api/v1/courses/{course_id}/assignments"),
            &[("per_page", &PER_PAGE.to_string())],
        )
    }

    /// Submissions for one assignment, with the submitting user embedded
    /// (the user record carries the SIS id used for reconciliation).
    pub fn assignment_submissions_url(
        &self,
        course_id: &str,
        assignment_id: &str,
    ) -> Result<String, LmsError> {
        self.endpoint(
            &format!("/api/v1/courses/{course_id}/assignments/{assignment_id}/submissions"),
            &[("include[]", "user"), ("per_page", &PER_PAGE.to_string())],
        )
    }

    /// Bulk submissions-by-student for one assignment (gradebook pull).
    pub fn student_submissions_url(
        &self,
        course_id: &str,
        assignment_id: &str,
    ) -> Result<String, LmsError> {
        self.endpoint(
            &format!("/api/v1/courses/{course_id}/students/submissions"),
            &[
                ("student_ids[]", "all"),
                ("assignment_ids[]", assignment_id),
                ("include[]", "user"),
                ("per_page", &PER_PAGE.to_string()),
            ],
        )
    }

    // ── Token verification ──────────────────────────────────────────

    /// Verify the token and return its owner.
    pub fn verify_token(&self) -> Result<UserInfo, LmsError> {
        let url = self.endpoint("/api/v1/users/self", &[])?;
        let resp = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .map_err(|e| LmsError::Network(e.to_string()))?;

        let status = resp.status().as_u16();
        let body = resp.text().map_err(|e| LmsError::Network(e.to_string()))?;
        if !(200..300).contains(&status) {
            return Err(LmsError::Http {
                status,
                body: body_excerpt(&body),
            });
        }
        serde_json::from_str(&body).map_err(|e| LmsError::Parse(e.to_string()))
    }

    // ── Cursor pagination ───────────────────────────────────────────

    /// Fetch an entire paginated collection starting from `seed_url`.
    ///
    /// Each page body must be a JSON array; an empty array is a valid
    /// page. The next cursor comes solely from the response's `Link`
    /// header; the client never constructs page URLs beyond the seed.
    /// `progress` is invoked once per page.
    pub fn fetch_all(
        &self,
        seed_url: &str,
        progress: &mut dyn FnMut(Progress<'_>),
    ) -> Result<Vec<serde_json::Value>, LmsError> {
        let mut records: Vec<serde_json::Value> = Vec::new();
        let mut cursor = Some(seed_url.to_string());
        let mut pages = 0usize;

        while let Some(url) = cursor {
            pages += 1;
            if pages > MAX_PAGES {
                return Err(LmsError::PaginationStuck(format!(
                    "page cap of {MAX_PAGES} exceeded"
                )));
            }

            let resp = self
                .http
                .get(&url)
                .bearer_auth(&self.token)
                .send()
                .map_err(|e| LmsError::Network(e.to_string()))?;

            let status = resp.status().as_u16();
            // Capture the cursor before the body consumes the response.
            let link_header = resp
                .headers()
                .get(reqwest::header::LINK)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let body = resp.text().map_err(|e| LmsError::Network(e.to_string()))?;

            if !(200..300).contains(&status) {
                return Err(LmsError::Http {
                    status,
                    body: body_excerpt(&body),
                });
            }

            let page: Vec<serde_json::Value> = serde_json::from_str(&body).map_err(|e| {
                LmsError::Parse(format!("page {pages} is not a JSON array: {e}"))
            })?;

            let detail = format!("page {pages}: {} records", page.len());
            records.extend(page);
            progress(Progress {
                current: pages,
                total: None,
                detail: &detail,
            });

            let next = link_header.as_deref().and_then(next_link);
            if next.as_deref() == Some(url.as_str()) {
                return Err(LmsError::PaginationStuck(format!(
                    "server repeated next link {url}"
                )));
            }
            cursor = next;
        }

        Ok(records)
    }

    // ── Grade submission ────────────────────────────────────────────

    /// Post one grade. Never returns Err across this boundary: every
    /// failure becomes a `success: false` outcome with a reason.
    pub fn submit_grade(
        &self,
        course_id: &str,
        assignment_id: &str,
        student_key: &str,
        grade: &GradeValue,
    ) -> GradeWriteOutcome {
        let outcome = |success: bool, message: String| GradeWriteOutcome {
            student_key: student_key.to_string(),
            success,
            message,
        };

        let url = match self.endpoint(
            &format!(
                "/api/v1/courses/{course_id}/assignments/{assignment_id}/submissions/sis_user_id:{student_key}"
            ),
            &[],
        ) {
            Ok(url) => url,
            Err(e) => return outcome(false, e.to_string()),
        };

        let body = serde_json::json!({
            "submission": { "posted_grade": grade.as_posted_grade() }
        });

        let resp = match self
            .http
            .put(&url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
        {
            Ok(resp) => resp,
            Err(e) => return outcome(false, format!("network error: {e}")),
        };

        let status = resp.status().as_u16();
        let text = resp.text().unwrap_or_default();

        match status {
            200..=299 => outcome(true, "posted".into()),
            401 | 403 => outcome(
                false,
                format!("permission denied (HTTP {status}): check the API token's access to this course"),
            ),
            404 => outcome(
                false,
                "student/assignment pairing not found on the LMS (HTTP 404)".into(),
            ),
            400 => outcome(false, validation_reason(&text)),
            409 => outcome(
                false,
                "conflict: the submission changed concurrently (HTTP 409)".into(),
            ),
            _ => outcome(false, format!("HTTP {status}: {}", body_excerpt(&text))),
        }
    }

    /// Submit a batch sequentially, one outcome per item. `pause` is a
    /// rate-limit courtesy between calls (pass `Duration::ZERO` to
    /// disable). Progress fires at 5% checkpoints and at completion.
    pub fn submit_grades(
        &self,
        course_id: &str,
        assignment_id: &str,
        grades: &[(String, GradeValue)],
        pause: Duration,
        progress: &mut dyn FnMut(Progress<'_>),
    ) -> Vec<GradeWriteOutcome> {
        let total = grades.len();
        let mut ticker = ProgressTicker::new(total);
        let mut outcomes = Vec::with_capacity(total);

        for (i, (student_key, grade)) in grades.iter().enumerate() {
            if i > 0 && !pause.is_zero() {
                thread::sleep(pause);
            }
            outcomes.push(self.submit_grade(course_id, assignment_id, student_key, grade));

            let done = i + 1;
            if ticker.should_emit(done) {
                let detail = format!("{done}/{total} submissions");
                progress(Progress {
                    current: done,
                    total: Some(total),
                    detail: &detail,
                });
            }
        }

        outcomes
    }
}

/// Failure reason for a 400: join the server's structured error
/// descriptors when the body carries them, else fall back to an excerpt.
fn validation_reason(body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(errors) = json.get("errors").and_then(|v| v.as_array()) {
            let joined: Vec<&str> = errors
                .iter()
                .filter_map(|e| e.get("message").and_then(|m| m.as_str()))
                .collect();
            if !joined.is_empty() {
                return format!("rejected: {}", joined.join("; "));
            }
        }
    }
    format!("rejected (HTTP 400): {}", body_excerpt(body))
}

// ── Tests ───────────────────────────────────────────────────────────
