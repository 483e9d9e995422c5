//! `marksync-api` — blocking LMS REST client.
//!
//! Covers the three wire concerns of a sync run: following `Link`-header
//! pagination to fetch a whole collection, posting grades one submission
//! at a time, and storing the bearer credentials both flows need.
//! No Tokio runtime required.

pub mod auth;
pub mod client;
pub mod error;
pub mod grade;
pub mod link;
pub mod progress;

pub use auth::{auth_file_path, delete_auth, load_auth, normalize_domain, save_auth, Credentials};
pub use client::{LmsClient, UserInfo};
pub use error::LmsError;
pub use grade::{GradeParseError, GradeValue, GradeWriteOutcome};
pub use link::{next_link, parse_link_header};
pub use progress::{Progress, ProgressTicker};
