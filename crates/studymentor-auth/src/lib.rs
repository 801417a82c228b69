//! Google credential handling for StudyMentor.
//!
//! Reads the authorized-user credential file written by an external consent
//! flow and refreshes an expired access token once at startup.

pub mod google;
pub mod storage;

pub use google::{GoogleTokenRefresher, GoogleTokenResponse, CALENDAR_SCOPE, GOOGLE_TOKEN_URL};
pub use storage::AuthorizedUserCredential;
