//! Auth module: three-layer architecture (domain, repository, service).
//!
//! Registration, e-mail activation, login with bearer tokens and password change.

pub mod domain;
pub mod errors;
pub mod password;
pub mod token;
pub mod repository;
pub mod service;
pub mod repo;

pub use service::{AuthConfig, AuthService};
