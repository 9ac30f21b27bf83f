//! User profile, profile details, profile images and the profession lookup.

pub mod domain;
pub mod service;

pub use domain::{ProfessionView, ProfileImage, UserDetailInput, UserDetailView, UserProfile, UserUpdateInput};
