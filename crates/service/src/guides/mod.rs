//! Guides: authored articles with publication visibility, paging, search and cover images.

pub mod domain;
pub mod repository;
pub mod repo;
pub mod service;

pub use service::GuideService;
