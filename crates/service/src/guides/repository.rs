use async_trait::async_trait;

use super::domain::{GuideInput, GuideQuery, GuideRecord, GuideSummary};
use crate::errors::ServiceError;
use crate::users::domain::UserProfile;

/// Persistence seam for guides.
#[async_trait]
pub trait GuideRepository: Send + Sync {
    /// Rows matching `query`, ignoring paging.
    async fn count(&self, query: &GuideQuery) -> Result<u64, ServiceError>;
    async fn list(&self, query: &GuideQuery, offset: u64, limit: u64) -> Result<Vec<GuideSummary>, ServiceError>;
    async fn get(&self, guide_id: i32) -> Result<Option<GuideRecord>, ServiceError>;
    async fn author(&self, user_id: i32) -> Result<Option<UserProfile>, ServiceError>;
    async fn insert(&self, user_id: i32, input: &GuideInput) -> Result<GuideRecord, ServiceError>;
    /// Overwrite the editable fields and refresh `last_modified`.
    async fn update(&self, guide_id: i32, input: &GuideInput) -> Result<GuideRecord, ServiceError>;
    async fn set_cover_image(&self, guide_id: i32, path: Option<String>) -> Result<GuideRecord, ServiceError>;
    async fn delete(&self, guide_id: i32) -> Result<bool, ServiceError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use crate::guides::domain::{AuthorCard, SortOrder};
    use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};
    use std::collections::{BTreeMap, HashMap};
    use std::sync::Mutex;

    #[derive(Default)]
    struct State {
        guides: BTreeMap<i32, GuideRecord>,
        authors: HashMap<i32, AuthorCard>,
        next_id: i32,
        clock: i64,
    }

    impl State {
        /// Strictly increasing timestamps keep ordering deterministic.
        fn tick(&mut self) -> DateTime<FixedOffset> {
            self.clock += 1;
            let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().unwrap_or_default();
            (base + Duration::seconds(self.clock)).fixed_offset()
        }
    }

    #[derive(Default)]
    pub struct MockGuideRepository {
        state: Mutex<State>,
    }

    impl MockGuideRepository {
        fn lock(&self) -> Result<std::sync::MutexGuard<'_, State>, ServiceError> {
            self.state.lock().map_err(|e| ServiceError::Db(e.to_string()))
        }

        pub fn add_author(&self, author: AuthorCard) -> Result<(), ServiceError> {
            self.lock()?.authors.insert(author.user.user_id, author);
            Ok(())
        }
    }

    #[async_trait]
    impl GuideRepository for MockGuideRepository {
        async fn count(&self, query: &GuideQuery) -> Result<u64, ServiceError> {
            Ok(self.lock()?.guides.values().filter(|g| query.matches(g)).count() as u64)
        }

        async fn list(&self, query: &GuideQuery, offset: u64, limit: u64) -> Result<Vec<GuideSummary>, ServiceError> {
            let state = self.lock()?;
            let mut rows: Vec<&GuideRecord> = state.guides.values().filter(|g| query.matches(g)).collect();
            rows.sort_by_key(|g| (g.last_modified, g.guide_id));
            if query.order == SortOrder::Desc {
                rows.reverse();
            }
            Ok(rows
                .into_iter()
                .skip(offset as usize)
                .take(limit as usize)
                .filter_map(|g| state.authors.get(&g.user_id).map(|a| GuideSummary::new(g.clone(), a.clone())))
                .collect())
        }

        async fn get(&self, guide_id: i32) -> Result<Option<GuideRecord>, ServiceError> {
            Ok(self.lock()?.guides.get(&guide_id).cloned())
        }

        async fn author(&self, user_id: i32) -> Result<Option<UserProfile>, ServiceError> {
            Ok(self.lock()?.authors.get(&user_id).map(|a| a.user.clone()))
        }

        async fn insert(&self, user_id: i32, input: &GuideInput) -> Result<GuideRecord, ServiceError> {
            let mut state = self.lock()?;
            state.next_id += 1;
            let record = GuideRecord {
                guide_id: state.next_id,
                title: input.title.clone(),
                content: input.content.clone(),
                note: input.note.clone(),
                published: input.published,
                last_modified: state.tick(),
                cover_image: None,
                user_id,
            };
            state.guides.insert(record.guide_id, record.clone());
            Ok(record)
        }

        async fn update(&self, guide_id: i32, input: &GuideInput) -> Result<GuideRecord, ServiceError> {
            let mut state = self.lock()?;
            let now = state.tick();
            let record = state.guides.get_mut(&guide_id).ok_or_else(|| ServiceError::not_found("Guide"))?;
            record.title = input.title.clone();
            record.content = input.content.clone();
            record.note = input.note.clone();
            record.published = input.published;
            record.last_modified = now;
            Ok(record.clone())
        }

        async fn set_cover_image(&self, guide_id: i32, path: Option<String>) -> Result<GuideRecord, ServiceError> {
            let mut state = self.lock()?;
            let record = state.guides.get_mut(&guide_id).ok_or_else(|| ServiceError::not_found("Guide"))?;
            record.cover_image = path;
            Ok(record.clone())
        }

        async fn delete(&self, guide_id: i32) -> Result<bool, ServiceError> {
            Ok(self.lock()?.guides.remove(&guide_id).is_some())
        }
    }
}
