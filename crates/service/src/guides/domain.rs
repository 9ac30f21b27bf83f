use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::errors::ServiceError;
use crate::users::domain::UserProfile;
use models::guide;

/// Guide body as sent by clients on create and update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuideInput {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub published: bool,
}

impl GuideInput {
    /// Validated copy: trimmed title, non-empty content, blank note dropped.
    pub fn prepared(&self) -> Result<GuideInput, ServiceError> {
        let title = guide::validate_title(&self.title)?;
        guide::validate_content(&self.content)?;
        Ok(GuideInput {
            title,
            content: self.content.clone(),
            note: guide::normalize_note(self.note.as_deref()),
            published: self.published,
        })
    }
}

/// Stored guide row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GuideRecord {
    pub guide_id: i32,
    pub title: String,
    pub content: String,
    pub note: Option<String>,
    pub published: bool,
    pub last_modified: DateTime<FixedOffset>,
    pub cover_image: Option<String>,
    pub user_id: i32,
}

impl From<guide::Model> for GuideRecord {
    fn from(g: guide::Model) -> Self {
        Self {
            guide_id: g.id,
            title: g.title,
            content: g.content,
            note: g.note,
            published: g.published,
            last_modified: g.last_modified,
            cover_image: g.cover_image,
            user_id: g.user_id,
        }
    }
}

impl GuideRecord {
    /// Published guides are public; drafts only reach their author.
    pub fn is_visible_to(&self, viewer_id: i32) -> bool {
        self.published || self.user_id == viewer_id
    }
}

/// Full guide with its author.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GuideDetail {
    pub guide_id: i32,
    pub title: String,
    pub content: String,
    pub note: Option<String>,
    pub published: bool,
    pub last_modified: DateTime<FixedOffset>,
    pub cover_image: Option<String>,
    pub user: UserProfile,
}

impl GuideDetail {
    pub fn new(record: GuideRecord, user: UserProfile) -> Self {
        Self {
            guide_id: record.guide_id,
            title: record.title,
            content: record.content,
            note: record.note,
            published: record.published,
            last_modified: record.last_modified,
            cover_image: record.cover_image,
            user,
        }
    }
}

/// List item: guide header plus author card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GuideSummary {
    pub guide_id: i32,
    pub title: String,
    pub last_modified: DateTime<FixedOffset>,
    pub published: bool,
    pub cover_image: Option<String>,
    pub avatar: Option<String>,
    pub profession: Option<String>,
    pub user: UserProfile,
}

/// Author data shown next to every listed guide.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthorCard {
    pub user: UserProfile,
    pub avatar: Option<String>,
    pub profession: Option<String>,
}

impl GuideSummary {
    pub fn new(record: GuideRecord, author: AuthorCard) -> Self {
        Self {
            guide_id: record.guide_id,
            title: record.title,
            last_modified: record.last_modified,
            published: record.published,
            cover_image: record.cover_image,
            avatar: author.avatar,
            profession: author.profession,
            user: author.user,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GuidePage {
    pub pages: u64,
    pub guides: Vec<GuideSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverImage {
    pub cover_image: String,
}

/// Ordering by `last_modified`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

/// Filter shared by the counting and listing queries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuideQuery {
    pub published_only: bool,
    pub owner_id: Option<i32>,
    pub title: Option<String>,
    pub order: SortOrder,
}

impl GuideQuery {
    pub fn matches(&self, record: &GuideRecord) -> bool {
        (!self.published_only || record.published)
            && self.owner_id.map_or(true, |id| record.user_id == id)
            && self.title.as_deref().map_or(true, |t| record.title.to_lowercase().contains(&t.to_lowercase()))
    }
}

/// Lower-cased `%…%` LIKE pattern with `\`, `%` and `_` escaped so they match literally.
pub fn like_pattern(search: &str) -> String {
    let mut out = String::with_capacity(search.len() + 2);
    out.push('%');
    for c in search.to_lowercase().chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('%');
    out
}
