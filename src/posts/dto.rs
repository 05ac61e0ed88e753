use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo::PostRow;
use crate::users::repo::avatar_url;

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub body: String,
}

#[derive(Debug, Serialize)]
pub struct PostAuthor {
    pub id: Uuid,
    pub username: String,
    pub avatar: String,
}

/// Post shape returned to clients, with like state resolved for the caller.
#[derive(Debug, Serialize)]
pub struct PostView {
    pub id: Uuid,
    pub body: String,
    pub created_at: OffsetDateTime,
    pub author: PostAuthor,
    pub like_count: i64,
    pub liked_by_caller: bool,
}

impl From<PostRow> for PostView {
    fn from(row: PostRow) -> Self {
        Self {
            id: row.id,
            body: row.body,
            created_at: row.created_at,
            author: PostAuthor {
                id: row.author_id,
                username: row.author_username,
                avatar: avatar_url(&row.author_email, 48),
            },
            like_count: row.like_count,
            liked_by_caller: row.liked_by_caller,
        }
    }
}

/// Response to a like or unlike action.
#[derive(Debug, Serialize)]
pub struct LikeResponse {
    pub liked: bool,
    pub like_count: i64,
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    20
}

impl Pagination {
    /// Bounded result sets: limit in 1..=100, offset non-negative.
    pub fn clamp(&self) -> (i64, i64) {
        (self.limit.clamp(1, 100), self.offset.max(0))
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            offset: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_clamps_to_bounds() {
        let p = Pagination {
            limit: 1000,
            offset: -5,
        };
        assert_eq!(p.clamp(), (100, 0));

        let p = Pagination {
            limit: 0,
            offset: 40,
        };
        assert_eq!(p.clamp(), (1, 40));

        assert_eq!(Pagination::default().clamp(), (20, 0));
    }

    #[test]
    fn post_view_carries_author_and_like_state() {
        let row = PostRow {
            id: Uuid::new_v4(),
            body: "hello".into(),
            created_at: OffsetDateTime::now_utc(),
            author_id: Uuid::new_v4(),
            author_username: "alice".into(),
            author_email: "alice@example.com".into(),
            like_count: 3,
            liked_by_caller: true,
        };
        let view = PostView::from(row);
        assert_eq!(view.author.username, "alice");
        assert_eq!(view.like_count, 3);
        assert!(view.liked_by_caller);

        let json = serde_json::to_value(&view).unwrap();
        // The raw author email never leaks, only the derived avatar.
        assert!(json["author"].get("email").is_none());
        assert!(json["author"]["avatar"]
            .as_str()
            .unwrap()
            .contains("gravatar"));
    }
}
