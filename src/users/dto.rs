use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo::{ProfileCounts, User};

/// Public profile shape returned to clients. The email is only present when
/// a user looks at their own profile.
#[derive(Debug, Serialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub about_me: Option<String>,
    pub avatar: String,
    pub last_seen: OffsetDateTime,
    pub post_count: i64,
    pub follower_count: i64,
    pub following_count: i64,
}

impl UserProfile {
    pub fn new(user: User, counts: ProfileCounts, include_email: bool) -> Self {
        let avatar = user.avatar(128);
        Self {
            id: user.id,
            username: user.username,
            email: include_email.then_some(user.email),
            about_me: user.about_me,
            avatar,
            last_seen: user.last_seen,
            post_count: counts.post_count,
            follower_count: counts.follower_count,
            following_count: counts.following_count,
        }
    }
}

/// Compact user shape used in search results and post authors.
#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub username: String,
    pub avatar: String,
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        let avatar = user.avatar(48);
        Self {
            id: user.id,
            username: user.username,
            avatar,
        }
    }
}

/// Request body for profile edits.
#[derive(Debug, Deserialize)]
pub struct EditProfileRequest {
    pub username: String,
    pub about_me: Option<String>,
}

/// Response to a follow or unfollow action.
#[derive(Debug, Serialize)]
pub struct FollowResponse {
    pub following: bool,
    pub follower_count: i64,
}

/// Combined search result: matching users and matching posts.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub users: Vec<UserSummary>,
    pub posts: Vec<crate::posts::dto::PostView>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            username: "alice".into(),
            email: "alice@example.com".into(),
            password_hash: "hash".into(),
            about_me: Some("hello".into()),
            last_seen: OffsetDateTime::now_utc(),
            created_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn profile_hides_email_for_other_callers() {
        let counts = ProfileCounts {
            post_count: 1,
            follower_count: 2,
            following_count: 3,
        };
        let profile = UserProfile::new(sample_user(), counts, false);
        let json = serde_json::to_value(&profile).unwrap();
        assert!(json.get("email").is_none());
        assert_eq!(json["follower_count"], 2);
    }

    #[test]
    fn profile_includes_email_for_self() {
        let counts = ProfileCounts {
            post_count: 0,
            follower_count: 0,
            following_count: 0,
        };
        let profile = UserProfile::new(sample_user(), counts, true);
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["email"], "alice@example.com");
        assert!(json["avatar"]
            .as_str()
            .unwrap()
            .starts_with("https://www.gravatar.com/avatar/"));
    }
}
