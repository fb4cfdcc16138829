use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::PublicProfile;

// -- Auth --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user_id: Uuid,
    pub username: String,
}

// -- Posts --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreatePostRequest {
    pub title: String,
    pub body: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PostPatch {
    pub title: Option<String>,
    pub body: Option<String>,
}

/// A post decorated for presentation: author profile plus the full comment
/// thread, each comment decorated with its own author profile. This is the
/// one shape every read path returns.
#[derive(Debug, Clone, Serialize)]
pub struct PostView {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub author: PublicProfile,
    pub comments: Vec<CommentView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentView {
    pub id: Uuid,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub author: PublicProfile,
}

// -- Comments --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateCommentRequest {
    pub post_id: Uuid,
    pub body: String,
}

// -- Users --

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserPatch {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// A user's public page: profile, their posts, and their comments with the
/// title of the post each comment landed on.
#[derive(Debug, Clone, Serialize)]
pub struct UserProfileView {
    pub profile: PublicProfile,
    pub posts: Vec<PostSummary>,
    pub comments: Vec<CommentOnPost>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostSummary {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentOnPost {
    pub id: Uuid,
    pub body: String,
    pub post_id: Uuid,
    pub post_title: String,
    pub created_at: DateTime<Utc>,
}

// -- Errors --

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PublicProfile, User};

    fn profile() -> PublicProfile {
        PublicProfile {
            id: Uuid::new_v4(),
            username: "alice".into(),
        }
    }

    /// Every outward-facing shape is a deliberate projection. Scan the
    /// serialized JSON of each one for credential fields.
    #[test]
    fn no_serialized_shape_leaks_credentials() {
        let view = PostView {
            id: Uuid::new_v4(),
            title: "t".into(),
            body: "b".into(),
            created_at: Utc::now(),
            author: profile(),
            comments: vec![CommentView {
                id: Uuid::new_v4(),
                body: "c".into(),
                created_at: Utc::now(),
                author: profile(),
            }],
        };
        let user_page = UserProfileView {
            profile: profile(),
            posts: vec![],
            comments: vec![],
        };
        let user = User {
            id: Uuid::new_v4(),
            username: "alice".into(),
            email: "a@x.com".into(),
            created_at: Utc::now(),
        };
        let login = LoginResponse {
            user_id: Uuid::new_v4(),
            username: "alice".into(),
        };

        let outputs = [
            serde_json::to_string(&view).unwrap(),
            serde_json::to_string(&user_page).unwrap(),
            serde_json::to_string(&user).unwrap(),
            serde_json::to_string(&login).unwrap(),
        ];
        for json in &outputs {
            assert!(!json.contains("password"), "leaked in {json}");
            assert!(!json.contains("hash"), "leaked in {json}");
        }
    }

    #[test]
    fn request_shapes_reject_unknown_fields() {
        let err = serde_json::from_str::<RegisterRequest>(
            r#"{"username":"a","email":"a@x.com","password":"pw","admin":true}"#,
        );
        assert!(err.is_err());
    }
}
