use std::collections::HashMap;

use uuid::Uuid;

use quill_db::Database;
use quill_db::models::{CommentRow, PostRow};
use quill_types::api::{CommentOnPost, CommentView, PostSummary, PostView, UserProfileView};
use quill_types::models::PublicProfile;

use crate::convert::{parse_timestamp, parse_uuid};
use crate::error::{CoreError, CoreResult};

#[derive(Debug, Default, Clone, Copy)]
pub struct PostFilter {
    pub owner: Option<Uuid>,
}

impl PostFilter {
    pub fn owned_by(user_id: Uuid) -> Self {
        Self {
            owner: Some(user_id),
        }
    }
}

/// Posts newest-first, each decorated with its author profile and full
/// comment thread (comments in insertion order, each with its author).
pub fn list_posts(db: &Database, filter: PostFilter) -> CoreResult<Vec<PostView>> {
    let owner = filter.owner.map(|id| id.to_string());
    let rows = db.list_posts(owner.as_deref())?;
    decorate(db, rows)
}

pub fn get_post(db: &Database, post_id: Uuid) -> CoreResult<PostView> {
    let row = db
        .get_post(&post_id.to_string())?
        .ok_or(CoreError::NotFound)?;
    let mut views = decorate(db, vec![row])?;
    Ok(views.remove(0))
}

/// A user's public page: profile, their posts, and their comments tagged
/// with the title of the post each landed on.
pub fn user_profile(db: &Database, user_id: Uuid) -> CoreResult<UserProfileView> {
    let row = db
        .get_user_by_id(&user_id.to_string())?
        .ok_or(CoreError::NotFound)?;
    let profile = PublicProfile {
        id: parse_uuid(&row.id),
        username: row.username,
    };

    let posts = db
        .list_posts(Some(&user_id.to_string()))?
        .into_iter()
        .map(|p| PostSummary {
            id: parse_uuid(&p.id),
            title: p.title,
            body: p.body,
            created_at: parse_timestamp(&p.created_at),
        })
        .collect();

    let comments = db
        .get_comments_by_user(&user_id.to_string())?
        .into_iter()
        .map(|c| CommentOnPost {
            id: parse_uuid(&c.id),
            body: c.body,
            post_id: parse_uuid(&c.post_id),
            post_title: c.post_title,
            created_at: parse_timestamp(&c.created_at),
        })
        .collect();

    Ok(UserProfileView {
        profile,
        posts,
        comments,
    })
}

/// The one decoration pipeline behind every post read: batch-fetch the
/// comment threads for the page of posts, group them by post id, and
/// assemble the views. No per-post follow-up queries.
fn decorate(db: &Database, rows: Vec<PostRow>) -> CoreResult<Vec<PostView>> {
    let post_ids: Vec<String> = rows.iter().map(|r| r.id.clone()).collect();
    let comment_rows = db.get_comments_for_posts(&post_ids)?;

    let mut threads: HashMap<String, Vec<CommentView>> = HashMap::new();
    for row in comment_rows {
        threads
            .entry(row.post_id.clone())
            .or_default()
            .push(comment_view(row));
    }

    Ok(rows
        .into_iter()
        .map(|row| {
            let comments = threads.remove(&row.id).unwrap_or_default();
            PostView {
                id: parse_uuid(&row.id),
                title: row.title,
                body: row.body,
                created_at: parse_timestamp(&row.created_at),
                author: PublicProfile {
                    id: parse_uuid(&row.user_id),
                    username: row.author_username,
                },
                comments,
            }
        })
        .collect())
}

fn comment_view(row: CommentRow) -> CommentView {
    CommentView {
        id: parse_uuid(&row.id),
        body: row.body,
        created_at: parse_timestamp(&row.created_at),
        author: PublicProfile {
            id: parse_uuid(&row.user_id),
            username: row.author_username,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials;
    use crate::mutations;
    use crate::session::AuthorizedContext;
    use quill_types::api::{CreateCommentRequest, CreatePostRequest};

    fn ctx(user: &quill_types::models::User) -> AuthorizedContext {
        AuthorizedContext {
            user_id: user.id,
            username: user.username.clone(),
        }
    }

    #[test]
    fn single_post_with_comment_decorated_with_authors() {
        let db = Database::open_in_memory().unwrap();
        let alice = credentials::register(&db, "alice", "a@x.com", "pw1234").unwrap();

        let post = mutations::create_post(
            &db,
            &ctx(&alice),
            CreatePostRequest {
                title: "hello".into(),
                body: "first".into(),
            },
        )
        .unwrap();
        mutations::create_comment(
            &db,
            &ctx(&alice),
            CreateCommentRequest {
                post_id: post.id,
                body: "nice".into(),
            },
        )
        .unwrap();

        let posts = list_posts(&db, PostFilter::default()).unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].comments.len(), 1);
        assert_eq!(posts[0].comments[0].author.username, "alice");
        assert_eq!(posts[0].author.username, "alice");
    }

    #[test]
    fn owner_filter_scopes_the_listing() {
        let db = Database::open_in_memory().unwrap();
        let alice = credentials::register(&db, "alice", "a@x.com", "pw1234").unwrap();
        let bob = credentials::register(&db, "bob", "b@x.com", "pw1234").unwrap();

        for (user, title) in [(&alice, "a post"), (&bob, "b post")] {
            mutations::create_post(
                &db,
                &ctx(user),
                CreatePostRequest {
                    title: title.into(),
                    body: "body".into(),
                },
            )
            .unwrap();
        }

        let all = list_posts(&db, PostFilter::default()).unwrap();
        assert_eq!(all.len(), 2);

        let mine = list_posts(&db, PostFilter::owned_by(alice.id)).unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].title, "a post");
    }

    #[test]
    fn missing_post_is_not_found() {
        let db = Database::open_in_memory().unwrap();
        assert!(matches!(
            get_post(&db, Uuid::new_v4()),
            Err(CoreError::NotFound)
        ));
    }

    #[test]
    fn user_profile_comments_carry_post_titles() {
        let db = Database::open_in_memory().unwrap();
        let alice = credentials::register(&db, "alice", "a@x.com", "pw1234").unwrap();
        let bob = credentials::register(&db, "bob", "b@x.com", "pw1234").unwrap();

        let post = mutations::create_post(
            &db,
            &ctx(&alice),
            CreatePostRequest {
                title: "alice writes".into(),
                body: "body".into(),
            },
        )
        .unwrap();
        mutations::create_comment(
            &db,
            &ctx(&bob),
            CreateCommentRequest {
                post_id: post.id,
                body: "bob replies".into(),
            },
        )
        .unwrap();

        let page = user_profile(&db, bob.id).unwrap();
        assert_eq!(page.profile.username, "bob");
        assert!(page.posts.is_empty());
        assert_eq!(page.comments.len(), 1);
        assert_eq!(page.comments[0].post_title, "alice writes");

        assert!(matches!(
            user_profile(&db, Uuid::new_v4()),
            Err(CoreError::NotFound)
        ));
    }
}
