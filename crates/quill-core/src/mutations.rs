//! Ownership-scoped writes. Owner identity always comes from the
//! `AuthorizedContext` the gate produced, never from the request payload.

use chrono::Utc;
use uuid::Uuid;

use quill_db::Database;
use quill_types::api::{CreateCommentRequest, CreatePostRequest, PostPatch, UserPatch};
use quill_types::models::{Comment, Post, User};

use crate::convert::{parse_timestamp, user_from_row};
use crate::credentials;
use crate::error::{CoreError, CoreResult};
use crate::session::AuthorizedContext;

pub fn create_post(
    db: &Database,
    ctx: &AuthorizedContext,
    req: CreatePostRequest,
) -> CoreResult<Post> {
    let id = Uuid::new_v4();
    db.insert_post(&id.to_string(), &req.title, &req.body, &ctx.user_id.to_string())?;

    Ok(Post {
        id,
        title: req.title,
        body: req.body,
        user_id: ctx.user_id,
        created_at: Utc::now(),
    })
}

pub fn update_post(
    db: &Database,
    ctx: &AuthorizedContext,
    post_id: Uuid,
    patch: PostPatch,
) -> CoreResult<Post> {
    let row = db
        .get_post(&post_id.to_string())?
        .ok_or(CoreError::NotFound)?;
    if row.user_id != ctx.user_id.to_string() {
        return Err(CoreError::Forbidden);
    }

    let title = patch.title.unwrap_or(row.title);
    let body = patch.body.unwrap_or(row.body);
    db.update_post(&post_id.to_string(), &title, &body)?;

    Ok(Post {
        id: post_id,
        title,
        body,
        user_id: ctx.user_id,
        created_at: parse_timestamp(&row.created_at),
    })
}

pub fn delete_post(db: &Database, ctx: &AuthorizedContext, post_id: Uuid) -> CoreResult<()> {
    let row = db
        .get_post(&post_id.to_string())?
        .ok_or(CoreError::NotFound)?;
    if row.user_id != ctx.user_id.to_string() {
        return Err(CoreError::Forbidden);
    }

    db.delete_post(&post_id.to_string())?;
    Ok(())
}

pub fn create_comment(
    db: &Database,
    ctx: &AuthorizedContext,
    req: CreateCommentRequest,
) -> CoreResult<Comment> {
    // Comments attach only to posts that exist.
    if db.get_post(&req.post_id.to_string())?.is_none() {
        return Err(CoreError::NotFound);
    }

    let id = Uuid::new_v4();
    db.insert_comment(
        &id.to_string(),
        &req.body,
        &ctx.user_id.to_string(),
        &req.post_id.to_string(),
    )?;

    Ok(Comment {
        id,
        body: req.body,
        user_id: ctx.user_id,
        post_id: req.post_id,
        created_at: Utc::now(),
    })
}

/// Only the comment's own author may delete it. The parent post's owner
/// gets no moderation override; that would be a second authorization tier.
pub fn delete_comment(db: &Database, ctx: &AuthorizedContext, comment_id: Uuid) -> CoreResult<()> {
    let row = db
        .get_comment(&comment_id.to_string())?
        .ok_or(CoreError::NotFound)?;
    if row.user_id != ctx.user_id.to_string() {
        return Err(CoreError::Forbidden);
    }

    db.delete_comment(&comment_id.to_string())?;
    Ok(())
}

pub fn update_user(
    db: &Database,
    ctx: &AuthorizedContext,
    user_id: Uuid,
    patch: UserPatch,
) -> CoreResult<User> {
    if ctx.user_id != user_id {
        return Err(CoreError::Forbidden);
    }
    let row = db
        .get_user_by_id(&user_id.to_string())?
        .ok_or(CoreError::NotFound)?;

    let username = patch.username.unwrap_or(row.username);
    let email = patch.email.unwrap_or(row.email);

    // Re-check uniqueness when the keys change.
    if let Some(other) = db.get_user_by_username(&username)? {
        if other.id != row.id {
            return Err(CoreError::DuplicateKey("username"));
        }
    }
    if let Some(other) = db.get_user_by_email(&email)? {
        if other.id != row.id {
            return Err(CoreError::DuplicateKey("email"));
        }
    }

    // A changed password goes through the same hashing choke point as
    // registration; an unchanged one is left exactly as stored.
    let password_hash = match patch.password {
        Some(plaintext) => credentials::hash_password(&plaintext)?,
        None => row.password,
    };

    db.update_user(&user_id.to_string(), &username, &email, &password_hash)?;

    let updated = db
        .get_user_by_id(&user_id.to_string())?
        .ok_or(CoreError::NotFound)?;
    Ok(user_from_row(updated))
}

pub fn delete_user(db: &Database, ctx: &AuthorizedContext, user_id: Uuid) -> CoreResult<()> {
    if ctx.user_id != user_id {
        return Err(CoreError::Forbidden);
    }
    // Posts, comments, and live sessions cascade with the row.
    if db.delete_user(&user_id.to_string())? == 0 {
        return Err(CoreError::NotFound);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::read_model;

    fn setup() -> (Database, AuthorizedContext, AuthorizedContext) {
        let db = Database::open_in_memory().unwrap();
        let alice = credentials::register(&db, "alice", "a@x.com", "pw1234").unwrap();
        let bob = credentials::register(&db, "bob", "b@x.com", "pw1234").unwrap();
        let alice_ctx = AuthorizedContext {
            user_id: alice.id,
            username: alice.username,
        };
        let bob_ctx = AuthorizedContext {
            user_id: bob.id,
            username: bob.username,
        };
        (db, alice_ctx, bob_ctx)
    }

    fn a_post(db: &Database, ctx: &AuthorizedContext) -> Post {
        create_post(
            db,
            ctx,
            CreatePostRequest {
                title: "title".into(),
                body: "body".into(),
            },
        )
        .unwrap()
    }

    #[test]
    fn non_owner_update_and_delete_are_forbidden() {
        let (db, alice, bob) = setup();
        let post = a_post(&db, &alice);

        assert!(matches!(
            update_post(&db, &bob, post.id, PostPatch::default()),
            Err(CoreError::Forbidden)
        ));
        assert!(matches!(
            delete_post(&db, &bob, post.id),
            Err(CoreError::Forbidden)
        ));

        // The post survives the refused delete.
        assert!(read_model::get_post(&db, post.id).is_ok());
    }

    #[test]
    fn owner_update_merges_patch_fields() {
        let (db, alice, _bob) = setup();
        let post = a_post(&db, &alice);

        let updated = update_post(
            &db,
            &alice,
            post.id,
            PostPatch {
                title: Some("new title".into()),
                body: None,
            },
        )
        .unwrap();
        assert_eq!(updated.title, "new title");
        assert_eq!(updated.body, "body");
    }

    #[test]
    fn mutating_a_missing_post_is_not_found() {
        let (db, alice, _bob) = setup();

        assert!(matches!(
            update_post(&db, &alice, Uuid::new_v4(), PostPatch::default()),
            Err(CoreError::NotFound)
        ));
        assert!(matches!(
            create_comment(
                &db,
                &alice,
                CreateCommentRequest {
                    post_id: Uuid::new_v4(),
                    body: "orphan".into()
                }
            ),
            Err(CoreError::NotFound)
        ));
    }

    #[test]
    fn comment_deletion_requires_comment_ownership() {
        let (db, alice, bob) = setup();
        let post = a_post(&db, &alice);
        let comment = create_comment(
            &db,
            &bob,
            CreateCommentRequest {
                post_id: post.id,
                body: "bob's".into(),
            },
        )
        .unwrap();

        // Even the post's owner cannot delete someone else's comment.
        assert!(matches!(
            delete_comment(&db, &alice, comment.id),
            Err(CoreError::Forbidden)
        ));
        delete_comment(&db, &bob, comment.id).unwrap();
        assert!(matches!(
            delete_comment(&db, &bob, comment.id),
            Err(CoreError::NotFound)
        ));
    }

    #[test]
    fn password_patch_rehashes_through_registration_path() {
        let (db, alice, _bob) = setup();

        update_user(
            &db,
            &alice,
            alice.user_id,
            UserPatch {
                password: Some("newpw5678".into()),
                ..Default::default()
            },
        )
        .unwrap();

        assert!(credentials::verify(&db, "a@x.com", "newpw5678").is_ok());
        assert!(matches!(
            credentials::verify(&db, "a@x.com", "pw1234"),
            Err(CoreError::InvalidCredentials)
        ));

        let row = db
            .get_user_by_id(&alice.user_id.to_string())
            .unwrap()
            .unwrap();
        assert!(row.password.starts_with("$argon2"));
    }

    #[test]
    fn users_may_only_touch_themselves() {
        let (db, alice, bob) = setup();

        assert!(matches!(
            update_user(&db, &alice, bob.user_id, UserPatch::default()),
            Err(CoreError::Forbidden)
        ));
        assert!(matches!(
            delete_user(&db, &alice, bob.user_id),
            Err(CoreError::Forbidden)
        ));

        delete_user(&db, &bob, bob.user_id).unwrap();
        assert!(db.get_user_by_id(&bob.user_id.to_string()).unwrap().is_none());
    }

    #[test]
    fn deleting_a_user_cascades_content_and_sessions() {
        let (db, alice, _bob) = setup();
        let post = a_post(&db, &alice);
        let session = crate::session::start(&db, alice.user_id, &alice.username).unwrap();

        delete_user(&db, &alice, alice.user_id).unwrap();

        assert!(matches!(
            read_model::get_post(&db, post.id),
            Err(CoreError::NotFound)
        ));
        assert!(matches!(
            crate::session::authorize(&db, Some(&session.token.to_string())),
            Err(CoreError::Unauthorized)
        ));
    }
}
