use uuid::Uuid;

use quill_db::Database;
use quill_types::models::Session;

use crate::error::{CoreError, CoreResult};

/// The identity a passed gate hands downstream. Mutations take this
/// explicitly; nothing below the gate reads session state on its own.
#[derive(Debug, Clone)]
pub struct AuthorizedContext {
    pub user_id: Uuid,
    pub username: String,
}

/// Create and durably persist a session. The insert completes before the
/// token is returned, so a token a caller holds is always retrievable.
pub fn start(db: &Database, user_id: Uuid, username: &str) -> CoreResult<Session> {
    let token = Uuid::new_v4();
    db.insert_session(&token.to_string(), &user_id.to_string(), username)?;

    Ok(Session {
        token,
        user_id,
        username: username.to_string(),
        logged_in: true,
    })
}

/// Destroy a session. Ending a token that is already gone is reported as
/// `NoActiveSession`, not silent success.
pub fn end(db: &Database, token: &str) -> CoreResult<()> {
    if db.delete_session(token)? == 0 {
        return Err(CoreError::NoActiveSession);
    }
    Ok(())
}

/// The single gate decision. Transport policies (401 JSON vs. redirect)
/// differ only in how they render this refusal.
pub fn authorize(db: &Database, token: Option<&str>) -> CoreResult<AuthorizedContext> {
    let token = token.ok_or(CoreError::Unauthorized)?;
    let row = db.get_session(token)?.ok_or(CoreError::Unauthorized)?;

    if !row.logged_in {
        return Err(CoreError::Unauthorized);
    }
    let user_id = row.user_id.parse().map_err(|_| CoreError::Unauthorized)?;

    Ok(AuthorizedContext {
        user_id,
        username: row.username,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials;

    fn db_with_alice() -> (Database, quill_types::models::User) {
        let db = Database::open_in_memory().unwrap();
        let user = credentials::register(&db, "alice", "a@x.com", "pw1234").unwrap();
        (db, user)
    }

    #[test]
    fn started_session_authorizes() {
        let (db, user) = db_with_alice();
        let session = start(&db, user.id, &user.username).unwrap();

        let ctx = authorize(&db, Some(&session.token.to_string())).unwrap();
        assert_eq!(ctx.user_id, user.id);
        assert_eq!(ctx.username, "alice");
    }

    #[test]
    fn missing_or_unknown_token_is_unauthorized() {
        let (db, _user) = db_with_alice();

        assert!(matches!(
            authorize(&db, None),
            Err(CoreError::Unauthorized)
        ));
        assert!(matches!(
            authorize(&db, Some(&Uuid::new_v4().to_string())),
            Err(CoreError::Unauthorized)
        ));
    }

    #[test]
    fn logged_out_flag_refuses_even_with_a_live_row() {
        let (db, user) = db_with_alice();
        let session = start(&db, user.id, &user.username).unwrap();

        db.with_conn(|conn| {
            conn.execute(
                "UPDATE sessions SET logged_in = 0 WHERE token = ?1",
                [session.token.to_string()],
            )?;
            Ok(())
        })
        .unwrap();

        assert!(matches!(
            authorize(&db, Some(&session.token.to_string())),
            Err(CoreError::Unauthorized)
        ));
    }

    #[test]
    fn ending_twice_reports_no_active_session() {
        let (db, user) = db_with_alice();
        let session = start(&db, user.id, &user.username).unwrap();
        let token = session.token.to_string();

        end(&db, &token).unwrap();
        assert!(matches!(end(&db, &token), Err(CoreError::NoActiveSession)));

        // And the token no longer authorizes.
        assert!(matches!(
            authorize(&db, Some(&token)),
            Err(CoreError::Unauthorized)
        ));
    }
}
