use crate::Database;
use crate::models::{CommentRow, CommentWithPostRow, PostRow, SessionRow, UserRow};
use anyhow::Result;
use rusqlite::Connection;

impl Database {
    // -- Users --

    pub fn create_user(
        &self,
        id: &str,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO users (id, username, email, password) VALUES (?1, ?2, ?3, ?4)",
                (id, username, email, password_hash),
            )?;
            Ok(())
        })
    }

    pub fn get_user_by_id(&self, id: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "id", id))
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "email", email))
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "username", username))
    }

    /// Full-row update; callers fetch the row first and pass the merged
    /// values back, so a None-field patch never clears a column.
    pub fn update_user(
        &self,
        id: &str,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<usize> {
        self.with_conn_mut(|conn| {
            let n = conn.execute(
                "UPDATE users SET username = ?2, email = ?3, password = ?4 WHERE id = ?1",
                (id, username, email, password_hash),
            )?;
            Ok(n)
        })
    }

    pub fn delete_user(&self, id: &str) -> Result<usize> {
        self.with_conn_mut(|conn| {
            let n = conn.execute("DELETE FROM users WHERE id = ?1", [id])?;
            Ok(n)
        })
    }

    // -- Posts --

    pub fn insert_post(&self, id: &str, title: &str, body: &str, user_id: &str) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO posts (id, title, body, user_id) VALUES (?1, ?2, ?3, ?4)",
                (id, title, body, user_id),
            )?;
            Ok(())
        })
    }

    pub fn get_post(&self, id: &str) -> Result<Option<PostRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT p.id, p.title, p.body, p.user_id, u.username, p.created_at
                 FROM posts p
                 JOIN users u ON p.user_id = u.id
                 WHERE p.id = ?1",
            )?;
            let row = stmt.query_row([id], map_post_row).optional()?;
            Ok(row)
        })
    }

    /// List posts newest-first, optionally scoped to one owner.
    /// Joins users so the author username comes back in the same query.
    pub fn list_posts(&self, owner: Option<&str>) -> Result<Vec<PostRow>> {
        self.with_conn(|conn| match owner {
            Some(user_id) => {
                let mut stmt = conn.prepare(
                    "SELECT p.id, p.title, p.body, p.user_id, u.username, p.created_at
                     FROM posts p
                     JOIN users u ON p.user_id = u.id
                     WHERE p.user_id = ?1
                     ORDER BY p.created_at DESC, p.rowid DESC",
                )?;
                let rows = stmt
                    .query_map([user_id], map_post_row)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(rows)
            }
            None => {
                let mut stmt = conn.prepare(
                    "SELECT p.id, p.title, p.body, p.user_id, u.username, p.created_at
                     FROM posts p
                     JOIN users u ON p.user_id = u.id
                     ORDER BY p.created_at DESC, p.rowid DESC",
                )?;
                let rows = stmt
                    .query_map([], map_post_row)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(rows)
            }
        })
    }

    pub fn update_post(&self, id: &str, title: &str, body: &str) -> Result<usize> {
        self.with_conn_mut(|conn| {
            let n = conn.execute(
                "UPDATE posts SET title = ?2, body = ?3 WHERE id = ?1",
                (id, title, body),
            )?;
            Ok(n)
        })
    }

    pub fn delete_post(&self, id: &str) -> Result<usize> {
        self.with_conn_mut(|conn| {
            let n = conn.execute("DELETE FROM posts WHERE id = ?1", [id])?;
            Ok(n)
        })
    }

    // -- Comments --

    pub fn insert_comment(&self, id: &str, body: &str, user_id: &str, post_id: &str) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO comments (id, body, user_id, post_id) VALUES (?1, ?2, ?3, ?4)",
                (id, body, user_id, post_id),
            )?;
            Ok(())
        })
    }

    pub fn get_comment(&self, id: &str) -> Result<Option<CommentRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT c.id, c.body, c.user_id, u.username, c.post_id, c.created_at
                 FROM comments c
                 JOIN users u ON c.user_id = u.id
                 WHERE c.id = ?1",
            )?;
            let row = stmt.query_row([id], map_comment_row).optional()?;
            Ok(row)
        })
    }

    /// Batch-fetch the comment threads for a set of post IDs, in storage
    /// (insertion) order. One query for the whole page of posts.
    pub fn get_comments_for_posts(&self, post_ids: &[String]) -> Result<Vec<CommentRow>> {
        if post_ids.is_empty() {
            return Ok(vec![]);
        }

        self.with_conn(|conn| {
            let placeholders: Vec<String> =
                (1..=post_ids.len()).map(|i| format!("?{}", i)).collect();
            let sql = format!(
                "SELECT c.id, c.body, c.user_id, u.username, c.post_id, c.created_at
                 FROM comments c
                 JOIN users u ON c.user_id = u.id
                 WHERE c.post_id IN ({})
                 ORDER BY c.rowid",
                placeholders.join(", ")
            );

            let mut stmt = conn.prepare(&sql)?;
            let params: Vec<&dyn rusqlite::types::ToSql> = post_ids
                .iter()
                .map(|id| id as &dyn rusqlite::types::ToSql)
                .collect();

            let rows = stmt
                .query_map(params.as_slice(), map_comment_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    /// A user's comments joined to the title of the post each landed on.
    pub fn get_comments_by_user(&self, user_id: &str) -> Result<Vec<CommentWithPostRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT c.id, c.body, c.post_id, p.title, c.created_at
                 FROM comments c
                 JOIN posts p ON c.post_id = p.id
                 WHERE c.user_id = ?1
                 ORDER BY c.rowid",
            )?;
            let rows = stmt
                .query_map([user_id], |row| {
                    Ok(CommentWithPostRow {
                        id: row.get(0)?,
                        body: row.get(1)?,
                        post_id: row.get(2)?,
                        post_title: row.get(3)?,
                        created_at: row.get(4)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn delete_comment(&self, id: &str) -> Result<usize> {
        self.with_conn_mut(|conn| {
            let n = conn.execute("DELETE FROM comments WHERE id = ?1", [id])?;
            Ok(n)
        })
    }

    // -- Sessions --

    pub fn insert_session(&self, token: &str, user_id: &str, username: &str) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO sessions (token, user_id, username, logged_in) VALUES (?1, ?2, ?3, 1)",
                (token, user_id, username),
            )?;
            Ok(())
        })
    }

    pub fn get_session(&self, token: &str) -> Result<Option<SessionRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT token, user_id, username, logged_in, created_at
                 FROM sessions WHERE token = ?1",
            )?;
            let row = stmt
                .query_row([token], |row| {
                    Ok(SessionRow {
                        token: row.get(0)?,
                        user_id: row.get(1)?,
                        username: row.get(2)?,
                        logged_in: row.get::<_, i64>(3)? != 0,
                        created_at: row.get(4)?,
                    })
                })
                .optional()?;
            Ok(row)
        })
    }

    /// Returns the number of sessions destroyed (0 when the token was
    /// already gone).
    pub fn delete_session(&self, token: &str) -> Result<usize> {
        self.with_conn_mut(|conn| {
            let n = conn.execute("DELETE FROM sessions WHERE token = ?1", [token])?;
            Ok(n)
        })
    }
}

fn query_user(conn: &Connection, column: &str, value: &str) -> Result<Option<UserRow>> {
    // `column` is one of our own identifiers, never caller input.
    let sql = format!(
        "SELECT id, username, email, password, created_at FROM users WHERE {} = ?1",
        column
    );
    let mut stmt = conn.prepare(&sql)?;

    let row = stmt
        .query_row([value], |row| {
            Ok(UserRow {
                id: row.get(0)?,
                username: row.get(1)?,
                email: row.get(2)?,
                password: row.get(3)?,
                created_at: row.get(4)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn map_post_row(row: &rusqlite::Row<'_>) -> std::result::Result<PostRow, rusqlite::Error> {
    Ok(PostRow {
        id: row.get(0)?,
        title: row.get(1)?,
        body: row.get(2)?,
        user_id: row.get(3)?,
        author_username: row.get(4)?,
        created_at: row.get(5)?,
    })
}

fn map_comment_row(row: &rusqlite::Row<'_>) -> std::result::Result<CommentRow, rusqlite::Error> {
    Ok(CommentRow {
        id: row.get(0)?,
        body: row.get(1)?,
        user_id: row.get(2)?,
        author_username: row.get(3)?,
        post_id: row.get(4)?,
        created_at: row.get(5)?,
    })
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
