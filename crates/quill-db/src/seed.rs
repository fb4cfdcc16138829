use crate::Database;
use anyhow::Result;
use tracing::info;
use uuid::Uuid;

/// A demo account ready for insertion. Hashing happens at the call site so
/// this crate never sees a plaintext password path of its own.
pub struct SeedUser<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: String,
}

pub const DEMO_USERS: &[(&str, &str, &str)] = &[
    ("marisol", "marisol@example.com", "password1234"),
    ("devon", "devon@example.com", "password1234"),
    ("priya", "priya@example.com", "password1234"),
    ("tomas", "tomas@example.com", "password1234"),
];

const DEMO_POSTS: &[(usize, &str, &str)] = &[
    (
        0,
        "Why I switched note-taking apps again",
        "Third time this year. This one has backlinks, which I will use twice.",
    ),
    (
        1,
        "Sourdough starter week 2",
        "It bubbles. It smells like victory and also a little like glue.",
    ),
    (
        2,
        "Cheap mechanical keyboards worth trying",
        "You do not need to spend $300 to hear your own typing.",
    ),
];

const DEMO_COMMENTS: &[(usize, usize, &str)] = &[
    (1, 0, "Backlinks are a lifestyle, not a feature."),
    (2, 1, "Name the starter. It helps morale."),
    (0, 2, "Browns in board, blues in public. Know the difference."),
    (3, 0, "See you at app number four."),
];

/// Bulk-insert demo users, posts, and comments in one transaction.
pub fn run(db: &Database, users: &[SeedUser<'_>]) -> Result<()> {
    db.with_conn_mut(|conn| {
        let tx = conn.transaction()?;

        let mut user_ids = Vec::with_capacity(users.len());
        for user in users {
            let id = Uuid::new_v4().to_string();
            tx.execute(
                "INSERT INTO users (id, username, email, password) VALUES (?1, ?2, ?3, ?4)",
                (&id, user.username, user.email, &user.password_hash),
            )?;
            user_ids.push(id);
        }

        let mut post_ids = Vec::with_capacity(DEMO_POSTS.len());
        for (owner, title, body) in DEMO_POSTS {
            let id = Uuid::new_v4().to_string();
            tx.execute(
                "INSERT INTO posts (id, title, body, user_id) VALUES (?1, ?2, ?3, ?4)",
                (&id, title, body, &user_ids[*owner]),
            )?;
            post_ids.push(id);
        }

        for (owner, post, body) in DEMO_COMMENTS {
            tx.execute(
                "INSERT INTO comments (id, body, user_id, post_id) VALUES (?1, ?2, ?3, ?4)",
                (
                    &Uuid::new_v4().to_string(),
                    body,
                    &user_ids[*owner],
                    &post_ids[*post],
                ),
            )?;
        }

        tx.commit()?;
        Ok(())
    })?;

    info!(
        "Seeded {} users, {} posts, {} comments",
        users.len(),
        DEMO_POSTS.len(),
        DEMO_COMMENTS.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_populates_all_tables() {
        let db = Database::open_in_memory().unwrap();
        let users: Vec<SeedUser<'_>> = DEMO_USERS
            .iter()
            .copied()
            .map(|(username, email, _)| SeedUser {
                username,
                email,
                password_hash: "phc-hash".into(),
            })
            .collect();

        run(&db, &users).unwrap();

        let posts = db.list_posts(None).unwrap();
        assert_eq!(posts.len(), 3);
        assert!(db.get_user_by_username("marisol").unwrap().is_some());
    }
}
