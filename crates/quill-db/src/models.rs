/// Database row types — these map directly to SQLite rows.
/// Distinct from quill-types API models so the password hash never enters
/// a serializable shape.

pub struct UserRow {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub created_at: String,
}

pub struct PostRow {
    pub id: String,
    pub title: String,
    pub body: String,
    pub user_id: String,
    pub author_username: String,
    pub created_at: String,
}

pub struct CommentRow {
    pub id: String,
    pub body: String,
    pub user_id: String,
    pub author_username: String,
    pub post_id: String,
    pub created_at: String,
}

/// A comment joined to its parent post's title, for user profile pages.
pub struct CommentWithPostRow {
    pub id: String,
    pub body: String,
    pub post_id: String,
    pub post_title: String,
    pub created_at: String,
}

pub struct SessionRow {
    pub token: String,
    pub user_id: String,
    pub username: String,
    pub logged_in: bool,
    pub created_at: String,
}
