use serde::Serialize;

/// A participant of one chat group. The same user id in another group is a
/// separate member record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Member {
    pub user_id: i64,
    pub group_id: i64,
    pub display_name: String,
}
