//! SQL migrations compiled into the binary, in application order.

pub struct Migration {
    pub id: &'static str,
    pub sql: &'static str,
}

pub const MIGRATIONS: &[Migration] = &[Migration {
    id: "001_snapshot_history",
    sql: include_str!("../../migrations/001_snapshot_history.sql"),
}];
