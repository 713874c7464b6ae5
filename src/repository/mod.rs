//! SQL access for users and expenses. Every function takes the pool and
//! returns plain `sqlx::Error`; handlers decide what a miss means.

pub mod expenses;
pub mod users;
