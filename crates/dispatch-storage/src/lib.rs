pub mod error;
pub mod team;

pub use error::{Result, StorageError};
pub use team::{init_team_db, SqliteTeamStore};
