// Phone operation traits and implementations
pub mod backup;
pub mod delete;
pub mod restore;

pub use backup::Backuper;
pub use delete::Deleter;
pub use restore::Restorer;
