use thiserror::Error;

#[derive(Error, Debug)]
#[allow(unused)]
pub enum DatabaseError {
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Record not found")]
    NotFound,

    #[error("Requested time overlaps an existing appointment")]
    SlotConflict,

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
