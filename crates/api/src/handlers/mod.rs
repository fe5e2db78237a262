pub mod accounts;
pub mod comment;
pub mod todo;
