pub mod init;
pub mod scores;
pub mod take;
pub mod user;
pub mod validate;
