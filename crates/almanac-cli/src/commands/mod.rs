pub mod add;
pub mod alerts;
pub mod delete;
pub mod init;
pub mod list;
pub mod memo;
pub mod remind;
pub mod tick;
