pub mod bot_user;
pub mod movie;
