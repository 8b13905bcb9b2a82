pub mod ask;
pub mod chat;
pub mod dispatch;
pub mod health;
pub mod info;
pub mod shared;
