pub mod auth;
pub mod buyer;
pub mod messages;
pub mod seller;
pub mod support;
pub mod tickets;
pub mod users;
