pub mod password;
pub mod stats;
pub mod token;
