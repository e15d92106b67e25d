pub mod account;
pub mod portal;
pub mod session;
