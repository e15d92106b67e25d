pub mod constants;
pub mod conversion;
pub mod datetime;
