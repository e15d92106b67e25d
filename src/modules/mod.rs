pub mod assignments;
pub mod homework;
