pub mod catalog;
pub mod studio;
