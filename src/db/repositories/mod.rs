pub mod admin;
pub mod classification;
pub mod diatom_class;
pub mod user;
