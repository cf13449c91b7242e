pub mod prelude;

pub mod admins;
pub mod classification_records;
pub mod diatom_classes;
pub mod users;
