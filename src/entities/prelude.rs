pub use super::admins::Entity as Admins;
pub use super::classification_records::Entity as ClassificationRecords;
pub use super::diatom_classes::Entity as DiatomClasses;
pub use super::users::Entity as Users;
