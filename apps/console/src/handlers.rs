pub mod equipment_types;
pub mod fields;
pub mod forms;
pub mod health;
pub mod records;
