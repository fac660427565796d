pub mod assignments;
