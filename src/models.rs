pub mod assignment;
pub mod store;
pub mod time_of_day;
