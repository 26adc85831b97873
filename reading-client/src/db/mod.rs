pub mod reading_queries;

pub use reading_queries::{insert_reading, ping, readings_for_owner};
