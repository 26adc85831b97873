mod reading;

pub use reading::{NewReading, OwnerId, Reading};
