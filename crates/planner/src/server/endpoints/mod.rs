pub mod layout;
pub mod lookup;
pub mod schedule;
pub mod status;
