pub mod agent;
pub mod checkpoint;
pub mod coordinate;
pub mod day_summary;
pub mod day_view;
pub mod duty_status;
pub mod location_sample;
