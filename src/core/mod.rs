pub mod agents;
pub mod calculator;
pub mod checkpoint;
pub mod config;
pub mod day;
pub mod duty;
pub mod log;
pub mod pinger;
pub mod session_guard;
pub mod sweep;
