pub mod ai;
pub mod models;
pub mod payment;
pub mod ports;
pub mod schedule;
pub mod services;
pub mod tokener;
