pub mod aspirasi;
pub mod common;
pub mod event;
pub mod feedback;
pub mod jadwal;
pub mod organisasi;
pub mod participant;
pub mod payment;
pub mod skill;
pub mod stats;
pub mod user;
