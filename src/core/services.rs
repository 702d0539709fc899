pub mod admin;
pub mod aspirasi;
pub mod auth;
pub mod event;
pub mod feedback;
pub mod jadwal;
pub mod organisasi;
pub mod participant;
pub mod recommendation;
pub mod skill;
pub mod subscription;

#[cfg(test)]
pub(crate) mod memory;
