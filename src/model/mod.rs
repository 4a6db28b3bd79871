pub mod analysis;
pub mod apperror;
pub mod beekeeping;
pub mod config;
pub mod laboratory;
pub mod models;
pub mod statistics;
pub mod storage;
pub mod validation;
