// src/services/mod.rs

pub mod attempt_service;
pub mod result_service;
pub mod retry;

pub use attempt_service::AttemptService;
pub use result_service::ResultService;
