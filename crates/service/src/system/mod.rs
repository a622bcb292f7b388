//! System resource: domain type, mapper, repository and service.

pub mod domain;
pub mod mapper;
pub mod repository;
pub mod repo;
pub mod service;

pub use domain::System;
pub use mapper::{BaseMapper, SystemMapper};
pub use repository::SystemRepository;
pub use service::SystemService;
