pub mod config;
pub mod domain;
pub mod error;
pub mod management;
pub mod repository;
pub mod usecase;

pub use crate::config::Config;
pub use crate::domain::{Diagram, Identity, Solution};
pub use crate::error::{RepositoryError, Result};
pub use crate::management::http::HttpManagementApiFactory;
pub use crate::repository::management_api::ManagementApiRepository;
pub use crate::repository::SolutionRepository;
