//! Catalog services used by the HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own validation and persistence so route handlers stay
//! focused on extraction, auth, and response shaping. Every fallible call
//! returns `CatalogError`, which renders itself as an HTTP response.

pub mod assignment;
pub mod brand;
pub mod component;
pub mod configuration;
pub mod learning;
pub mod motorcycle;
pub mod payload;
pub mod profile;
pub mod rows;
pub mod search;
pub mod trim_copy;
pub mod validate;
