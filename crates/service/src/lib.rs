//! Service layer for the `System` resource.
//! - `system::domain` is the API-facing shape, `models::system` the stored one.
//! - `system::mapper` converts between them; `system::repository` abstracts the store.
//! - `system::service::SystemService` enforces identity and existence rules on top.

pub mod errors;
pub mod system;
#[cfg(test)]
pub mod test_support;
