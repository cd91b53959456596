//! Services: request validation in front of the repositories.

mod crud;
mod validation;
pub use crud::{CarService, CrudService, EngineService};
pub use validation::{RequestValidator, RuleSet, ValidationRule};
