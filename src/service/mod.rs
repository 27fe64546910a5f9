//! CrudService: generic CRUD using safe SQL builder, exposed per entity through repositories.

mod crud;
mod repository;
mod validation;
pub use crud::CrudService;
pub use repository::{Repository, SqlRepository};
pub use validation::{parse_id, Payload};
