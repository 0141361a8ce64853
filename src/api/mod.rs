pub mod bean_handlers;
pub mod docs;
pub mod extract;
pub mod handlers;
pub mod note_handlers;
pub mod recipe_handlers;
pub mod routes;

pub use extract::*;
pub use handlers::*;
pub use routes::*;
