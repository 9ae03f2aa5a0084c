pub mod backend;

pub use backend::{create_router, initialize_backend, AppState};
