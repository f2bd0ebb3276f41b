// handlers/mod.rs - HTTP handlers
//
// users:  /api/users CRUD
// health: /health, /ready and the / service info

pub mod health;
pub mod users;

pub use health::{health, not_found, ready, root};
pub use users::{users_create, users_delete, users_list, users_show, users_update};
