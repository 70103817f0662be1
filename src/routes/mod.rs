//! Route tables, mounted by the plugins that own them.

mod common;
mod users;

pub use common::common_routes;
pub use users::user_routes;
