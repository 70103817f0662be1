//! Request validation and user creation.

mod users;
mod validation;
pub use users::UserService;
pub use validation::{is_valid_email, RequestValidator};
