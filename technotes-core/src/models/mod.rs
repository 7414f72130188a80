mod note;
mod request;
mod user;

pub use note::*;
pub use request::*;
pub use user::*;
