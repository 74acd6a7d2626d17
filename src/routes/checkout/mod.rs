mod get;
mod post;

pub use get::checkout_page;
pub use post::{cancel_checkout, start_new_checkout, submit_checkout};
