mod checkout;
mod health_check;

pub use checkout::*;
pub use health_check::*;
