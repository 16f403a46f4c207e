pub mod figment;
mod sensitive;
pub mod validator;

pub use sensitive::Sensitive;
