pub mod credentials;
pub mod error;
pub mod mutations;
pub mod read_model;
pub mod session;

mod convert;

pub use error::{CoreError, CoreResult};
