mod error;

pub mod tei;

pub use error::{Error, Result};
pub use tei::TeiClient;
