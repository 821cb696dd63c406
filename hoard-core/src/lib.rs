mod collection;
mod error;
mod flash;
mod model;
mod responses;

pub use collection::*;
pub use error::*;
pub use flash::*;
pub use model::*;
pub use responses::*;
