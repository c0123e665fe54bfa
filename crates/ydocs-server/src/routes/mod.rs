mod health_check;
pub use health_check::*;

mod documents;
pub use documents::*;
