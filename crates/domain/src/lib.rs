pub mod clock;
pub mod errors;
pub mod todo;

pub use clock::*;
pub use errors::*;
pub use todo::*;
