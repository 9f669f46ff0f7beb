pub mod actor;
pub mod matching;

pub use actor::*;
pub use matching::*;
