mod cache;
mod constants;
mod objs;
mod pods;

pub use cache::*;
pub use constants::*;
pub use objs::*;
pub use pods::*;
