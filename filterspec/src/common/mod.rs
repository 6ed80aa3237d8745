mod constants;
pub mod util;

pub use constants::*;
pub use util::*;
