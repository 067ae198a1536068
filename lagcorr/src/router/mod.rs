pub mod aggregate;
pub mod children;
pub mod correlate;
pub mod fetch;
pub mod pairwise;

pub mod util;
