pub mod analysis;
pub mod chart;
pub mod forecast;
pub mod market;

pub use analysis::*;
pub use chart::*;
pub use forecast::*;
pub use market::*;
