pub mod alliance;
pub mod team;

pub use alliance::Alliance;
pub use team::{Phase, Team};
