//! SeaORM entity definitions

pub mod company;
pub mod job;
pub mod plan;

mod text;

pub use job::JobStatus;
pub use plan::{DurationUnit, PlanType};
pub use text::{Localized, Tags};
