pub mod company;
pub mod job;
pub mod plan;

pub use company::Company;
pub use job::Job;
pub use plan::Plan;
