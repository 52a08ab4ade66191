//! Entity type definitions

pub mod contact;
pub mod deal;
pub mod proforma;
pub mod task;
pub mod timeline;

pub use contact::{Contact, ContactRole};
pub use deal::{Deal, DealStage};
pub use proforma::Proforma;
pub use task::{Task, TaskStatus};
pub use timeline::{Milestone, MilestoneStatus, Phase, PhaseStatus, Timeline};
