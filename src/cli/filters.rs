//! Unified filter enums for list commands
//!
//! Each list command exposes the same filter vocabulary; the enums here keep
//! the matching rules in one place.

use clap::ValueEnum;

use crate::core::entity::Priority;
use crate::entities::contact::ContactRole;
use crate::entities::deal::DealStage;
use crate::entities::task::TaskStatus;

/// Stage filter for `deal list`
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum StageFilter {
    Prospecting,
    ControlledNotApproved,
    ControlledApproved,
    Entitlements,
    Development,
    Closed,
    Dead,
    /// Any stage still in the pipeline - default
    #[default]
    Active,
    /// All stages including closed and dead
    All,
}

impl StageFilter {
    pub fn matches(&self, stage: &DealStage) -> bool {
        match self {
            StageFilter::Prospecting => *stage == DealStage::Prospecting,
            StageFilter::ControlledNotApproved => *stage == DealStage::ControlledNotApproved,
            StageFilter::ControlledApproved => *stage == DealStage::ControlledApproved,
            StageFilter::Entitlements => *stage == DealStage::Entitlements,
            StageFilter::Development => *stage == DealStage::Development,
            StageFilter::Closed => *stage == DealStage::Closed,
            StageFilter::Dead => *stage == DealStage::Dead,
            StageFilter::Active => stage.is_active(),
            StageFilter::All => true,
        }
    }
}

impl std::fmt::Display for StageFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StageFilter::Prospecting => write!(f, "prospecting"),
            StageFilter::ControlledNotApproved => write!(f, "controlled-not-approved"),
            StageFilter::ControlledApproved => write!(f, "controlled-approved"),
            StageFilter::Entitlements => write!(f, "entitlements"),
            StageFilter::Development => write!(f, "development"),
            StageFilter::Closed => write!(f, "closed"),
            StageFilter::Dead => write!(f, "dead"),
            StageFilter::Active => write!(f, "active"),
            StageFilter::All => write!(f, "all"),
        }
    }
}

/// Status filter for `task list`
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum TaskStatusFilter {
    Todo,
    InProgress,
    Blocked,
    Completed,
    /// Anything not completed - default
    #[default]
    Open,
    /// All statuses
    All,
}

impl TaskStatusFilter {
    pub fn matches(&self, status: &TaskStatus) -> bool {
        match self {
            TaskStatusFilter::Todo => *status == TaskStatus::Todo,
            TaskStatusFilter::InProgress => *status == TaskStatus::InProgress,
            TaskStatusFilter::Blocked => *status == TaskStatus::Blocked,
            TaskStatusFilter::Completed => *status == TaskStatus::Completed,
            TaskStatusFilter::Open => status.is_open(),
            TaskStatusFilter::All => true,
        }
    }
}

impl std::fmt::Display for TaskStatusFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskStatusFilter::Todo => write!(f, "todo"),
            TaskStatusFilter::InProgress => write!(f, "in-progress"),
            TaskStatusFilter::Blocked => write!(f, "blocked"),
            TaskStatusFilter::Completed => write!(f, "completed"),
            TaskStatusFilter::Open => write!(f, "open"),
            TaskStatusFilter::All => write!(f, "all"),
        }
    }
}

/// Priority filter for list commands
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum PriorityFilter {
    Low,
    Medium,
    High,
    Critical,
    /// High and critical only
    Urgent,
    /// All priorities - default
    #[default]
    All,
}

impl PriorityFilter {
    pub fn matches(&self, priority: &Priority) -> bool {
        match self {
            PriorityFilter::Low => *priority == Priority::Low,
            PriorityFilter::Medium => *priority == Priority::Medium,
            PriorityFilter::High => *priority == Priority::High,
            PriorityFilter::Critical => *priority == Priority::Critical,
            PriorityFilter::Urgent => {
                *priority == Priority::High || *priority == Priority::Critical
            }
            PriorityFilter::All => true,
        }
    }
}

impl std::fmt::Display for PriorityFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PriorityFilter::Low => write!(f, "low"),
            PriorityFilter::Medium => write!(f, "medium"),
            PriorityFilter::High => write!(f, "high"),
            PriorityFilter::Critical => write!(f, "critical"),
            PriorityFilter::Urgent => write!(f, "urgent"),
            PriorityFilter::All => write!(f, "all"),
        }
    }
}

/// Role filter for `contact list`
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum RoleFilter {
    Broker,
    Seller,
    Buyer,
    Attorney,
    Lender,
    Consultant,
    Partner,
    Other,
    /// All roles - default
    #[default]
    All,
}

impl RoleFilter {
    pub fn matches(&self, role: &ContactRole) -> bool {
        match self {
            RoleFilter::Broker => *role == ContactRole::Broker,
            RoleFilter::Seller => *role == ContactRole::Seller,
            RoleFilter::Buyer => *role == ContactRole::Buyer,
            RoleFilter::Attorney => *role == ContactRole::Attorney,
            RoleFilter::Lender => *role == ContactRole::Lender,
            RoleFilter::Consultant => *role == ContactRole::Consultant,
            RoleFilter::Partner => *role == ContactRole::Partner,
            RoleFilter::Other => *role == ContactRole::Other,
            RoleFilter::All => true,
        }
    }
}

impl std::fmt::Display for RoleFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoleFilter::Broker => write!(f, "broker"),
            RoleFilter::Seller => write!(f, "seller"),
            RoleFilter::Buyer => write!(f, "buyer"),
            RoleFilter::Attorney => write!(f, "attorney"),
            RoleFilter::Lender => write!(f, "lender"),
            RoleFilter::Consultant => write!(f, "consultant"),
            RoleFilter::Partner => write!(f, "partner"),
            RoleFilter::Other => write!(f, "other"),
            RoleFilter::All => write!(f, "all"),
        }
    }
}
