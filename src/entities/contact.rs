//! Contact entity type - people attached to deals

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::entity::Entity;
use crate::core::identity::EntityId;

/// Role a contact plays in a deal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[derive(Default)]
pub enum ContactRole {
    Broker,
    Seller,
    Buyer,
    Attorney,
    Lender,
    Consultant,
    Partner,
    #[default]
    Other,
}

impl ContactRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactRole::Broker => "broker",
            ContactRole::Seller => "seller",
            ContactRole::Buyer => "buyer",
            ContactRole::Attorney => "attorney",
            ContactRole::Lender => "lender",
            ContactRole::Consultant => "consultant",
            ContactRole::Partner => "partner",
            ContactRole::Other => "other",
        }
    }
}

impl std::fmt::Display for ContactRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ContactRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "broker" => Ok(ContactRole::Broker),
            "seller" => Ok(ContactRole::Seller),
            "buyer" => Ok(ContactRole::Buyer),
            "attorney" => Ok(ContactRole::Attorney),
            "lender" => Ok(ContactRole::Lender),
            "consultant" => Ok(ContactRole::Consultant),
            "partner" => Ok(ContactRole::Partner),
            "other" => Ok(ContactRole::Other),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

/// Links to other entities
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactLinks {
    /// Deals this contact is involved in
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub deals: Vec<EntityId>,
}

/// A person in the deal pipeline's orbit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    /// Unique identifier
    pub id: EntityId,

    /// Person's name
    pub title: String,

    /// Company or firm
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,

    /// Role in deals
    #[serde(default)]
    pub role: ContactRole,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    /// Free-form notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Tags for filtering
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    /// Links to other entities
    #[serde(default)]
    pub links: ContactLinks,

    /// Creation timestamp
    pub created: DateTime<Utc>,

    /// Author (who created this contact)
    pub author: String,

    /// Revision number
    #[serde(default = "default_revision")]
    pub revision: u32,
}

fn default_revision() -> u32 {
    1
}

impl Entity for Contact {
    const PREFIX: &'static str = "CON";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn status(&self) -> &str {
        self.role.as_str()
    }

    fn created(&self) -> DateTime<Utc> {
        self.created
    }

    fn author(&self) -> &str {
        &self.author
    }
}

impl Contact {
    /// Create a new contact with the given parameters
    pub fn new(name: String, author: String) -> Self {
        Self {
            id: EntityId::new(crate::core::EntityPrefix::Con),
            title: name,
            company: None,
            role: ContactRole::default(),
            email: None,
            phone: None,
            notes: None,
            tags: Vec::new(),
            links: ContactLinks::default(),
            created: Utc::now(),
            author,
            revision: 1,
        }
    }

    pub fn with_role(mut self, role: ContactRole) -> Self {
        self.role = role;
        self
    }

    pub fn with_company(mut self, company: &str) -> Self {
        self.company = Some(company.to_string());
        self
    }
}
