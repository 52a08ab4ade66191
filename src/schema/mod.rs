//! JSON schema validation and entity scaffolding

pub mod registry;
pub mod template;
pub mod validator;
