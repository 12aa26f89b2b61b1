//! Customer domain model.

use serde::{Deserialize, Serialize};

use crate::schema::{PropValue, Properties};

/// A customer identified by a stable id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl Customer {
    pub fn properties(&self) -> Properties {
        Properties::from([
            ("id".to_string(), PropValue::from(self.id.as_str())),
            ("name".to_string(), PropValue::from(self.name.as_str())),
            ("email".to_string(), PropValue::from(self.email.as_str())),
        ])
    }
}
