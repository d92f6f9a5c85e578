use serde::{Deserialize, Serialize};

/// Manager contact for a store, keyed by store name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagerContact {
    pub store_name: String,
    pub manager_name: String,
    pub manager_email: String,
}

impl ManagerContact {
    pub fn new(
        store_name: impl Into<String>,
        manager_name: impl Into<String>,
        manager_email: impl Into<String>,
    ) -> Self {
        Self {
            store_name: store_name.into(),
            manager_name: manager_name.into(),
            manager_email: manager_email.into(),
        }
    }

    /// The e-mail address is not checked here; a bad address fails only its
    /// own delivery.
    pub fn validate(&self) -> Result<(), String> {
        if self.store_name.trim().is_empty() {
            return Err("store_name must not be empty".into());
        }
        if self.manager_name.trim().is_empty() {
            return Err(format!("store {} has no manager name", self.store_name));
        }
        if self.manager_email.trim().is_empty() {
            return Err(format!("store {} has no manager email", self.store_name));
        }
        Ok(())
    }
}
