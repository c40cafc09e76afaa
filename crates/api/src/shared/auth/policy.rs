/// A `Policy` decides which actions a chat user can take.
///
/// Every restricted `UseCase` lists the `Permission`s it requires, and the
/// request is rejected unless the `Policy` of the user allows all of them.
#[derive(Debug, Default)]
pub struct Policy {
    /// `Permission`s allowed by the `Policy`
    allow: Vec<Permission>,
}

impl Policy {
    /// Policy of the organizers listed in the configuration
    pub fn admin() -> Self {
        Self::allowing(vec![Permission::All])
    }

    pub fn allowing(allow: Vec<Permission>) -> Self {
        Self { allow }
    }

    /// The required `Permission`s this `Policy` does not allow
    pub fn missing(&self, permissions: &[Permission]) -> Vec<Permission> {
        if self.allow.contains(&Permission::All) {
            return Vec::new();
        }
        permissions
            .iter()
            .filter(|permission| !self.allow.contains(permission))
            .copied()
            .collect()
    }

    pub fn authorize(&self, permissions: &[Permission]) -> bool {
        self.missing(permissions).is_empty()
    }
}

/// `Permission` are different kind of actions that can be performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    All,
    CreateEvent,
    ListParticipants,
    DeletePastEvents,
}
