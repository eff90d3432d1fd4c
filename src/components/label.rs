use bevy_ecs::prelude::Component;

/// Human readable name used in diagnostics.
#[derive(Component, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Label(pub String);

impl Label {
    pub fn new(name: impl Into<String>) -> Self {
        Label(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}
