use bevy::prelude::*;

/// A mapping context registered for a context entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredMapping {
    pub context: Entity,
    pub name: String,
    pub priority: i32,
}

/// Mapping contexts active for the local player.
///
/// Entries are ordered by descending priority; equal priorities keep their
/// registration order.
#[derive(Resource, Debug, Default)]
pub struct InputSubsystem {
    mappings: Vec<RegisteredMapping>,
}

impl InputSubsystem {
    /// Register `name` for `context`, replacing an earlier registration of
    /// the same entity.
    pub fn add_mapping_context(&mut self, context: Entity, name: impl Into<String>, priority: i32) {
        self.remove_mapping_context(context);
        let index = self
            .mappings
            .iter()
            .position(|mapping| mapping.priority < priority)
            .unwrap_or(self.mappings.len());
        self.mappings.insert(
            index,
            RegisteredMapping {
                context,
                name: name.into(),
                priority,
            },
        );
    }

    /// Returns the removed registration, if any.
    pub fn remove_mapping_context(&mut self, context: Entity) -> Option<RegisteredMapping> {
        let index = self
            .mappings
            .iter()
            .position(|mapping| mapping.context == context)?;
        Some(self.mappings.remove(index))
    }

    pub fn has_mapping_context(&self, context: Entity) -> bool {
        self.get(context).is_some()
    }

    pub fn get(&self, context: Entity) -> Option<&RegisteredMapping> {
        self.mappings
            .iter()
            .find(|mapping| mapping.context == context)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegisteredMapping> {
        self.mappings.iter()
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}
