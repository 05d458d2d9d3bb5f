//! Components making up a top-down character.
//!
//! The character entity is also the enhanced-input context: its actions are
//! spawned as related entities and despawn together with it.

use crate::mapping::{CharacterAction, InputMappingContext};
use crate::movement::CharacterMovement;
use crate::rotator::Rotator;
use crate::settings::CameraBoomSettings;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Marker for the top-down character and input context for its actions.
#[derive(Component, Debug, Default, Reflect)]
#[reflect(Component)]
#[require(Transform, Visibility, CharacterMovement, CharacterInputConfig)]
pub struct TopDownCharacter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum ControllerKind {
    LocalPlayer,
    Ai,
}

/// Whoever possesses the character. A character without one is unpossessed.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Controller {
    pub kind: ControllerKind,
    /// Aim of the controller, independent of the character's own rotation.
    pub control_rotation: Rotator,
}

impl Controller {
    pub fn local_player() -> Self {
        Self {
            kind: ControllerKind::LocalPlayer,
            control_rotation: Rotator::ZERO,
        }
    }

    pub fn ai() -> Self {
        Self {
            kind: ControllerKind::Ai,
            control_rotation: Rotator::ZERO,
        }
    }

    pub fn is_local_player(&self) -> bool {
        self.kind == ControllerKind::LocalPlayer
    }
}

/// Spring arm holding the camera at a fixed distance and angle.
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub struct CameraBoom {
    pub target_arm_length: f32,
    /// Rotation relative to the character, or in world space with
    /// `use_absolute_rotation`.
    pub rotation: Rotator,
    pub use_absolute_rotation: bool,
    /// Pull the camera in on collisions. Stored for tooling; no collision
    /// test is run.
    pub do_collision_test: bool,
}

impl From<&CameraBoomSettings> for CameraBoom {
    fn from(settings: &CameraBoomSettings) -> Self {
        Self {
            target_arm_length: settings.target_arm_length,
            rotation: settings.rotation,
            use_absolute_rotation: settings.use_absolute_rotation,
            do_collision_test: settings.do_collision_test,
        }
    }
}

#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct TopDownCamera {
    /// Follow the controller's rotation instead of the boom's.
    pub use_pawn_control_rotation: bool,
}

/// Sub-objects owned by a character, created when it spawns.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct CharacterParts {
    camera_boom: Entity,
    camera: Entity,
}

impl CharacterParts {
    pub(crate) fn new(camera_boom: Entity, camera: Entity) -> Self {
        Self {
            camera_boom,
            camera,
        }
    }

    pub fn camera_boom(&self) -> Entity {
        self.camera_boom
    }

    pub fn camera(&self) -> Entity {
        self.camera
    }
}

/// Reference to a named input action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Reflect)]
pub struct ActionHandle {
    pub name: String,
}

impl ActionHandle {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// The eight action slots of a character. Empty slots are never bound.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Reflect)]
#[serde(default)]
pub struct ActionHandles {
    pub move_action: Option<ActionHandle>,
    pub camera_control: Option<ActionHandle>,
    pub interact: Option<ActionHandle>,
    pub attack: Option<ActionHandle>,
    pub heavy_attack: Option<ActionHandle>,
    pub dodge: Option<ActionHandle>,
    pub use_item: Option<ActionHandle>,
    pub pause_menu: Option<ActionHandle>,
}

impl ActionHandles {
    /// Every slot filled, each handle named after its action.
    pub fn all() -> Self {
        let mut handles = Self::default();
        for action in CharacterAction::ALL {
            *handles.slot_mut(action) = Some(ActionHandle::new(action.label()));
        }
        handles
    }

    pub fn get(&self, action: CharacterAction) -> Option<&ActionHandle> {
        match action {
            CharacterAction::Move => self.move_action.as_ref(),
            CharacterAction::CameraControl => self.camera_control.as_ref(),
            CharacterAction::Interact => self.interact.as_ref(),
            CharacterAction::Attack => self.attack.as_ref(),
            CharacterAction::HeavyAttack => self.heavy_attack.as_ref(),
            CharacterAction::Dodge => self.dodge.as_ref(),
            CharacterAction::UseItem => self.use_item.as_ref(),
            CharacterAction::PauseMenu => self.pause_menu.as_ref(),
        }
    }

    pub fn slot_mut(&mut self, action: CharacterAction) -> &mut Option<ActionHandle> {
        match action {
            CharacterAction::Move => &mut self.move_action,
            CharacterAction::CameraControl => &mut self.camera_control,
            CharacterAction::Interact => &mut self.interact,
            CharacterAction::Attack => &mut self.attack,
            CharacterAction::HeavyAttack => &mut self.heavy_attack,
            CharacterAction::Dodge => &mut self.dodge,
            CharacterAction::UseItem => &mut self.use_item,
            CharacterAction::PauseMenu => &mut self.pause_menu,
        }
    }

    /// Remove the handle of `action`, leaving its slot empty.
    pub fn without(mut self, action: CharacterAction) -> Self {
        *self.slot_mut(action) = None;
        self
    }
}

/// Input assets assigned to a character before it spawns.
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct CharacterInputConfig {
    pub mapping_context: Option<InputMappingContext>,
    pub actions: ActionHandles,
}

impl CharacterInputConfig {
    pub fn new(mapping_context: InputMappingContext, actions: ActionHandles) -> Self {
        Self {
            mapping_context: Some(mapping_context),
            actions,
        }
    }
}
