//! Tunables for the top-down character, loaded from a RON document.

use crate::error::{LoadError, read_ron};
use crate::rotator::Rotator;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Resource, Debug, Clone, Default, PartialEq, Serialize, Deserialize, Reflect)]
#[reflect(Resource)]
#[serde(default)]
pub struct CharacterSettings {
    pub movement: MovementSettings,
    pub camera_boom: CameraBoomSettings,
    pub camera_control: CameraControlSettings,
}

impl CharacterSettings {
    /// Load settings from `path`. Fields missing in the file keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let settings: Self = read_ron(path)?;
        match settings.invalid_field() {
            Some(field) => Err(LoadError::Invalid {
                path: path.to_path_buf(),
                field,
            }),
            None => Ok(settings),
        }
    }

    /// Like [`Self::load`], but a missing file yields the defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        match Self::load(path) {
            Err(LoadError::Io { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// First numeric field that is not a finite number, or out of range.
    pub fn invalid_field(&self) -> Option<&'static str> {
        let movement = &self.movement;
        let boom = &self.camera_boom;
        let control = &self.camera_control;
        [
            ("movement.rotation_rate", movement.rotation_rate.is_finite()),
            (
                "movement.max_walk_speed",
                movement.max_walk_speed.is_finite() && movement.max_walk_speed >= 0.0,
            ),
            (
                "movement.plane_height",
                movement.plane_height.is_none_or(f32::is_finite),
            ),
            (
                "camera_boom.target_arm_length",
                boom.target_arm_length.is_finite() && boom.target_arm_length >= 0.0,
            ),
            ("camera_boom.rotation", boom.rotation.is_finite()),
            ("camera_control.yaw_speed", control.yaw_speed.is_finite()),
            ("camera_control.pitch_speed", control.pitch_speed.is_finite()),
            ("camera_control.min_pitch", control.min_pitch.is_finite()),
            ("camera_control.max_pitch", control.max_pitch.is_finite()),
        ]
        .into_iter()
        .find_map(|(field, valid)| (!valid).then_some(field))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Reflect)]
#[serde(default)]
pub struct MovementSettings {
    /// Turn the character toward the direction it moves in.
    pub orient_rotation_to_movement: bool,
    /// Degrees per second.
    pub rotation_rate: Rotator,
    /// Units per second.
    pub max_walk_speed: f32,
    pub constrain_to_plane: bool,
    pub snap_to_plane_at_start: bool,
    /// Height of the constraint plane. `None` uses the spawn height.
    pub plane_height: Option<f32>,
}

impl Default for MovementSettings {
    fn default() -> Self {
        Self {
            orient_rotation_to_movement: true,
            rotation_rate: Rotator::new(0.0, 640.0, 0.0),
            max_walk_speed: 6.0,
            constrain_to_plane: true,
            snap_to_plane_at_start: true,
            plane_height: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Reflect)]
#[serde(default)]
pub struct CameraBoomSettings {
    pub target_arm_length: f32,
    pub rotation: Rotator,
    /// Keep the boom rotation independent of the character's rotation.
    pub use_absolute_rotation: bool,
    pub do_collision_test: bool,
}

impl Default for CameraBoomSettings {
    fn default() -> Self {
        Self {
            target_arm_length: 8.0,
            rotation: Rotator::new(-60.0, 0.0, 0.0),
            use_absolute_rotation: true,
            do_collision_test: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Reflect)]
#[serde(default)]
pub struct CameraControlSettings {
    /// Degrees of yaw per unit of horizontal input.
    pub yaw_speed: f32,
    /// Degrees of pitch per unit of vertical input.
    pub pitch_speed: f32,
    pub min_pitch: f32,
    pub max_pitch: f32,
}

impl Default for CameraControlSettings {
    fn default() -> Self {
        Self {
            yaw_speed: 2.0,
            pitch_speed: 2.0,
            min_pitch: -80.0,
            max_pitch: -20.0,
        }
    }
}
