use bevy::{math::EulerRot, prelude::*};
use serde::{Deserialize, Serialize};

/// Pitch/yaw/roll rotation in degrees.
///
/// Y is up. Yaw turns about +Y, pitch about the local X axis (negative pitch
/// looks down) and the zero rotation faces -Z.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, Reflect)]
#[serde(default)]
pub struct Rotator {
    pub pitch: f32,
    pub yaw: f32,
    pub roll: f32,
}

impl Rotator {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(pitch: f32, yaw: f32, roll: f32) -> Self {
        Self { pitch, yaw, roll }
    }

    /// The same rotation with pitch and roll dropped.
    pub const fn yaw_only(self) -> Self {
        Self::new(0.0, self.yaw, 0.0)
    }

    pub fn is_finite(self) -> bool {
        self.pitch.is_finite() && self.yaw.is_finite() && self.roll.is_finite()
    }

    pub fn to_quat(self) -> Quat {
        Quat::from_euler(
            EulerRot::YXZ,
            self.yaw.to_radians(),
            self.pitch.to_radians(),
            self.roll.to_radians(),
        )
    }

    pub fn from_quat(rotation: Quat) -> Self {
        let (yaw, pitch, roll) = rotation.to_euler(EulerRot::YXZ);
        Self::new(pitch.to_degrees(), yaw.to_degrees(), roll.to_degrees())
    }

    /// Unit vector the rotation faces.
    pub fn forward(self) -> Vec3 {
        self.to_quat() * Vec3::NEG_Z
    }

    /// Unit vector to the right of [`Self::forward`].
    pub fn right(self) -> Vec3 {
        self.to_quat() * Vec3::X
    }
}
