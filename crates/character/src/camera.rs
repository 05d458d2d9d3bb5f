//! Camera boom control and placement.

use crate::actions::CameraControl;
use crate::components::{CameraBoom, CharacterParts, Controller, TopDownCamera};
use crate::rotator::Rotator;
use crate::settings::{CameraControlSettings, CharacterSettings};
use bevy::prelude::*;
use bevy_enhanced_input::prelude::*;

/// Rotate the boom by a 2D input: `x` turns yaw, `y` tilts pitch within the
/// configured range.
pub fn apply_camera_control(
    rotation: Rotator,
    input: Vec2,
    settings: &CameraControlSettings,
) -> Rotator {
    // f32::min/max skip a NaN operand, where f32::clamp would panic.
    let min_pitch = settings.min_pitch.min(settings.max_pitch);
    let max_pitch = settings.min_pitch.max(settings.max_pitch);

    Rotator {
        yaw: rotation.yaw + input.x * settings.yaw_speed,
        pitch: (rotation.pitch + input.y * settings.pitch_speed)
            .max(min_pitch)
            .min(max_pitch),
        ..rotation
    }
}

/// Local transform of the camera: `arm_length` behind the pivot along the boom.
pub fn camera_offset(arm_length: f32) -> Vec3 {
    Vec3::Z * arm_length
}

pub(crate) fn control_camera(
    camera_control: On<Fire<CameraControl>>,
    settings: Res<CharacterSettings>,
    characters: Query<&CharacterParts>,
    mut booms: Query<&mut CameraBoom>,
) {
    let Ok(parts) = characters.get(camera_control.context) else {
        return;
    };
    let Ok(mut boom) = booms.get_mut(parts.camera_boom()) else {
        return;
    };

    boom.rotation = apply_camera_control(
        boom.rotation,
        camera_control.value,
        &settings.camera_control,
    );
}

/// Write boom and camera local transforms from their components.
///
/// Runs before transform propagation so the camera follows in the same frame.
pub(crate) fn sync_camera_boom(
    characters: Query<(&Transform, &CharacterParts, Option<&Controller>), Without<CameraBoom>>,
    mut booms: Query<(&CameraBoom, &mut Transform), Without<TopDownCamera>>,
    mut cameras: Query<
        (&TopDownCamera, &mut Transform),
        (Without<CameraBoom>, Without<CharacterParts>),
    >,
) {
    for (character_transform, parts, controller) in &characters {
        let Ok((boom, mut boom_transform)) = booms.get_mut(parts.camera_boom()) else {
            continue;
        };

        let boom_rotation = boom.rotation.to_quat();
        let (local_rotation, world_rotation) = if boom.use_absolute_rotation {
            (
                character_transform.rotation.inverse() * boom_rotation,
                boom_rotation,
            )
        } else {
            (boom_rotation, character_transform.rotation * boom_rotation)
        };
        boom_transform.translation = Vec3::ZERO;
        boom_transform.rotation = local_rotation;

        let Ok((camera, mut camera_transform)) = cameras.get_mut(parts.camera()) else {
            continue;
        };
        camera_transform.translation = camera_offset(boom.target_arm_length);
        camera_transform.rotation = match controller {
            Some(controller) if camera.use_pawn_control_rotation => {
                world_rotation.inverse() * controller.control_rotation.to_quat()
            }
            _ => Quat::IDENTITY,
        };
    }
}
