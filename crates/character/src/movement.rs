//! Kinematic character movement.
//!
//! Handlers add movement input during `PreUpdate`; [`integrate_movement`]
//! consumes it once per frame.

use crate::actions::Move;
use crate::components::Controller;
use crate::rotator::Rotator;
use crate::settings::MovementSettings;
use bevy::prelude::*;
use bevy_enhanced_input::prelude::*;

/// Below this planar speed the character keeps its facing.
const MIN_ORIENT_SPEED_SQUARED: f32 = 1e-6;

#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct CharacterMovement {
    pub settings: MovementSettings,
    pub velocity: Vec3,
    pending_input: Vec3,
    plane_height: Option<f32>,
    /// Settings were chosen explicitly and win over [`CharacterSettings`].
    ///
    /// [`CharacterSettings`]: crate::settings::CharacterSettings
    explicit_settings: bool,
}

impl CharacterMovement {
    pub fn new(settings: MovementSettings) -> Self {
        Self {
            settings,
            explicit_settings: true,
            ..default()
        }
    }

    /// Take `defaults` unless the component was built with [`Self::new`].
    pub(crate) fn apply_default_settings(&mut self, defaults: &MovementSettings) {
        if !self.explicit_settings {
            self.settings = defaults.clone();
        }
    }

    /// Accumulate `direction * scale` into the input consumed next frame.
    pub fn add_movement_input(&mut self, direction: Vec3, scale: f32) {
        if scale != 0.0 {
            self.pending_input += direction * scale;
        }
    }

    pub fn pending_input(&self) -> Vec3 {
        self.pending_input
    }

    pub fn consume_input(&mut self) -> Vec3 {
        std::mem::take(&mut self.pending_input)
    }

    /// Height of the constraint plane once the character has started.
    pub fn plane_height(&self) -> Option<f32> {
        self.plane_height
    }

    /// Set up the plane constraint for a freshly spawned character.
    pub(crate) fn begin_play(&mut self, transform: &mut Transform) {
        if !self.settings.constrain_to_plane {
            return;
        }
        let height = self
            .settings
            .plane_height
            .unwrap_or(transform.translation.y);
        self.plane_height = Some(height);
        if self.settings.snap_to_plane_at_start {
            transform.translation.y = height;
        }
    }

    /// Turn pending input into velocity and move `transform` by `delta_secs`.
    pub fn step(&mut self, transform: &mut Transform, delta_secs: f32) {
        let mut input = self.consume_input();
        if self.settings.constrain_to_plane {
            input.y = 0.0;
        }
        self.velocity = input.clamp_length_max(1.0) * self.settings.max_walk_speed;
        transform.translation += self.velocity * delta_secs;

        if let Some(height) = self.plane_height {
            transform.translation.y = height;
        }

        let planar = Vec3::new(self.velocity.x, 0.0, self.velocity.z);
        if self.settings.orient_rotation_to_movement
            && planar.length_squared() > MIN_ORIENT_SPEED_SQUARED
        {
            let current = Rotator::from_quat(transform.rotation).yaw;
            let target = yaw_from_direction(planar);
            let max_step = self.settings.rotation_rate.yaw * delta_secs;
            let yaw = step_yaw_towards(current, target, max_step);
            transform.rotation = Quat::from_rotation_y(yaw.to_radians());
        }
    }
}

/// Forward and right vectors of `control_rotation`, ignoring pitch and roll.
pub fn movement_basis(control_rotation: Rotator) -> (Vec3, Vec3) {
    let yaw = control_rotation.yaw_only();
    (yaw.forward(), yaw.right())
}

/// Add a 2D move input: `y` along forward, `x` along right.
pub fn apply_move_input(movement: &mut CharacterMovement, control_rotation: Rotator, input: Vec2) {
    let (forward, right) = movement_basis(control_rotation);
    movement.add_movement_input(forward, input.y);
    movement.add_movement_input(right, input.x);
}

/// Yaw in degrees that faces along `direction` on the ground plane.
pub fn yaw_from_direction(direction: Vec3) -> f32 {
    (-direction.x).atan2(-direction.z).to_degrees()
}

/// Move `current` toward `target` by at most `max_step` degrees, the short way round.
pub fn step_yaw_towards(current: f32, target: f32, max_step: f32) -> f32 {
    let delta = normalize_degrees(target - current);
    if delta.abs() <= max_step {
        normalize_degrees(target)
    } else {
        normalize_degrees(current + max_step.copysign(delta))
    }
}

/// Map an angle to `[-180, 180)`.
fn normalize_degrees(angle: f32) -> f32 {
    (angle + 180.0).rem_euclid(360.0) - 180.0
}

pub(crate) fn move_character(
    movement: On<Fire<Move>>,
    mut characters: Query<(Option<&Controller>, &mut CharacterMovement)>,
) {
    let Ok((controller, mut character_movement)) = characters.get_mut(movement.context) else {
        return;
    };
    // Unpossessed characters ignore movement.
    let Some(controller) = controller else {
        return;
    };
    apply_move_input(
        &mut character_movement,
        controller.control_rotation,
        movement.value,
    );
}

pub(crate) fn integrate_movement(
    time: Res<Time>,
    mut characters: Query<(&mut CharacterMovement, &mut Transform)>,
) {
    let delta_secs = time.delta_secs();
    for (mut movement, mut transform) in &mut characters {
        movement.step(&mut transform, delta_secs);
    }
}
