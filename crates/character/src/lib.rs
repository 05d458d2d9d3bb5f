//! Top-down player character.
//!
//! A [`TopDownCharacter`] entity owns a camera boom with a camera and reacts
//! to eight input actions through `bevy_enhanced_input`. Movement and camera
//! control have real effects; the remaining actions are placeholders that
//! only log.
//!
//! # Example
//! ```no_run
//! use bevy::prelude::*;
//! use character::prelude::*;
//!
//! App::new()
//!     .add_plugins((DefaultPlugins, TopDownCharacterPlugin))
//!     .add_systems(Startup, |mut commands: Commands| {
//!         commands.spawn((
//!             TopDownCharacter,
//!             Controller::local_player(),
//!             CharacterInputConfig::new(InputMappingContext::top_down(), ActionHandles::all()),
//!         ));
//!     })
//!     .run();
//! ```

use bevy::prelude::*;
use bevy::transform::TransformSystems;
use bevy_enhanced_input::prelude::*;

pub mod actions;
pub mod camera;
pub mod components;
pub mod error;
pub mod gameplay;
mod input;
pub mod mapping;
pub mod movement;
pub mod rotator;
pub mod settings;
pub mod subsystem;
#[cfg(test)]
mod test_support;

use actions::{Attack, Dodge, HeavyAttack, Interact, PauseMenu, UseItem};
use components::{CameraBoom, CharacterParts, TopDownCamera, TopDownCharacter};
use movement::CharacterMovement;
use settings::CharacterSettings;
use subsystem::InputSubsystem;

pub const LOG_CHARACTER: &str = "character";

pub mod prelude {
    pub use crate::TopDownCharacterPlugin;
    pub use crate::components::{
        ActionHandle, ActionHandles, CameraBoom, CharacterInputConfig, CharacterParts, Controller,
        ControllerKind, TopDownCamera, TopDownCharacter,
    };
    pub use crate::mapping::{BindingSpec, CharacterAction, InputMappingContext};
    pub use crate::movement::CharacterMovement;
    pub use crate::rotator::Rotator;
    pub use crate::settings::CharacterSettings;
    pub use crate::subsystem::InputSubsystem;
}

/// Registers the character's input context, handlers and per-frame systems.
///
/// Insert a [`CharacterSettings`] resource before adding the plugin to
/// override the defaults.
pub struct TopDownCharacterPlugin;

impl Plugin for TopDownCharacterPlugin {
    fn build(&self, app: &mut App) {
        if !app.is_plugin_added::<EnhancedInputPlugin>() {
            app.add_plugins(EnhancedInputPlugin);
        }

        app.add_input_context::<TopDownCharacter>()
            .init_resource::<CharacterSettings>()
            .init_resource::<InputSubsystem>()
            .register_type::<TopDownCharacter>()
            .register_type::<components::Controller>()
            .register_type::<CameraBoom>()
            .register_type::<TopDownCamera>()
            .register_type::<CharacterParts>()
            .register_type::<components::CharacterInputConfig>()
            .register_type::<CharacterMovement>()
            .register_type::<CharacterSettings>()
            // Spawn
            .add_observer(setup_character)
            .add_observer(input::possess_character)
            .add_observer(input::unpossess_character)
            .add_observer(input::unregister_mapping_context)
            // Handlers
            .add_observer(movement::move_character)
            .add_observer(camera::control_camera)
            .add_observer(gameplay::report_placeholder::<Interact>)
            .add_observer(gameplay::report_placeholder::<Attack>)
            .add_observer(gameplay::report_placeholder::<HeavyAttack>)
            .add_observer(gameplay::report_placeholder::<Dodge>)
            .add_observer(gameplay::report_placeholder::<UseItem>)
            .add_observer(gameplay::report_placeholder::<PauseMenu>)
            // Per frame
            .add_systems(Update, movement::integrate_movement)
            .add_systems(
                PostUpdate,
                camera::sync_camera_boom.before(TransformSystems::Propagate),
            );
    }
}

/// Configure movement and create the camera boom and camera of a new character.
fn setup_character(
    add: On<Add, TopDownCharacter>,
    mut commands: Commands,
    settings: Res<CharacterSettings>,
    mut characters: Query<(&mut CharacterMovement, &mut Transform)>,
) {
    let character = add.entity;
    if let Ok((mut movement, mut transform)) = characters.get_mut(character) {
        movement.apply_default_settings(&settings.movement);
        movement.begin_play(&mut transform);
    }

    let boom = CameraBoom::from(&settings.camera_boom);
    let camera_offset = camera::camera_offset(boom.target_arm_length);
    let camera_boom = commands
        .spawn((
            Name::new("Camera Boom"),
            boom,
            Transform::default(),
            Visibility::default(),
            ChildOf(character),
        ))
        .id();
    let camera = commands
        .spawn((
            Name::new("Top Down Camera"),
            TopDownCamera::default(),
            Camera3d::default(),
            Transform::from_translation(camera_offset),
            ChildOf(camera_boom),
        ))
        .id();

    commands
        .entity(character)
        .insert(CharacterParts::new(camera_boom, camera));
    debug!(target: LOG_CHARACTER, "Character {character} spawned with boom {camera_boom} and camera {camera}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::{CharacterAction, InputMappingContext};
    use crate::prelude::*;
    use crate::settings::MovementSettings;
    use crate::test_support::{press, test_app, test_app_with};
    use bevy::ecs::relationship::Relationship;
    use bevy::input::mouse::MouseMotion;
    use test_log::test;

    fn spawn_character(app: &mut App, bundle: impl Bundle) -> Entity {
        let entity = app.world_mut().spawn((TopDownCharacter, bundle)).id();
        app.update();
        entity
    }

    fn action_count(app: &mut App, character: Entity) -> usize {
        let mut query = app
            .world_mut()
            .query::<&ActionOf<TopDownCharacter>>();
        query
            .iter(app.world())
            .filter(|action_of| action_of.get() == character)
            .count()
    }

    fn binding_count<A: actions::CharacterInputAction>(app: &mut App) -> Option<usize> {
        let action = {
            let mut query = app
                .world_mut()
                .query_filtered::<Entity, With<Action<A>>>();
            query.iter(app.world()).next()?
        };
        let mut bindings = app.world_mut().query::<&BindingOf>();
        Some(
            bindings
                .iter(app.world())
                .filter(|binding_of| binding_of.get() == action)
                .count(),
        )
    }

    fn player_config() -> CharacterInputConfig {
        CharacterInputConfig::new(InputMappingContext::top_down(), ActionHandles::all())
    }

    fn translation(app: &App, entity: Entity) -> Vec3 {
        app.world().get::<Transform>(entity).unwrap().translation
    }

    fn run_frames(app: &mut App, frames: usize) {
        for _ in 0..frames {
            app.update();
        }
    }

    #[test]
    fn test_plugin_builds() {
        let app = test_app();
        assert!(app.world().contains_resource::<CharacterSettings>());
        assert!(app.world().contains_resource::<InputSubsystem>());
    }

    #[test]
    fn test_local_player_binds_every_action() {
        let mut app = test_app();
        let character = spawn_character(&mut app, (Controller::local_player(), player_config()));

        assert_eq!(action_count(&mut app, character), 8);
        // WASD plus both stick axes.
        assert_eq!(binding_count::<actions::Move>(&mut app), Some(6));
        assert_eq!(binding_count::<actions::CameraControl>(&mut app), Some(3));
        assert_eq!(binding_count::<actions::Interact>(&mut app), Some(2));
    }

    #[test]
    fn test_missing_handle_is_not_bound() {
        let mut app = test_app();
        let config = CharacterInputConfig::new(
            InputMappingContext::top_down(),
            ActionHandles::all().without(CharacterAction::Move),
        );
        let character = spawn_character(&mut app, (Controller::local_player(), config));

        assert_eq!(action_count(&mut app, character), 7);
        assert_eq!(binding_count::<actions::Move>(&mut app), None);
        assert_eq!(binding_count::<actions::Dodge>(&mut app), Some(2));
    }

    #[test]
    fn test_mapping_context_registers_at_priority_zero() {
        let mut app = test_app();
        let character = spawn_character(&mut app, (Controller::local_player(), player_config()));

        let subsystem = app.world().resource::<InputSubsystem>();
        let mapping = subsystem.get(character).unwrap();
        assert_eq!(mapping.name, "top_down");
        assert_eq!(mapping.priority, 0);

        app.world_mut().entity_mut(character).despawn();
        app.update();
        assert!(app.world().resource::<InputSubsystem>().is_empty());
    }

    #[test]
    fn test_without_mapping_context_actions_have_no_bindings() {
        let mut app = test_app();
        let config = CharacterInputConfig {
            mapping_context: None,
            actions: ActionHandles::all(),
        };
        let character = spawn_character(&mut app, (Controller::local_player(), config));

        assert!(app.world().resource::<InputSubsystem>().is_empty());
        assert_eq!(action_count(&mut app, character), 8);
        assert_eq!(binding_count::<actions::Attack>(&mut app), Some(0));
    }

    #[test]
    fn test_ai_and_unpossessed_characters_get_no_input() {
        let mut app = test_app();
        let ai = spawn_character(&mut app, (Controller::ai(), player_config()));
        let unpossessed = spawn_character(&mut app, player_config());

        assert_eq!(action_count(&mut app, ai), 0);
        assert_eq!(action_count(&mut app, unpossessed), 0);
        assert!(app.world().resource::<InputSubsystem>().is_empty());
    }

    #[test]
    fn test_possession_after_spawn_binds_once() {
        let mut app = test_app();
        let character = spawn_character(&mut app, player_config());
        assert_eq!(action_count(&mut app, character), 0);

        app.world_mut()
            .entity_mut(character)
            .insert(Controller::local_player());
        app.update();
        assert_eq!(action_count(&mut app, character), 8);
        assert!(
            app.world()
                .resource::<InputSubsystem>()
                .has_mapping_context(character)
        );

        // Possessing again keeps the existing actions.
        app.world_mut()
            .entity_mut(character)
            .insert(Controller::local_player());
        app.update();
        assert_eq!(action_count(&mut app, character), 8);
        assert_eq!(app.world().resource::<InputSubsystem>().len(), 1);
    }

    #[test]
    fn test_losing_local_control_releases_input() {
        let mut app = test_app();
        let character = spawn_character(&mut app, (Controller::local_player(), player_config()));
        assert_eq!(action_count(&mut app, character), 8);

        app.world_mut().entity_mut(character).insert(Controller::ai());
        app.update();
        assert_eq!(action_count(&mut app, character), 0);
        assert!(app.world().resource::<InputSubsystem>().is_empty());

        app.world_mut()
            .entity_mut(character)
            .insert(Controller::local_player());
        app.update();
        assert_eq!(action_count(&mut app, character), 8);

        app.world_mut().entity_mut(character).remove::<Controller>();
        app.update();
        assert_eq!(action_count(&mut app, character), 0);
        assert!(app.world().resource::<InputSubsystem>().is_empty());
    }

    #[test]
    fn test_spawn_creates_boom_and_camera() {
        let mut app = test_app();
        let character = spawn_character(&mut app, Transform::from_xyz(2.0, 1.0, -3.0));

        let parts = *app.world().get::<CharacterParts>(character).unwrap();
        let boom = app.world().get::<CameraBoom>(parts.camera_boom()).unwrap();
        assert_eq!(boom.rotation, Rotator::new(-60.0, 0.0, 0.0));
        assert_eq!(boom.target_arm_length, 8.0);
        assert_eq!(
            app.world().get::<ChildOf>(parts.camera_boom()).map(|c| c.parent()),
            Some(character)
        );
        assert_eq!(
            app.world().get::<ChildOf>(parts.camera()).map(|c| c.parent()),
            Some(parts.camera_boom())
        );
        assert!(app.world().get::<TopDownCamera>(parts.camera()).is_some());

        let movement = app.world().get::<CharacterMovement>(character).unwrap();
        assert_eq!(movement.plane_height(), Some(1.0));
        assert_eq!(movement.settings.rotation_rate.yaw, 640.0);
    }

    #[test]
    fn test_spawn_keeps_explicit_movement_settings() {
        let mut app = test_app();
        let custom = MovementSettings {
            max_walk_speed: 1.0,
            constrain_to_plane: false,
            ..default()
        };
        let character = spawn_character(&mut app, CharacterMovement::new(custom.clone()));

        let movement = app.world().get::<CharacterMovement>(character).unwrap();
        assert_eq!(movement.settings, custom);
        assert_eq!(movement.plane_height(), None);
    }

    #[test]
    fn test_camera_sits_behind_and_above_with_absolute_rotation() {
        let mut app = test_app();
        // Character turned away from the boom's yaw; the boom must not follow.
        let character = spawn_character(
            &mut app,
            Transform::from_xyz(0.0, 1.0, 0.0).with_rotation(Quat::from_rotation_y(1.0)),
        );
        app.update();

        let parts = *app.world().get::<CharacterParts>(character).unwrap();
        let boom = app
            .world()
            .get::<GlobalTransform>(parts.camera_boom())
            .unwrap();
        let expected = Rotator::new(-60.0, 0.0, 0.0).to_quat();
        assert!(boom.rotation().angle_between(expected) < 1e-4);

        let camera = app.world().get::<GlobalTransform>(parts.camera()).unwrap();
        let pitch = 60.0f32.to_radians();
        let expected = Vec3::new(0.0, 1.0 + 8.0 * pitch.sin(), 8.0 * pitch.cos());
        assert!(
            camera.translation().abs_diff_eq(expected, 1e-3),
            "camera at {}",
            camera.translation()
        );
    }

    #[test]
    fn test_settings_resource_overrides_defaults() {
        let mut settings = CharacterSettings::default();
        settings.camera_boom.target_arm_length = 12.0;
        let mut app = test_app_with(settings);

        let character = spawn_character(&mut app, ());
        let parts = *app.world().get::<CharacterParts>(character).unwrap();
        let boom = app.world().get::<CameraBoom>(parts.camera_boom()).unwrap();
        assert_eq!(boom.target_arm_length, 12.0);
    }

    #[test]
    fn test_d_moves_right_and_w_moves_forward() {
        let mut app = test_app();
        let right = spawn_character(
            &mut app,
            (
                Controller::local_player(),
                player_config(),
                Transform::from_xyz(0.0, 0.9, 0.0),
            ),
        );
        press(&mut app, KeyCode::KeyD);
        run_frames(&mut app, 3);

        let position = translation(&app, right);
        assert!(position.x > 0.0, "moved to {position}");
        assert!(position.z.abs() < 1e-4, "moved to {position}");
        assert_eq!(position.y, 0.9);

        let mut app = test_app();
        let forward = spawn_character(&mut app, (Controller::local_player(), player_config()));
        press(&mut app, KeyCode::KeyW);
        run_frames(&mut app, 3);

        let position = translation(&app, forward);
        assert!(position.z < 0.0, "moved to {position}");
        assert!(position.x.abs() < 1e-4, "moved to {position}");
    }

    #[test]
    fn test_unbound_move_leaves_character_in_place() {
        let mut app = test_app();
        let config = CharacterInputConfig::new(
            InputMappingContext::top_down(),
            ActionHandles::all().without(CharacterAction::Move),
        );
        let character = spawn_character(
            &mut app,
            (
                Controller::local_player(),
                config,
                Transform::from_xyz(1.0, 0.5, 2.0),
            ),
        );

        press(&mut app, KeyCode::KeyW);
        run_frames(&mut app, 3);

        let transform = app.world().get::<Transform>(character).unwrap();
        assert_eq!(transform.translation, Vec3::new(1.0, 0.5, 2.0));
        assert_eq!(transform.rotation, Quat::IDENTITY);
    }

    #[test]
    fn test_mouse_motion_rotates_boom_within_pitch_range() {
        let mut app = test_app();
        let character = spawn_character(&mut app, (Controller::local_player(), player_config()));

        app.world_mut().write_message(MouseMotion {
            delta: Vec2::new(5.0, 100.0),
        });
        app.update();

        let parts = *app.world().get::<CharacterParts>(character).unwrap();
        let boom = app.world().get::<CameraBoom>(parts.camera_boom()).unwrap();
        assert_eq!(boom.rotation.yaw, 10.0);
        assert_eq!(boom.rotation.pitch, -20.0);
    }
}
