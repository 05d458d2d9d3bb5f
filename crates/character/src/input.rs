//! Mapping-context registration and action binding on possession.

use crate::LOG_CHARACTER;
use crate::actions::{
    Attack, CameraControl, CharacterInputAction, Dodge, HeavyAttack, Interact, Move, PauseMenu,
    UseItem,
};
use crate::components::{CharacterInputConfig, Controller, TopDownCharacter};
use crate::mapping::{AxisRole, ResolvedBinding};
use crate::subsystem::InputSubsystem;
use bevy::ecs::relationship::RelatedSpawnerCommands;
use bevy::prelude::*;
use bevy_enhanced_input::prelude::*;
use tracing::warn;

/// Possession: bind the local player's input when a controller is inserted.
///
/// Registers the mapping context with the input subsystem and spawns an
/// action for every handle that is set. Actions are spawned once; inserting
/// a local-player controller again only refreshes the registration. A
/// controller that is not the local player releases both.
pub(crate) fn possess_character(
    insert: On<Insert, Controller>,
    mut commands: Commands,
    characters: Query<
        (&Controller, &CharacterInputConfig, Has<Actions<TopDownCharacter>>),
        With<TopDownCharacter>,
    >,
    mut subsystem: ResMut<InputSubsystem>,
) {
    let character = insert.entity;
    let Ok((controller, config, bound)) = characters.get(character) else {
        return;
    };

    if !controller.is_local_player() {
        subsystem.remove_mapping_context(character);
        if bound {
            commands
                .entity(character)
                .despawn_related::<Actions<TopDownCharacter>>();
        }
        return;
    }

    if let Some(context) = &config.mapping_context {
        subsystem.add_mapping_context(character, context.name.clone(), context.priority);
        info!(
            target: LOG_CHARACTER,
            "Registered mapping context {:?} for {} at priority {}",
            context.name,
            character,
            context.priority
        );
    }

    if !bound {
        setup_player_input(&mut commands, character, config);
    }
}

/// Release the input of a character that lost its controller.
pub(crate) fn unpossess_character(
    remove: On<Remove, Controller>,
    mut commands: Commands,
    characters: Query<(), With<TopDownCharacter>>,
    mut subsystem: ResMut<InputSubsystem>,
) {
    let character = remove.entity;
    if !characters.contains(character) {
        return;
    }
    subsystem.remove_mapping_context(character);
    // Also runs while the character is being despawned.
    commands
        .entity(character)
        .queue_silenced(|mut entity: EntityWorldMut| {
            entity.despawn_related::<Actions<TopDownCharacter>>();
        });
}

pub(crate) fn unregister_mapping_context(
    remove: On<Remove, TopDownCharacter>,
    mut subsystem: ResMut<InputSubsystem>,
) {
    subsystem.remove_mapping_context(remove.entity);
}

/// Spawn an action for every handle the character has set.
fn setup_player_input(commands: &mut Commands, character: Entity, config: &CharacterInputConfig) {
    commands
        .entity(character)
        .with_related_entities::<ActionOf<TopDownCharacter>>(|actions| {
            let bound = [
                bind_action::<Move>(actions, config),
                bind_action::<CameraControl>(actions, config),
                bind_action::<Interact>(actions, config),
                bind_action::<Attack>(actions, config),
                bind_action::<HeavyAttack>(actions, config),
                bind_action::<Dodge>(actions, config),
                bind_action::<UseItem>(actions, config),
                bind_action::<PauseMenu>(actions, config),
            ]
            .into_iter()
            .filter(|bound| *bound)
            .count();

            info!(target: LOG_CHARACTER, "Bound {bound} actions for {character}");
        });
}

/// Returns `false` when the handle for `A` is not set.
fn bind_action<A: CharacterInputAction>(
    actions: &mut RelatedSpawnerCommands<ActionOf<TopDownCharacter>>,
    config: &CharacterInputConfig,
) -> bool {
    let Some(handle) = config.actions.get(A::ACTION) else {
        return false;
    };

    let bindings = match &config.mapping_context {
        Some(context) => context.resolve(A::ACTION).unwrap_or_else(|err| {
            warn!(
                target: LOG_CHARACTER,
                "Mapping context {:?} has an invalid binding for {}: {err}",
                context.name,
                A::ACTION.label()
            );
            Vec::new()
        }),
        None => Vec::new(),
    };

    let mut action = actions.spawn((Name::new(handle.name.clone()), Action::<A>::new()));
    for resolved in bindings {
        spawn_binding(&mut action, resolved);
    }
    true
}

fn spawn_binding(action: &mut EntityCommands, resolved: ResolvedBinding) {
    let binding = resolved.binding;
    match resolved.role {
        AxisRole::Direct => action.with_related::<BindingOf>(binding),
        AxisRole::PositiveY => action.with_related::<BindingOf>((binding, SwizzleAxis::YXZ)),
        AxisRole::NegativeY => {
            action.with_related::<BindingOf>((binding, SwizzleAxis::YXZ, Negate::all()))
        }
        AxisRole::NegativeX => action.with_related::<BindingOf>((binding, Negate::all())),
    };
}
