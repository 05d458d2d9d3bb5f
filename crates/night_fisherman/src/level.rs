//! Test level: a ground plane, a light, a few props and the player.

use app::LOG_MAIN;
use bevy::color::palettes::css::*;
use bevy::prelude::*;
use character::prelude::*;

use crate::PlayerMapping;

pub struct LevelPlugin;

impl Plugin for LevelPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, (spawn_level, spawn_player));
    }
}

fn spawn_level(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    // ground
    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(60.0, 60.0))),
        MeshMaterial3d(materials.add(Color::srgb(0.18, 0.32, 0.22))),
        Name::new("Ground"),
    ));

    commands.spawn((
        DirectionalLight {
            shadows_enabled: true,
            illuminance: 6_000.0,
            ..default()
        },
        Transform::from_xyz(-12.0, 18.0, 12.0).looking_at(Vec3::ZERO, Vec3::Y),
        Name::new("Sun"),
    ));

    let crate_mesh = meshes.add(Cuboid::new(1.0, 1.0, 1.0));
    let crate_material = materials.add(Color::srgb_u8(124, 144, 255));
    for (index, position) in [
        Vec3::new(4.0, 0.5, -3.0),
        Vec3::new(-6.0, 0.5, 2.0),
        Vec3::new(1.0, 0.5, 7.0),
    ]
    .into_iter()
    .enumerate()
    {
        commands.spawn((
            Mesh3d(crate_mesh.clone()),
            MeshMaterial3d(crate_material.clone()),
            Transform::from_translation(position),
            Name::new(format!("Crate {index}")),
        ));
    }
}

fn spawn_player(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mapping: Res<PlayerMapping>,
) {
    let player = commands
        .spawn((
            Name::new("Player"),
            TopDownCharacter,
            Controller::local_player(),
            CharacterInputConfig::new(mapping.0.clone(), ActionHandles::all()),
            Mesh3d(meshes.add(Capsule3d::new(0.4, 1.0))),
            MeshMaterial3d(materials.add(Color::srgb(ORANGE.red, ORANGE.green, ORANGE.blue))),
            Transform::from_xyz(0.0, 0.9, 0.0),
        ))
        .id();
    info!(target: LOG_MAIN, "Spawned player {player}");
}
