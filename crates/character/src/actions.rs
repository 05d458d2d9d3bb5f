//! Input actions of the top-down character.

use crate::mapping::CharacterAction;
use bevy::prelude::*;
use bevy_enhanced_input::prelude::*;

/// Ties an enhanced-input action type to its [`CharacterAction`].
pub trait CharacterInputAction: InputAction {
    const ACTION: CharacterAction;
}

/// Planar movement relative to the controller's yaw
#[derive(Debug, InputAction)]
#[action_output(Vec2)]
pub struct Move;

/// Orbit and tilt the camera boom
#[derive(Debug, InputAction)]
#[action_output(Vec2)]
pub struct CameraControl;

#[derive(Debug, InputAction)]
#[action_output(bool)]
pub struct Interact;

#[derive(Debug, InputAction)]
#[action_output(bool)]
pub struct Attack;

#[derive(Debug, InputAction)]
#[action_output(bool)]
pub struct HeavyAttack;

#[derive(Debug, InputAction)]
#[action_output(bool)]
pub struct Dodge;

#[derive(Debug, InputAction)]
#[action_output(bool)]
pub struct UseItem;

/// Open the pause menu
#[derive(Debug, InputAction)]
#[action_output(bool)]
pub struct PauseMenu;

impl CharacterInputAction for Move {
    const ACTION: CharacterAction = CharacterAction::Move;
}

impl CharacterInputAction for CameraControl {
    const ACTION: CharacterAction = CharacterAction::CameraControl;
}

impl CharacterInputAction for Interact {
    const ACTION: CharacterAction = CharacterAction::Interact;
}

impl CharacterInputAction for Attack {
    const ACTION: CharacterAction = CharacterAction::Attack;
}

impl CharacterInputAction for HeavyAttack {
    const ACTION: CharacterAction = CharacterAction::HeavyAttack;
}

impl CharacterInputAction for Dodge {
    const ACTION: CharacterAction = CharacterAction::Dodge;
}

impl CharacterInputAction for UseItem {
    const ACTION: CharacterAction = CharacterAction::UseItem;
}

impl CharacterInputAction for PauseMenu {
    const ACTION: CharacterAction = CharacterAction::PauseMenu;
}
