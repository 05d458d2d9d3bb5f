//! Mapping contexts: data assets that map raw inputs to the character's actions.
//!
//! A context is plain data so it can live in a RON file next to the other
//! game assets. [`InputMappingContext::resolve`] turns the descriptors into
//! `bevy_enhanced_input` bindings; spawning them is left to the input layer.

use crate::error::{LoadError, MappingError, read_ron};
use bevy::prelude::*;
use bevy_enhanced_input::binding::{Binding, mod_keys::ModKeys};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// The eight actions a top-down character reacts to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Reflect,
)]
pub enum CharacterAction {
    Move,
    CameraControl,
    Interact,
    Attack,
    HeavyAttack,
    Dodge,
    UseItem,
    PauseMenu,
}

impl CharacterAction {
    pub const ALL: [CharacterAction; 8] = [
        Self::Move,
        Self::CameraControl,
        Self::Interact,
        Self::Attack,
        Self::HeavyAttack,
        Self::Dodge,
        Self::UseItem,
        Self::PauseMenu,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Move => "Move",
            Self::CameraControl => "Camera Control",
            Self::Interact => "Interact",
            Self::Attack => "Attack",
            Self::HeavyAttack => "Heavy Attack",
            Self::Dodge => "Dodge",
            Self::UseItem => "Use Item",
            Self::PauseMenu => "Pause Menu",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Reflect)]
pub enum Stick {
    Left,
    Right,
}

/// One input source of an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Reflect)]
pub enum BindingSpec {
    Key(String),
    MouseButton(String),
    GamepadButton(String),
    /// Four keys forming a 2D axis; north is +Y, east is +X.
    Cardinal {
        north: String,
        east: String,
        south: String,
        west: String,
    },
    Stick(Stick),
    MouseMotion,
}

/// How a resolved binding feeds its action's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisRole {
    /// The raw value, on the X axis for 2D actions.
    Direct,
    /// Swizzled onto +Y.
    PositiveY,
    /// Swizzled onto Y and negated.
    NegativeY,
    /// Negated on X.
    NegativeX,
}

#[derive(Debug, Clone)]
pub struct ResolvedBinding {
    pub binding: Binding,
    pub role: AxisRole,
}

impl ResolvedBinding {
    fn direct(binding: Binding) -> Self {
        Self {
            binding,
            role: AxisRole::Direct,
        }
    }
}

impl BindingSpec {
    pub fn resolve(&self) -> Result<Vec<ResolvedBinding>, MappingError> {
        let bindings = match self {
            Self::Key(key) => vec![ResolvedBinding::direct(keyboard(key)?)],
            Self::MouseButton(button) => {
                let button = mouse_button_from_str(button)
                    .ok_or_else(|| MappingError::UnsupportedMouseButton(button.clone()))?;
                vec![ResolvedBinding::direct(Binding::MouseButton {
                    button,
                    mod_keys: ModKeys::empty(),
                })]
            }
            Self::GamepadButton(button) => {
                let button = gamepad_button_from_str(button)
                    .ok_or_else(|| MappingError::UnsupportedGamepadButton(button.clone()))?;
                vec![ResolvedBinding::direct(Binding::GamepadButton(button))]
            }
            Self::Cardinal {
                north,
                east,
                south,
                west,
            } => vec![
                ResolvedBinding {
                    binding: keyboard(north)?,
                    role: AxisRole::PositiveY,
                },
                ResolvedBinding::direct(keyboard(east)?),
                ResolvedBinding {
                    binding: keyboard(south)?,
                    role: AxisRole::NegativeY,
                },
                ResolvedBinding {
                    binding: keyboard(west)?,
                    role: AxisRole::NegativeX,
                },
            ],
            Self::Stick(stick) => {
                let (x, y) = match stick {
                    Stick::Left => (GamepadAxis::LeftStickX, GamepadAxis::LeftStickY),
                    Stick::Right => (GamepadAxis::RightStickX, GamepadAxis::RightStickY),
                };
                vec![
                    ResolvedBinding::direct(Binding::GamepadAxis(x)),
                    ResolvedBinding {
                        binding: Binding::GamepadAxis(y),
                        role: AxisRole::PositiveY,
                    },
                ]
            }
            Self::MouseMotion => vec![ResolvedBinding::direct(Binding::MouseMotion {
                mod_keys: ModKeys::empty(),
            })],
        };
        Ok(bindings)
    }
}

/// Raw inputs for each action, plus the priority the context registers with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Reflect)]
pub struct InputMappingContext {
    pub name: String,
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub bindings: BTreeMap<CharacterAction, Vec<BindingSpec>>,
}

impl InputMappingContext {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        read_ron(path.as_ref())
    }

    pub fn bindings_for(&self, action: CharacterAction) -> &[BindingSpec] {
        self.bindings
            .get(&action)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Resolve every binding of `action`, failing on the first unknown input.
    pub fn resolve(&self, action: CharacterAction) -> Result<Vec<ResolvedBinding>, MappingError> {
        let mut resolved = Vec::new();
        for spec in self.bindings_for(action) {
            resolved.extend(spec.resolve()?);
        }
        Ok(resolved)
    }

    /// Keyboard/mouse and gamepad layout for a top-down action game.
    pub fn top_down() -> Self {
        let key = |name: &str| BindingSpec::Key(name.into());
        let pad = |name: &str| BindingSpec::GamepadButton(name.into());
        let mouse = |name: &str| BindingSpec::MouseButton(name.into());
        let bindings = BTreeMap::from([
            (
                CharacterAction::Move,
                vec![
                    BindingSpec::Cardinal {
                        north: "w".into(),
                        east: "d".into(),
                        south: "s".into(),
                        west: "a".into(),
                    },
                    BindingSpec::Stick(Stick::Left),
                ],
            ),
            (
                CharacterAction::CameraControl,
                vec![BindingSpec::MouseMotion, BindingSpec::Stick(Stick::Right)],
            ),
            (CharacterAction::Interact, vec![key("e"), pad("west")]),
            (
                CharacterAction::Attack,
                vec![mouse("left"), pad("right_trigger")],
            ),
            (
                CharacterAction::HeavyAttack,
                vec![mouse("right"), pad("right_trigger2")],
            ),
            (CharacterAction::Dodge, vec![key("space"), pad("east")]),
            (CharacterAction::UseItem, vec![key("q"), pad("north")]),
            (CharacterAction::PauseMenu, vec![key("escape"), pad("start")]),
        ]);

        Self {
            name: "top_down".into(),
            priority: 0,
            bindings,
        }
    }
}

fn keyboard(key: &str) -> Result<Binding, MappingError> {
    let key_code =
        keycode_from_str(key).ok_or_else(|| MappingError::UnsupportedKey(key.to_string()))?;
    Ok(Binding::Keyboard {
        key: key_code,
        mod_keys: ModKeys::empty(),
    })
}

fn keycode_from_str(key: &str) -> Option<KeyCode> {
    let key = key.to_ascii_lowercase();
    Some(match key.as_str() {
        "a" => KeyCode::KeyA,
        "b" => KeyCode::KeyB,
        "c" => KeyCode::KeyC,
        "d" => KeyCode::KeyD,
        "e" => KeyCode::KeyE,
        "f" => KeyCode::KeyF,
        "g" => KeyCode::KeyG,
        "h" => KeyCode::KeyH,
        "i" => KeyCode::KeyI,
        "j" => KeyCode::KeyJ,
        "k" => KeyCode::KeyK,
        "l" => KeyCode::KeyL,
        "m" => KeyCode::KeyM,
        "n" => KeyCode::KeyN,
        "o" => KeyCode::KeyO,
        "p" => KeyCode::KeyP,
        "q" => KeyCode::KeyQ,
        "r" => KeyCode::KeyR,
        "s" => KeyCode::KeyS,
        "t" => KeyCode::KeyT,
        "u" => KeyCode::KeyU,
        "v" => KeyCode::KeyV,
        "w" => KeyCode::KeyW,
        "x" => KeyCode::KeyX,
        "y" => KeyCode::KeyY,
        "z" => KeyCode::KeyZ,

        "0" => KeyCode::Digit0,
        "1" => KeyCode::Digit1,
        "2" => KeyCode::Digit2,
        "3" => KeyCode::Digit3,
        "4" => KeyCode::Digit4,
        "5" => KeyCode::Digit5,
        "6" => KeyCode::Digit6,
        "7" => KeyCode::Digit7,
        "8" => KeyCode::Digit8,
        "9" => KeyCode::Digit9,

        "f1" => KeyCode::F1,
        "f2" => KeyCode::F2,
        "f3" => KeyCode::F3,
        "f4" => KeyCode::F4,
        "f5" => KeyCode::F5,
        "f6" => KeyCode::F6,
        "f7" => KeyCode::F7,
        "f8" => KeyCode::F8,
        "f9" => KeyCode::F9,
        "f10" => KeyCode::F10,
        "f11" => KeyCode::F11,
        "f12" => KeyCode::F12,

        "escape" => KeyCode::Escape,
        "space" => KeyCode::Space,
        "enter" => KeyCode::Enter,
        "tab" => KeyCode::Tab,
        "backspace" => KeyCode::Backspace,

        "up" | "arrowup" => KeyCode::ArrowUp,
        "down" | "arrowdown" => KeyCode::ArrowDown,
        "left" | "arrowleft" => KeyCode::ArrowLeft,
        "right" | "arrowright" => KeyCode::ArrowRight,

        "shift" | "shiftleft" => KeyCode::ShiftLeft,
        "shiftright" => KeyCode::ShiftRight,
        "ctrl" | "controlleft" => KeyCode::ControlLeft,
        "controlright" => KeyCode::ControlRight,
        "alt" | "altleft" => KeyCode::AltLeft,
        "altright" => KeyCode::AltRight,
        _ => return None,
    })
}

fn mouse_button_from_str(button: &str) -> Option<MouseButton> {
    Some(match button.to_ascii_lowercase().as_str() {
        "left" => MouseButton::Left,
        "right" => MouseButton::Right,
        "middle" => MouseButton::Middle,
        "back" => MouseButton::Back,
        "forward" => MouseButton::Forward,
        _ => return None,
    })
}

fn gamepad_button_from_str(button: &str) -> Option<GamepadButton> {
    Some(match button.to_ascii_lowercase().as_str() {
        "south" | "a" => GamepadButton::South,
        "east" | "b" => GamepadButton::East,
        "north" | "y" => GamepadButton::North,
        "west" | "x" => GamepadButton::West,
        "left_trigger" | "lb" => GamepadButton::LeftTrigger,
        "left_trigger2" | "lt" => GamepadButton::LeftTrigger2,
        "right_trigger" | "rb" => GamepadButton::RightTrigger,
        "right_trigger2" | "rt" => GamepadButton::RightTrigger2,
        "select" | "back" => GamepadButton::Select,
        "start" => GamepadButton::Start,
        "dpad_up" => GamepadButton::DPadUp,
        "dpad_down" => GamepadButton::DPadDown,
        "dpad_left" => GamepadButton::DPadLeft,
        "dpad_right" => GamepadButton::DPadRight,
        _ => return None,
    })
}
