//! Gameplay actions without an implementation yet.
//!
//! Interact, attack, heavy attack, dodge, use item and the pause menu only
//! report that they fired. Each is the hook the real behavior plugs into.

use crate::LOG_CHARACTER;
use crate::actions::CharacterInputAction;
use crate::mapping::CharacterAction;
use bevy::prelude::*;
use bevy_enhanced_input::prelude::*;
use tracing::warn;

/// Observer reporting a started placeholder action.
pub(crate) fn report_placeholder<A: CharacterInputAction>(_trigger: On<Start<A>>) {
    log_placeholder(A::ACTION);
}

/// Emit the diagnostic line for `action`.
pub fn log_placeholder(action: CharacterAction) {
    warn!(target: LOG_CHARACTER, "{} action triggered!", action.label());
}
