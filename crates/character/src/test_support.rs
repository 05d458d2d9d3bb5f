//! Shared helpers for app-level tests.

use crate::settings::CharacterSettings;
use crate::{LOG_CHARACTER, TopDownCharacterPlugin};
use bevy::ecs::schedule::{ExecutorKind, ScheduleLabel};
use bevy::input::InputPlugin;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use bevy::transform::TransformPlugin;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::field::{Field, Visit};
use tracing_subscriber::{Layer, layer::Context};

pub(crate) const FRAME: Duration = Duration::from_millis(100);

pub(crate) fn test_app() -> App {
    test_app_with(CharacterSettings::default())
}

/// Headless app with the character plugin, ready for spawning.
///
/// Schedules run on the test thread so thread-local subscribers see the
/// logs of observers, and every frame advances time by [`FRAME`].
pub(crate) fn test_app_with(settings: CharacterSettings) -> App {
    let mut app = App::new();
    app.insert_resource(settings)
        .add_plugins((MinimalPlugins, InputPlugin, TransformPlugin))
        .add_plugins(TopDownCharacterPlugin)
        .insert_resource(TimeUpdateStrategy::ManualDuration(FRAME));
    run_on_test_thread(&mut app, PreUpdate);
    run_on_test_thread(&mut app, Update);
    run_on_test_thread(&mut app, PostUpdate);
    // Enhanced input creates its context resources in `finish`.
    app.finish();
    app.cleanup();
    app
}

fn run_on_test_thread(app: &mut App, label: impl ScheduleLabel) {
    app.edit_schedule(label, |schedule| {
        schedule.set_executor_kind(ExecutorKind::SingleThreaded);
    });
}

pub(crate) fn press(app: &mut App, key: KeyCode) {
    app.world_mut()
        .resource_mut::<ButtonInput<KeyCode>>()
        .press(key);
}

pub(crate) fn release(app: &mut App, key: KeyCode) {
    app.world_mut()
        .resource_mut::<ButtonInput<KeyCode>>()
        .release(key);
}

/// Keeps the messages of events logged to the character target.
#[derive(Clone, Default)]
pub(crate) struct Capture {
    messages: Arc<Mutex<Vec<String>>>,
}

impl Capture {
    pub(crate) fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }

    pub(crate) fn count(&self, message: &str) -> usize {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .filter(|logged| logged.as_str() == message)
            .count()
    }
}

struct MessageVisitor<'a>(&'a mut String);

impl Visit for MessageVisitor<'_> {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            *self.0 = format!("{value:?}");
        }
    }
}

impl<S: tracing::Subscriber> Layer<S> for Capture {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        if event.metadata().target() != LOG_CHARACTER {
            return;
        }
        let mut message = String::new();
        event.record(&mut MessageVisitor(&mut message));
        self.messages.lock().unwrap().push(message);
    }
}
