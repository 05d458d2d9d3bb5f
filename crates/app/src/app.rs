use bevy::{log::LogPlugin, prelude::*};
use std::path::{Path, PathBuf};
use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{filter::filter_fn, fmt, prelude::*};

const APP_ID: &str = "night_fisherman";
const STUDIO: &str = "chicken105";
const WINDOW_TITLE: &str = "Night Fisherman";

pub const LOG_MAIN: &str = "main";
pub const LOG_SETTINGS: &str = "settings";

/// On-disk locations used by the game.
///
/// Debug builds keep everything under `.out/` in the workspace so runs never
/// touch the user's data directory.
#[derive(Resource, Debug, Clone)]
pub struct AppPaths {
    base: PathBuf,
}

impl AppPaths {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// Resolve the base path for the current build profile.
    pub fn detect() -> Self {
        #[cfg(debug_assertions)]
        {
            Self::new(
                PathBuf::from(env!("CARGO_MANIFEST_DIR"))
                    .join("..")
                    .join("..")
                    .join(".out"),
            )
        }

        #[cfg(not(debug_assertions))]
        {
            let base = dirs::data_local_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join(STUDIO)
                .join(APP_ID);
            Self::new(base)
        }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.base.join("logs")
    }

    pub fn settings_dir(&self) -> PathBuf {
        self.base.join("settings")
    }

    pub fn settings_file(&self, name: &str) -> PathBuf {
        self.settings_dir().join(name)
    }

    /// Timestamped log file name, e.g. `night_fisherman.20250101-120000.log`.
    pub fn log_file_name(timestamp: &str) -> String {
        format!("{APP_ID}.{timestamp}.log")
    }
}

/// Keeps the non-blocking log writer alive for the lifetime of the app.
struct LogGuard(#[allow(dead_code)] WorkerGuard);

/// Build the Bevy [`App`] with window, paths and logging configured.
pub fn init() -> App {
    let paths = AppPaths::detect();

    let mut app = App::new();
    app.add_plugins(
        DefaultPlugins
            .build()
            .disable::<LogPlugin>()
            .set(WindowPlugin {
                primary_window: Some(Window {
                    title: WINDOW_TITLE.to_string(),
                    ..default()
                }),
                ..default()
            }),
    );
    app.insert_resource(paths);

    // Logging must exist before any plugin of the game logs during Startup.
    setup_logging(app.world_mut());
    app
}

fn setup_logging(world: &mut World) {
    let paths = world.resource::<AppPaths>();
    let log_dir = paths.logs_dir();
    let timestamp = chrono::Local::now().format("%Y%m%d-%H%M%S").to_string();
    let log_filename = AppPaths::log_file_name(&timestamp);

    #[cfg(debug_assertions)]
    let level = LevelFilter::INFO;

    #[cfg(not(debug_assertions))]
    let level = LevelFilter::WARN;

    let console_layer = fmt::Layer::default()
        .with_target(true)
        .with_filter(filter_fn(move |metadata| metadata.level() <= &level));

    // Without a writable log directory the game still runs with console output.
    let file_layer = match std::fs::create_dir_all(&log_dir) {
        Ok(()) => {
            let file_appender = tracing_appender::rolling::never(&log_dir, &log_filename);
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            world.insert_non_send_resource(LogGuard(guard));
            Some(
                fmt::Layer::default()
                    .with_target(true)
                    .with_ansi(false)
                    .with_writer(non_blocking)
                    .with_filter(filter_fn(move |metadata| metadata.level() <= &level)),
            )
        }
        Err(err) => {
            eprintln!("could not create log directory {log_dir:?}: {err}");
            None
        }
    };

    if let Err(err) = tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .try_init()
    {
        eprintln!("logging already initialized: {err}");
        return;
    }

    info!(target: LOG_MAIN, "Logging to {:?}", log_dir.join(&log_filename));
}
