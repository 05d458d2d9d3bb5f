mod level;

use app::{AppPaths, LOG_MAIN, LOG_SETTINGS};
use bevy::asset::io::file::FileAssetReader;
use bevy::prelude::*;
use bevy_enhanced_input::prelude::*;
use character::prelude::*;
use std::path::PathBuf;

use crate::level::LevelPlugin;

/// Mapping context shipped with the game, relative to the asset folder.
const MAPPING_CONTEXT_ASSET: &str = "input/top_down.ron";
const CHARACTER_SETTINGS_FILE: &str = "character.ron";

fn main() -> anyhow::Result<()> {
    let mut app = app::init();

    let paths = app.world().resource::<AppPaths>().clone();
    app.insert_resource(load_character_settings(&paths))
        .insert_resource(PlayerMapping(load_mapping_context()));

    // EnhancedInputPlugin before the character registers its input context
    app.add_plugins((EnhancedInputPlugin, TopDownCharacterPlugin, LevelPlugin));

    match app.run() {
        AppExit::Success => Ok(()),
        AppExit::Error(code) => anyhow::bail!("exited with code {code}"),
    }
}

/// Mapping context handed to the player character when the level spawns.
#[derive(Resource, Debug, Clone)]
pub struct PlayerMapping(pub InputMappingContext);

fn load_character_settings(paths: &AppPaths) -> CharacterSettings {
    let path = paths.settings_file(CHARACTER_SETTINGS_FILE);
    match CharacterSettings::load_or_default(&path) {
        Ok(settings) => {
            info!(target: LOG_SETTINGS, "Character settings from {path:?}");
            settings
        }
        Err(err) => {
            warn!(target: LOG_SETTINGS, "Using default character settings: {err}");
            CharacterSettings::default()
        }
    }
}

fn load_mapping_context() -> InputMappingContext {
    let path: PathBuf = FileAssetReader::get_base_path()
        .join("assets")
        .join(MAPPING_CONTEXT_ASSET);
    match InputMappingContext::load(&path) {
        Ok(context) => {
            info!(target: LOG_MAIN, "Loaded mapping context {:?} from {path:?}", context.name);
            context
        }
        Err(err) => {
            warn!(target: LOG_MAIN, "Falling back to built-in mapping context: {err}");
            InputMappingContext::top_down()
        }
    }
}
