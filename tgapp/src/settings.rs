//! Layered startup configuration (SPEC_FULL.md §10: "`tgapp` loads a
//! `settings.toml` at startup via `toml` + `serde`").
//!
//! Grounded on the teacher's `external_data/settings.rs`: a plain
//! `toml::from_str` load into a `Deserialize`d struct, inserted as a
//! resource so the rest of the app can read it. Unlike the teacher's
//! version, the window here is sized directly from the parsed settings
//! while the `App` is still being built (`core::run_bevy_app` reads the
//! file once, before `WindowPlugin` is configured), so there is no
//! separate `Startup` system re-applying the resolution afterwards.

use crate::prelude::*;
use bevy::prelude::*;
use serde::Deserialize;

const CONFIG_FILE_NAME: &str = "settings.toml";

#[derive(Clone, Debug, Deserialize, Resource)]
pub struct Settings {
    pub window: SectWindow,
    pub map: SectMap,
    pub render_sync: SectRenderSync,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SectWindow {
    pub width: f32,
    pub height: f32,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SectMap {
    /// Path to a PFMAP document to load at startup, relative to the working
    /// directory. Empty falls back to the procedurally generated demo
    /// terrain built by `core::maps::build_demo_map`.
    pub pfmap_path: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SectRenderSync {
    /// Target frame budget in milliseconds, applied to `bevy_framepace`'s
    /// limiter (SPEC_FULL.md §5's per-frame handshake).
    pub frame_budget_ms: f32,
    /// Size, in bytes, reserved up front for the per-frame render-command
    /// argument arena (SPEC_FULL.md §5/§9's bump allocator).
    pub bump_allocator_bytes: usize,
}

pub fn load_from_file() -> Settings {
    let contents = std::fs::read_to_string(CONFIG_FILE_NAME).expect("Failed to read settings file");
    toml::from_str(&contents).expect("Failed to parse settings TOML")
}

/// The per-frame render-command argument scratch buffer (SPEC_FULL.md
/// §5/§9's bump allocator), pre-reserved to `render_sync.bump_allocator_bytes`
/// up front rather than growing incrementally across a frame's commands.
#[derive(Resource)]
pub struct RenderArgArena(pub Vec<u8>);

/// Makes an already-loaded `Settings` value available to the rest of the app
/// as a resource. `run_bevy_app` constructs this with the settings it read
/// up front, since the window and framepace limiter both need the values
/// before any Bevy system can run.
pub struct SettingsPlugin {
    pub registered_by: &'static str,
    pub settings: Settings,
}
impl_tracked_plugin!(SettingsPlugin);

impl Plugin for SettingsPlugin {
    fn build(&self, app: &mut App) {
        log_plugin_build(self);
        logger::one(None, LogSev::Info, LogAbout::Startup, "Loaded settings.toml for global access.");
        app.insert_resource(RenderArgArena(Vec::with_capacity(self.settings.render_sync.bump_allocator_bytes)));
        app.insert_resource(self.settings.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_toml_parses() {
        let text = r#"
            [window]
            width = 1320.0
            height = 924.0

            [map]
            pfmap_path = ""

            [render_sync]
            frame_budget_ms = 16.6
            bump_allocator_bytes = 65536
        "#;
        let settings: Settings = toml::from_str(text).unwrap();
        assert_eq!(settings.window.width, 1320.0);
        assert_eq!(settings.map.pfmap_path, "");
        assert_eq!(settings.render_sync.bump_allocator_bytes, 65536);
    }
}
