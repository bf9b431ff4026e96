pub mod app_states;
pub mod constants;
pub mod maps;
mod render;
pub mod system_sets;

use crate::prelude::*;
use crate::settings;
use bevy::{
    prelude::*,
    window::WindowResolution,
    winit::{UpdateMode, WinitSettings},
};
use bevy_framepace::{FramepacePlugin, FramepaceSettings};
use std::{process::ExitCode, time::Duration};
use system_sets::*;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

pub fn run_bevy_app() -> ExitCode {
    // Install the custom log subscriber (must come BEFORE Bevy app launch!)
    //  to change the default Bevy log format.
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_ansi(true) // colored output like Bevy default
                .with_level(true)
                .with_target(true)
                // Use chrono for timestamp, format with NO milliseconds
                .with_timer(fmt::time::ChronoLocal::new("%Y-%m-%d %H:%M:%s".into()))
                .compact(), // Looks a lot like Bevy default (use .pretty() for multiline pretty logs)
        )
        .with(EnvFilter::from_default_env())
        .init();

    log_appstate_change("LoadStartupFiles");

    // Read settings.toml before the App is built: the window's initial
    // resolution and the framepace limiter are both set while building
    // plugins, before any Startup system could apply them from a resource.
    let startup_settings = settings::load_from_file();

    let result = App::new()
        .insert_resource(WinitSettings {
            focused_mode: UpdateMode::reactive(Duration::from_secs_f64(1.0 / 244.0)),
            unfocused_mode: UpdateMode::reactive_low_power(Duration::from_secs_f64(1.0 / 60.0)),
        })
        .add_plugins(
            DefaultPlugins
                .build()
                .disable::<bevy::log::LogPlugin>()
                .set(ImagePlugin::default_linear())
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Tile Grid".to_string(),
                        resizable: true,
                        resolution: WindowResolution::new(
                            startup_settings.window.width,
                            startup_settings.window.height,
                        ),
                        resize_constraints: WindowResizeConstraints {
                            min_width: 320.0,
                            min_height: 240.0,
                            ..Default::default()
                        },
                        ..Default::default()
                    }),
                    ..Default::default()
                }),
        )
        .add_plugins(FramepacePlugin)
        .insert_resource(FramepaceSettings::default().with_framerate(1000.0 / startup_settings.render_sync.frame_budget_ms as f64))
        .init_state::<AppState>()
        .insert_state(AppState::LoadStartupFiles)
        .add_plugins((
            settings::SettingsPlugin { registered_by: "Core", settings: startup_settings },
            maps::MapsPlugin { registered_by: "Core" },
            render::RenderPlugin { registered_by: "Core" },
        ))
        .configure_sets(
            Startup,
            (
                StartupSysSet::LoadMap,
                StartupSysSet::SpawnCamera,
                StartupSysSet::SpawnLandChunks,
                StartupSysSet::SetupOverlays,
                StartupSysSet::EnterGame,
            )
                .chain(),
        )
        .add_systems(Startup, sys_enter_game.in_set(StartupSysSet::EnterGame))
        .run();

    match result {
        AppExit::Success => ExitCode::SUCCESS,
        AppExit::Error(value) => ExitCode::from(value.get()),
    }
}

fn sys_enter_game(mut next_state: ResMut<NextState<AppState>>) {
    log_appstate_change("InGame");
    next_state.set(AppState::InGame);
}
