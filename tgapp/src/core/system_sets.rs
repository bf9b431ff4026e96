use bevy::ecs::schedule::SystemSet;

#[derive(SystemSet, Debug, Clone, Hash, PartialEq, Eq)]
pub enum StartupSysSet {
    LoadMap,
    SpawnCamera,
    SpawnLandChunks,
    SetupOverlays,
    EnterGame,
}

#[derive(SystemSet, Debug, Clone, Hash, PartialEq, Eq)]
pub enum SceneRenderSysSet {
    SyncLandChunks,
    RenderLandChunks,
}
