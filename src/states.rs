use bevy::prelude::*;

#[derive(States, Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum AppState {
    #[default]
    Running,
    Paused,
}

impl AppState {
    pub fn from_paused(paused: bool) -> Self {
        if paused {
            AppState::Paused
        } else {
            AppState::Running
        }
    }
}
