//! Handlers for simulation commands and the per-frame step
//!
//! Every state transition the host can request arrives as a
//! `SimulationCommand` and is mapped onto the runner here.

use super::now;
use crate::prelude::*;

pub fn handle_restart_event(
    mut commands_reader: EventReader<SimulationCommand>,
    time: Res<Time<Real>>,
    config: Res<SimulationConfig>,
    mut runner: ResMut<SimulationRunner>,
) {
    for command in commands_reader.read() {
        if !matches!(command, SimulationCommand::Restart) {
            continue;
        }
        match runner.restart(&config, now(&time)) {
            Ok(()) => info!("Restarted {}", runner.kind().title()),
            Err(e) => error!("Failed to restart simulation: {}", e),
        }
    }
}

pub fn handle_pause_events(
    mut commands_reader: EventReader<SimulationCommand>,
    time: Res<Time<Real>>,
    mut runner: ResMut<SimulationRunner>,
) {
    let t = now(&time);
    for command in commands_reader.read() {
        match *command {
            SimulationCommand::TogglePause => runner.toggle_pause(t),
            SimulationCommand::SetPaused(paused) => runner.set_paused(paused, t),
            SimulationCommand::VisibilityChanged { hidden } => {
                debug!("Host visibility changed, hidden: {}", hidden);
                runner.set_hidden(hidden, t);
            }
            _ => {}
        }
    }
}

pub fn handle_pointer_event(
    mut commands_reader: EventReader<SimulationCommand>,
    mut rotate_lock: ResMut<RotateLock>,
) {
    for command in commands_reader.read() {
        if let SimulationCommand::PointerOverPanel(over) = *command {
            if **rotate_lock != over {
                debug!("Camera rotation locked: {}", over);
                **rotate_lock = over;
            }
        }
    }
}

pub fn handle_export_event(
    mut commands_reader: EventReader<SimulationCommand>,
    runner: Res<SimulationRunner>,
    export_path: Res<ExportPath>,
) {
    for command in commands_reader.read() {
        if !matches!(command, SimulationCommand::Export) {
            continue;
        }
        let Some(path) = export_path.0.as_deref() else {
            warn!("Export requested but no export path is set");
            continue;
        };
        let Some(table) = runner.export() else {
            warn!("{} keeps no records to export", runner.kind().title());
            continue;
        };
        match table.save(path) {
            Ok(()) => info!("Wrote {} records to {}", table.len(), path),
            Err(e) => error!("Failed to write export to {}: {}", path, e),
        }
    }
}

pub fn handle_quit_event(
    mut commands_reader: EventReader<SimulationCommand>,
    mut exit: EventWriter<AppExit>,
) {
    if commands_reader
        .read()
        .any(|command| matches!(command, SimulationCommand::Quit))
    {
        exit.write_default();
    }
}

/// Advance the simulation by the real time since the previous frame.
pub fn drive_simulation(
    time: Res<Time<Real>>,
    config: Res<SimulationConfig>,
    mut runner: ResMut<SimulationRunner>,
) {
    if config.is_changed() && !config.is_added() {
        runner.apply_live(&config);
    }
    runner.frame(now(&time));
}

/// Mirror the runner's pause state into `AppState`.
pub fn sync_app_state(
    runner: Res<SimulationRunner>,
    state: Res<State<AppState>>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    let wanted = AppState::from_paused(runner.is_paused());
    let pending = matches!(&*next_state, NextState::Pending(next) if *next == wanted);
    if *state.get() != wanted && !pending {
        info!("Simulation {:?}", wanted);
        next_state.set(wanted);
    }
}

/// Request export and exit once a headless run has reached its limit.
pub fn stop_when_done(
    runner: Res<SimulationRunner>,
    export_path: Res<ExportPath>,
    mut limit: ResMut<RunLimit>,
    mut commands: EventWriter<SimulationCommand>,
) {
    if limit.exit_requested {
        return;
    }
    let reached = limit.max_steps.is_some_and(|max| runner.steps() >= max);
    let finished = limit.until_finished && runner.is_finished();
    if !reached && !finished {
        return;
    }

    limit.exit_requested = true;
    info!(
        "Stopping {} after {} steps",
        runner.kind().title(),
        runner.steps()
    );
    if export_path.0.is_some() {
        commands.write(SimulationCommand::Export);
    }
    commands.write(SimulationCommand::Quit);
}
