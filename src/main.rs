use bevy::app::ScheduleRunnerPlugin;
use bevy::log::{Level, LogPlugin};
use bevy::state::app::StatesPlugin;
use clap::Parser;
use physicsim::cli::{self, Args};
use physicsim::plugins::simulation::SimulationPlugin;
use physicsim::prelude::*;
use std::time::Duration;

fn main() -> AppExit {
    let args = Args::parse();

    if args.list_simulations {
        cli::handle_list_simulations();
        return AppExit::Success;
    }

    let config = match cli::load_and_apply_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return AppExit::error();
        }
    };

    if args.print_config {
        return match cli::print_config(&config) {
            Ok(toml) => {
                print!("{toml}");
                AppExit::Success
            }
            Err(e) => {
                eprintln!("Error: {e}");
                AppExit::error()
            }
        };
    }

    let frame_rate = config.runtime.frame_rate;
    let frame_rate = if frame_rate.is_finite() && frame_rate > 0.0 {
        frame_rate
    } else {
        30.0
    };

    let mut app = App::new();
    app.add_plugins((
        MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(
            1.0 / frame_rate,
        ))),
        LogPlugin {
            level: if args.verbose {
                Level::DEBUG
            } else {
                Level::INFO
            },
            ..default()
        },
        StatesPlugin,
        SimulationPlugin::with_config(config),
    ));
    app.insert_resource(cli::run_limit(&args));
    app.insert_resource(ExportPath(args.export.clone()));

    app.run()
}
