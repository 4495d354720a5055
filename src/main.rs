//! Steerling demo entry point.
//!
//! An agent simulation toolkit built on:
//! - **bevy_ecs** for entity-component-system architecture
//! - **glam** for 2D vector math
//!
//! This executable runs a headless chase scene: a fox pursues a rabbit
//! while the rabbit evades. The main loop plays the role of the game's
//! perception layer: when the fox closes in it sends both agents a
//! telegram, the rabbit's state machine freezes it in place and the fox
//! turns for home. The scene exercises every part of the library:
//! steering, the state machines and the telegram dispatcher.
//!
//! # Running
//!
//! ```sh
//! cargo run --release -- --ticks 1200
//! ```

mod components;
mod error;
mod events;
mod fsm;
mod game;
mod math;
mod resources;
mod steering;
mod systems;

use bevy_ecs::prelude::*;
use clap::Parser;
use glam::Vec2;
use std::path::PathBuf;

use crate::components::agent::Agent;
use crate::components::brain::Brain;
use crate::events::telegram::Telegram;
use crate::fsm::{State, Transition};
use crate::game::Game;
use crate::resources::simconfig::SimConfig;
use crate::resources::telegraph::Telegraph;
use crate::resources::worldtime::WorldTime;
use crate::steering::Steering;

/// Steerling
#[derive(Parser)]
#[command(version, about = "Headless steering and messaging demo")]
struct Cli {
    /// Number of simulation ticks to run.
    #[arg(long, default_value_t = 1200)]
    ticks: u32,

    /// Fixed timestep in seconds; defaults to the configured tick_dt.
    #[arg(long)]
    dt: Option<f32>,

    /// Path to the simulation INI file.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// The fox caught up with the rabbit.
const MSG_GOTCHA: i32 = 1;
/// The rabbit taunts the fox a little later.
const MSG_TAUNT: i32 = 2;

/// Distance at which the fox considers the rabbit caught.
const CATCH_DISTANCE: f32 = 12.0;

/// Rabbit state: evade the fox until told otherwise.
struct Evading {
    fox: Entity,
    caught: bool,
}

impl State<Agent> for Evading {
    fn on_enter(&mut self, rabbit: &mut Agent) {
        rabbit.steering = Steering::evade(self.fox);
    }

    fn update(&mut self, _rabbit: &mut Agent, _dt: f32) -> Option<Transition<Agent>> {
        if self.caught {
            Some(Transition::Change(Box::new(Freeze)))
        } else {
            None
        }
    }

    fn on_message(&mut self, _rabbit: &mut Agent, telegram: &Telegram) -> bool {
        if telegram.msg == MSG_GOTCHA {
            log::info!("rabbit: caught, freezing");
            self.caught = true;
            true
        } else {
            false
        }
    }
}

/// Rabbit state after being caught: stop and stay put.
struct Freeze;

impl State<Agent> for Freeze {
    fn on_enter(&mut self, rabbit: &mut Agent) {
        rabbit.steering = Steering::idle();
        rabbit.body.velocity = Vec2::ZERO;
    }
}

/// Fox state: chase the rabbit until the gotcha telegram arrives.
struct Hunt {
    rabbit: Entity,
    den: Vec2,
    done: bool,
}

impl State<Agent> for Hunt {
    fn on_enter(&mut self, fox: &mut Agent) {
        fox.steering = Steering::pursuit(self.rabbit);
    }

    fn update(&mut self, _fox: &mut Agent, _dt: f32) -> Option<Transition<Agent>> {
        if self.done {
            Some(Transition::Change(Box::new(ReturnHome { den: self.den })))
        } else {
            None
        }
    }

    fn on_message(&mut self, _fox: &mut Agent, telegram: &Telegram) -> bool {
        if telegram.msg == MSG_GOTCHA {
            log::info!("fox: got it, heading home");
            self.done = true;
            true
        } else {
            false
        }
    }
}

/// Fox state after the catch: amble back to the den.
struct ReturnHome {
    den: Vec2,
}

impl State<Agent> for ReturnHome {
    fn on_enter(&mut self, fox: &mut Agent) {
        fox.steering = Steering::arrive(self.den);
    }

    fn on_message(&mut self, _fox: &mut Agent, telegram: &Telegram) -> bool {
        if telegram.msg == MSG_TAUNT {
            log::info!("fox: ignoring the taunt");
            true
        } else {
            false
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => SimConfig::with_path(path.clone()),
        None => SimConfig::new(),
    };
    if let Err(e) = config.load_from_file() {
        log::info!("using default configuration: {e}");
    }
    let dt = cli.dt.unwrap_or(config.tick_dt);
    let body = config.default_body();

    let mut game = Game::new(config);

    let (fox, fox_id) = game.spawn_agent(Agent::new(Vec2::ZERO, body), None);
    let (rabbit, rabbit_id) = game.spawn_agent(
        Agent::new(Vec2::new(300.0, 200.0), body),
        Some(Box::new(Evading { fox, caught: false })),
    );

    // The fox's state needs the rabbit's entity, so its brain is seeded
    // after both agents exist.
    {
        let mut query = game.world.query::<(&mut Agent, &mut Brain)>();
        if let Ok((mut agent, mut brain)) = query.get_mut(&mut game.world, fox) {
            brain.machine.push_state(
                &mut agent,
                Box::new(Hunt {
                    rabbit,
                    den: Vec2::ZERO,
                    done: false,
                }),
            );
        }
    }

    log::info!("chase starts: fox at (0, 0), rabbit at (300, 200)");
    let mut caught = false;
    for tick in 0..cli.ticks {
        game.tick(dt);

        if !caught {
            let fox_pos = game.world.get::<Agent>(fox).map(|a| a.pos);
            let rabbit_pos = game.world.get::<Agent>(rabbit).map(|a| a.pos);
            if let (Some(f), Some(r)) = (fox_pos, rabbit_pos) {
                if f.distance(r) <= CATCH_DISTANCE {
                    caught = true;
                    log::info!("tick {tick}: fox within reach, sending gotcha");
                    game.send(fox_id, rabbit_id, MSG_GOTCHA, 0.0);
                    game.send(fox_id, fox_id, MSG_GOTCHA, 0.0);
                    game.send(rabbit_id, fox_id, MSG_TAUNT, 1.5);
                }
            }
        }

        if tick % 120 == 0 {
            let frame = game.world.resource::<WorldTime>().frame_count;
            let fox_pos = game.world.get::<Agent>(fox).map(|a| a.pos);
            let rabbit_pos = game.world.get::<Agent>(rabbit).map(|a| a.pos);
            log::info!("frame {frame}: fox {fox_pos:?} rabbit {rabbit_pos:?}");
        }
    }

    let telegraph = game.world.resource::<Telegraph>();
    log::info!(
        "done: {} delivered, {} ignored, {} dropped",
        telegraph.delivered,
        telegraph.ignored,
        telegraph.dropped
    );
}
