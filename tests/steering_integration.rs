//! Full-loop steering integration tests: agents driven by [`Game::tick`]
//! must actually close in on their targets.

use glam::Vec2;

use steerling::components::agent::Agent;
use steerling::components::agentid::AgentId;
use steerling::components::motion::MotionBody;
use steerling::game::Game;
use steerling::resources::registry::AgentRegistry;
use steerling::resources::simconfig::SimConfig;
use steerling::steering::{Steering, ARRIVE_MIN_DISTANCE};

const DT: f32 = 1.0 / 60.0;

fn make_game() -> Game {
    Game::new(SimConfig::default())
}

fn body() -> MotionBody {
    MotionBody::new(1.0, 400.0, 150.0, std::f32::consts::PI)
}

#[test]
fn seeking_agent_closes_on_target() {
    let mut game = make_game();
    let target = Vec2::new(200.0, 100.0);
    let agent = Agent::new(Vec2::ZERO, body()).with_steering(Steering::seek(target));
    let (entity, _) = game.spawn_agent(agent, None);

    let start = game.world.get::<Agent>(entity).unwrap().pos.distance(target);
    for _ in 0..120 {
        game.tick(DT);
    }
    let end = game.world.get::<Agent>(entity).unwrap().pos.distance(target);

    assert!(end < start * 0.5, "expected {end} well below {start}");
}

#[test]
fn arriving_agent_settles_near_target() {
    let mut game = make_game();
    let target = Vec2::new(120.0, 0.0);
    let agent = Agent::new(Vec2::ZERO, body()).with_steering(Steering::arrive(target));
    let (entity, _) = game.spawn_agent(agent, None);

    for _ in 0..600 {
        game.tick(DT);
    }

    let agent = game.world.get::<Agent>(entity).unwrap();
    let distance = agent.pos.distance(target);
    // The approach is underdamped, so allow the residual oscillation
    // through the stop radius.
    assert!(
        distance <= ARRIVE_MIN_DISTANCE * 4.0,
        "agent stopped {distance} away"
    );
    assert!(
        agent.body.speed() < 40.0,
        "agent still moving at {}",
        agent.body.speed()
    );
}

#[test]
fn pursuer_gains_on_moving_evader() {
    let mut game = make_game();

    let mut prey_body = body();
    prey_body.max_speed = 60.0;
    prey_body.velocity = Vec2::new(60.0, 0.0);
    let (prey, _) = game.spawn_agent(Agent::new(Vec2::new(150.0, 0.0), prey_body), None);

    let hunter = Agent::new(Vec2::ZERO, body()).with_steering(Steering::pursuit(prey));
    let (hunter, _) = game.spawn_agent(hunter, None);

    let gap = |game: &mut Game| {
        let a = game.world.get::<Agent>(hunter).unwrap().pos;
        let b = game.world.get::<Agent>(prey).unwrap().pos;
        a.distance(b)
    };

    let start = gap(&mut game);
    for _ in 0..240 {
        game.tick(DT);
    }
    let end = gap(&mut game);

    assert!(end < start, "gap grew from {start} to {end}");
}

#[test]
fn evader_opens_distance_from_pursuer() {
    let mut game = make_game();

    let mut threat_body = body();
    threat_body.velocity = Vec2::new(50.0, 0.0);
    let (threat, _) = game.spawn_agent(Agent::new(Vec2::ZERO, threat_body), None);

    let runner = Agent::new(Vec2::new(80.0, 0.0), body()).with_steering(Steering::evade(threat));
    let (runner, _) = game.spawn_agent(runner, None);

    let gap = |game: &mut Game| {
        let a = game.world.get::<Agent>(runner).unwrap().pos;
        let b = game.world.get::<Agent>(threat).unwrap().pos;
        a.distance(b)
    };

    let start = gap(&mut game);
    for _ in 0..120 {
        game.tick(DT);
    }
    let end = gap(&mut game);

    assert!(end > start, "gap shrank from {start} to {end}");
}

#[test]
fn registry_follows_component_spawn_and_despawn() {
    let mut game = make_game();

    // Insert the id component directly instead of going through
    // spawn_agent; the schedule's registry systems must pick it up.
    let entity = game
        .world
        .spawn((
            AgentId::UNREGISTERED,
            Agent::new(Vec2::ZERO, MotionBody::default()),
        ))
        .id();
    game.tick(DT);

    let id = *game.world.get::<AgentId>(entity).unwrap();
    assert!(id.is_registered());
    assert_eq!(game.world.resource::<AgentRegistry>().find(id), Some(entity));

    game.world.despawn(entity);
    game.tick(DT);

    assert_eq!(game.world.resource::<AgentRegistry>().find(id), None);
}
