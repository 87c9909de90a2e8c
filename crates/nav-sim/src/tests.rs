//! Integration tests for nav-sim.

use nav_core::{Point, Vec2};
use nav_plan::{AStarPlanner, DwaPlanner, MotionLimits};
use nav_world::Environment;

use crate::{NoopObserver, ScenarioConfig, SimObserver, SimState, SimulationBuilder, Simulation};

type TestSim = Simulation<AStarPlanner, DwaPlanner>;

// ── Helpers ───────────────────────────────────────────────────────────────────

fn sim_with_env(env: Environment) -> TestSim {
    SimulationBuilder::new(env, AStarPlanner::new(), DwaPlanner::default())
        .seed(42)
        .build()
        .unwrap()
}

fn open_world(start: Point, goal: Point) -> TestSim {
    let mut env = Environment::new(10, 10);
    assert!(env.set_start(start));
    assert!(env.set_goal(goal));
    sim_with_env(env)
}

/// Observer that counts hook invocations.
#[derive(Default)]
struct HookCounter {
    ticks: usize,
    replans: usize,
    unavailable: usize,
    goals: usize,
}

impl SimObserver for HookCounter {
    fn on_tick_end(&mut self, _t: f64, _env: &Environment) {
        self.ticks += 1;
    }
    fn on_replan(&mut self, _t: f64, _path: &[Point]) {
        self.replans += 1;
    }
    fn on_plan_unavailable(&mut self, _t: f64) {
        self.unavailable += 1;
    }
    fn on_goal_reached(&mut self, _t: f64, _env: &Environment) {
        self.goals += 1;
    }
}

// ── State machine ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod state_machine {
    use super::*;

    #[test]
    fn starts_idle() {
        let sim = sim_with_env(Environment::new(10, 10));
        assert_eq!(sim.state(), SimState::Idle);
        assert_eq!(sim.time(), 0.0);
    }

    #[test]
    fn start_with_unset_goal_is_refused() {
        let mut env = Environment::new(10, 10);
        env.set_start(Point::new(0.0, 0.0));
        // Goal stays at the (-1, -1) sentinel.
        let mut sim = sim_with_env(env);
        assert!(!sim.start());
        assert_eq!(sim.state(), SimState::Idle);
    }

    #[test]
    fn start_with_unset_start_is_refused() {
        let mut env = Environment::new(10, 10);
        env.set_goal(Point::new(9.0, 9.0));
        let mut sim = sim_with_env(env);
        assert!(!sim.start());
        assert_eq!(sim.state(), SimState::Idle);
    }

    #[test]
    fn valid_start_runs() {
        let mut sim = open_world(Point::new(0.0, 0.0), Point::new(9.0, 9.0));
        assert!(sim.start());
        assert_eq!(sim.state(), SimState::Running);
        assert_eq!(sim.agent_position(), Point::new(0.0, 0.0));
    }

    #[test]
    fn start_while_running_is_a_noop() {
        let mut sim = open_world(Point::new(0.0, 0.0), Point::new(9.0, 9.0));
        assert!(sim.start());
        sim.run_ticks(10, 0.05, &mut NoopObserver);
        let time = sim.time();
        let pos = sim.agent_position();

        assert!(!sim.start());
        assert_eq!(sim.state(), SimState::Running);
        assert_eq!(sim.time(), time, "a refused start must not reset time");
        assert_eq!(sim.agent_position(), pos);
    }

    #[test]
    fn advance_is_a_noop_while_idle() {
        let mut sim = open_world(Point::new(1.0, 1.0), Point::new(8.0, 8.0));
        let mut hooks = HookCounter::default();
        sim.advance(0.1, &mut hooks);
        assert_eq!(sim.time(), 0.0);
        assert_eq!(sim.agent_position(), Point::new(1.0, 1.0));
        assert_eq!(hooks.ticks, 0);
    }

    #[test]
    fn reaches_goal_and_finishes() {
        let mut sim = open_world(Point::new(1.0, 1.0), Point::new(6.0, 1.0));
        assert!(sim.start());
        let mut hooks = HookCounter::default();
        sim.run_ticks(4000, 0.05, &mut hooks);

        assert_eq!(sim.state(), SimState::Finished, "agent never arrived");
        assert!(sim.agent_position().distance(Point::new(6.0, 1.0)) < 0.5);
        assert_eq!(hooks.goals, 1);
        // The trace is frozen as the published path.
        assert_eq!(sim.path(), sim.traversed_path());
        assert!(!sim.traversed_path().is_empty());

        // Finished simulations don't move.
        let pos = sim.agent_position();
        sim.advance(0.1, &mut NoopObserver);
        assert_eq!(sim.agent_position(), pos);
    }

    #[test]
    fn velocity_respects_the_envelope() {
        let limits = MotionLimits {
            max_speed: 3.0,
            max_turn_rate: 2.0,
        };
        let mut env = Environment::new(10, 10);
        env.set_start(Point::new(1.0, 1.0));
        env.set_goal(Point::new(8.0, 8.0));
        let mut sim = SimulationBuilder::new(env, AStarPlanner::new(), DwaPlanner::default())
            .limits(limits)
            .seed(7)
            .build()
            .unwrap();
        assert!(sim.start());
        for _ in 0..200 {
            sim.advance(0.05, &mut NoopObserver);
            assert!(sim.agent_velocity().length() <= limits.max_speed + 1e-9);
        }
    }

    #[test]
    fn goal_already_within_threshold_finishes_without_movement() {
        let mut sim = open_world(Point::new(5.0, 5.0), Point::new(5.0, 5.3));
        assert!(sim.start());
        assert!(sim.env().has_reached_goal());
        sim.advance(0.05, &mut NoopObserver);
        assert_eq!(sim.state(), SimState::Finished);
        // Within one 0.05 s tick the agent cannot have moved materially.
        assert!(sim.agent_position().distance(Point::new(5.0, 5.0)) < 0.3);
    }
}

// ── Replanning ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod replanning {
    use super::*;

    fn enclosed_goal_world() -> TestSim {
        let mut env = Environment::new(12, 12);
        env.set_start(Point::new(0.0, 0.0));
        env.set_goal(Point::new(6.0, 6.0));
        for dx in -1..=1i32 {
            for dy in -1..=1i32 {
                if (dx, dy) != (0, 0) {
                    let p = Point::new(6.0 + dx as f64, 6.0 + dy as f64);
                    assert!(env.add_obstacle(nav_world::Obstacle::fixed(p)).is_some());
                }
            }
        }
        sim_with_env(env)
    }

    #[test]
    fn unreachable_goal_holds_position() {
        let mut sim = enclosed_goal_world();
        assert!(sim.start());
        let mut hooks = HookCounter::default();
        sim.run_ticks(20, 0.05, &mut hooks);

        // Recoverable: still running, still at the start, reported each tick.
        assert_eq!(sim.state(), SimState::Running);
        assert_eq!(sim.agent_position(), Point::new(0.0, 0.0));
        assert_eq!(sim.agent_velocity(), Vec2::ZERO);
        assert_eq!(hooks.unavailable, 20);
        assert_eq!(hooks.replans, 0);
        assert!(sim.path().is_empty());
    }

    #[test]
    fn recovers_when_the_world_opens_up() {
        let mut sim = enclosed_goal_world();
        assert!(sim.start());
        sim.run_ticks(5, 0.05, &mut NoopObserver);

        // The host removes one wall segment between ticks.
        assert_eq!(sim.remove_obstacle(Point::new(5.0, 6.0)), 1);

        let mut hooks = HookCounter::default();
        sim.advance(0.05, &mut hooks);
        assert_eq!(hooks.replans, 1);
        assert!(!sim.path().is_empty());
    }

    #[test]
    fn edit_during_run_triggers_replan() {
        let mut sim = open_world(Point::new(0.0, 0.0), Point::new(9.0, 9.0));
        assert!(sim.start());
        let mut hooks = HookCounter::default();
        sim.run_ticks(3, 0.05, &mut hooks);
        assert_eq!(hooks.replans, 1, "one plan suffices while nothing changes");

        // Drop an obstacle onto the diagonal; the next tick must replan.
        assert!(sim.add_static_obstacle(Point::new(5.0, 5.0)).is_some());
        sim.run_ticks(1, 0.05, &mut hooks);
        assert_eq!(hooks.replans, 2);
        assert!(sim.path().iter().all(|p| p.to_cell() != nav_core::Cell::new(5, 5)));
    }

    #[test]
    fn request_replan_is_immediate() {
        let mut sim = open_world(Point::new(0.0, 0.0), Point::new(9.0, 9.0));
        assert!(sim.path().is_empty());
        assert!(sim.request_replan());
        assert_eq!(sim.path().len(), 10);

        // With an unset goal there is nothing to plan toward.
        sim.env_mut().clear_goal();
        assert!(!sim.request_replan());
        assert!(sim.path().is_empty());
    }
}

// ── Reset ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod reset {
    use super::*;

    fn world_with_dynamics() -> TestSim {
        let mut env = Environment::new(10, 10);
        env.set_start(Point::new(1.0, 1.0));
        env.set_goal(Point::new(8.0, 8.0));
        env.add_obstacle(nav_world::Obstacle::linear(
            Point::new(5.0, 2.0),
            2.0,
            Vec2::new(0.0, 1.0),
        ))
        .unwrap();
        sim_with_env(env)
    }

    fn observable_state(sim: &TestSim) -> (SimState, f64, Point, Vec<Point>, usize, usize) {
        (
            sim.state(),
            sim.time(),
            sim.agent_position(),
            sim.env().dynamic_obstacles().map(|o| o.position()).collect(),
            sim.path().len(),
            sim.traversed_path().len(),
        )
    }

    #[test]
    fn reset_is_idempotent() {
        let mut sim = world_with_dynamics();
        assert!(sim.start());
        sim.run_ticks(50, 0.05, &mut NoopObserver);

        sim.reset();
        let once = observable_state(&sim);
        sim.reset();
        assert_eq!(observable_state(&sim), once);

        assert_eq!(once.0, SimState::Idle);
        assert_eq!(once.1, 0.0);
        assert_eq!(once.3, vec![Point::new(5.0, 2.0)], "obstacle back at spawn");
        assert_eq!(once.4, 0, "no stored path after reset");
        assert_eq!(once.5, 0, "no trace after reset");
    }

    #[test]
    fn reset_then_start_places_agent_on_start() {
        let mut sim = world_with_dynamics();
        assert!(sim.start());
        sim.run_ticks(40, 0.05, &mut NoopObserver);
        assert!(sim.agent_position().distance(Point::new(1.0, 1.0)) > 0.1);

        sim.reset();
        assert!(sim.start());
        assert_eq!(sim.agent_position(), Point::new(1.0, 1.0));
    }

    #[test]
    fn reset_works_from_finished() {
        let mut sim = open_world(Point::new(1.0, 1.0), Point::new(3.0, 1.0));
        assert!(sim.start());
        sim.run_ticks(2000, 0.05, &mut NoopObserver);
        assert_eq!(sim.state(), SimState::Finished);

        sim.reset();
        assert_eq!(sim.state(), SimState::Idle);
        assert!(sim.path().is_empty());
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let run = || {
            let mut sim = open_world(Point::new(1.0, 1.0), Point::new(8.0, 8.0));
            assert!(sim.start());
            sim.run_ticks(100, 0.05, &mut NoopObserver);
            sim.agent_position()
        };
        assert_eq!(run(), run());
    }
}

// ── Trace ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod trace {
    use super::*;

    #[test]
    fn trace_points_are_materially_spaced() {
        let mut sim = open_world(Point::new(1.0, 1.0), Point::new(8.0, 1.0));
        assert!(sim.start());
        sim.run_ticks(500, 0.05, &mut NoopObserver);

        let trace = sim.traversed_path();
        assert!(trace.len() > 1);
        for pair in trace.windows(2) {
            assert!(pair[0].distance(pair[1]) > 0.01);
        }
    }
}

// ── Scenario configuration ────────────────────────────────────────────────────

#[cfg(test)]
mod config {
    use super::*;
    use crate::{MovementType, SimError};

    const FULL: &str = r#"{
        "width": 20, "height": 15,
        "start": [1, 1], "goal": [18, 13],
        "static_obstacles": [
            { "x": 5, "y": 5 },
            { "x": 6, "y": 5, "radius": 0.8 }
        ],
        "dynamic_obstacles": [
            { "x": 10, "y": 2, "movement_type": "linear",
              "speed": 2.0, "direction": [0, 1] },
            { "x": 13, "y": 10, "movement_type": "circular",
              "center": [10, 10], "radius": 3.0, "angular_speed": 0.5 }
        ]
    }"#;

    #[test]
    fn full_scenario_parses_and_applies() {
        let cfg = ScenarioConfig::from_json_str(FULL).unwrap();
        assert_eq!((cfg.width, cfg.height), (20, 15));
        assert_eq!(cfg.dynamic_obstacles[1].movement_type, MovementType::Circular);

        let env = cfg.build_environment().unwrap();
        assert_eq!(env.start(), Point::new(1.0, 1.0));
        assert_eq!(env.goal(), Point::new(18.0, 13.0));
        assert_eq!(env.current(), env.start());
        assert_eq!(env.static_obstacles().count(), 2);
        assert_eq!(env.dynamic_obstacles().count(), 2);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let cfg = ScenarioConfig::from_json_str("{}").unwrap();
        let env = cfg.build_environment().unwrap();
        assert_eq!(env.grid().width(), 50);
        assert_eq!(env.grid().height(), 50);
        assert_eq!(env.start(), Point::new(0.0, 0.0));
        assert_eq!(env.goal(), Point::new(49.0, 49.0));
        assert_eq!(env.obstacle_count(), 0);
    }

    #[test]
    fn dynamic_obstacle_defaults() {
        let cfg = ScenarioConfig::from_json_str(
            r#"{ "dynamic_obstacles": [ { "x": 10, "y": 10 } ] }"#,
        )
        .unwrap();
        let spec = &cfg.dynamic_obstacles[0];
        assert_eq!(spec.movement_type, MovementType::Linear);
        assert_eq!(spec.speed, 3.0);
        assert_eq!(spec.direction, [1.0, 0.0]);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        match ScenarioConfig::from_json_str("{ \"width\": ") {
            Err(SimError::Parse(_)) => {}
            other => panic!("expected a parse error, got {other:?}"),
        }
    }

    #[test]
    fn non_finite_values_fail_fast() {
        let cfg = ScenarioConfig {
            start: Some([f64::NAN, 0.0]),
            ..ScenarioConfig::default()
        };
        assert!(matches!(cfg.build_environment(), Err(SimError::Config(_))));
    }

    #[test]
    fn negative_radius_fails_fast() {
        let cfg = ScenarioConfig::from_json_str(
            r#"{ "static_obstacles": [ { "x": 3, "y": 3, "radius": -1.0 } ] }"#,
        )
        .unwrap();
        assert!(matches!(cfg.build_environment(), Err(SimError::Config(_))));
    }

    #[test]
    fn invalid_placements_are_skipped_not_fatal() {
        let cfg = ScenarioConfig::from_json_str(
            r#"{
                "width": 10, "height": 10,
                "start": [0, 0], "goal": [9, 9],
                "static_obstacles": [
                    { "x": 0, "y": 0 },
                    { "x": 30, "y": 30 },
                    { "x": 4, "y": 4 }
                ]
            }"#,
        )
        .unwrap();
        let env = cfg.build_environment().unwrap();
        // On-start and out-of-bounds entries are dropped silently.
        assert_eq!(env.static_obstacles().count(), 1);
    }

    #[test]
    fn zero_grid_is_rejected() {
        let cfg = ScenarioConfig {
            width: 0,
            ..ScenarioConfig::default()
        };
        assert!(matches!(cfg.build_environment(), Err(SimError::Config(_))));
    }
}

// ── Builder ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use super::*;
    use crate::SimError;

    #[test]
    fn rejects_non_positive_speed() {
        let result = SimulationBuilder::new(
            Environment::new(10, 10),
            AStarPlanner::new(),
            DwaPlanner::default(),
        )
        .limits(MotionLimits {
            max_speed: 0.0,
            max_turn_rate: 2.0,
        })
        .build();
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn rejects_non_finite_turn_rate() {
        let result = SimulationBuilder::new(
            Environment::new(10, 10),
            AStarPlanner::new(),
            DwaPlanner::default(),
        )
        .limits(MotionLimits {
            max_speed: 5.0,
            max_turn_rate: f64::NAN,
        })
        .build();
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn limits_can_be_swapped_at_runtime() {
        let mut sim = sim_with_env(Environment::new(10, 10));
        let tighter = MotionLimits {
            max_speed: 2.0,
            max_turn_rate: 1.0,
        };
        sim.set_limits(tighter);
        assert_eq!(sim.limits(), tighter);
    }

    #[test]
    fn defaults_build() {
        let sim = SimulationBuilder::new(
            Environment::new(10, 10),
            AStarPlanner::new(),
            DwaPlanner::default(),
        )
        .build()
        .unwrap();
        assert_eq!(sim.limits(), MotionLimits::default());
        assert_eq!(sim.state(), SimState::Idle);
    }
}
