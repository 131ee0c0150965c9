//! Headless listener session.
//!
//! Listeners are spread evenly on a circle, each orbiting counter-clockwise
//! and facing the center. They are then destroyed by always picking the
//! listener in slot 0, so every destroy but the last moves the tail listener
//! into slot 0.

use std::f32::consts::TAU;

use anyhow::{ensure, Result};
use earshot_common::{Attributes3D, ListenerId};
use earshot_kernel::{HeadlessSubsystem, ListenerRegistry, ListenerSubsystem};
use glam::Vec2;
use tracing::{debug, info};

use crate::config::EngineConfig;

/// Orbit speed of scenario listeners in world units per second.
const ORBIT_SPEED: f32 = 10.0;

/// Summary of a finished session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScenarioReport {
    /// Listeners created
    pub created: usize,
    /// Destroys that moved another listener to a new slot
    pub moves: usize,
    /// Listeners still registered at the end
    pub remaining: usize,
}

/// Pose of listener `index` out of `count` on a circle of `radius`.
fn orbit_pose(index: usize, count: usize, radius: f32) -> Attributes3D {
    let angle = TAU * index as f32 / count as f32;
    let (sin, cos) = angle.sin_cos();
    let position = Vec2::new(cos, sin) * radius;
    let velocity = Vec2::new(-sin, cos) * ORBIT_SPEED;
    let forward = -Vec2::new(cos, sin);
    Attributes3D::from_2d(position, velocity, forward)
}

/// Runs the session against a headless engine.
pub fn run(config: &EngineConfig) -> Result<ScenarioReport> {
    let subsystem = HeadlessSubsystem::with_max_listeners(config.max_listeners);
    let mut registry = ListenerRegistry::with_config(subsystem, config.listeners.clone());

    let count = config.scenario_listeners;
    let mut placed: Vec<(ListenerId, Attributes3D)> = Vec::with_capacity(count);
    for index in 0..count {
        let id = registry.create()?;
        let pose = orbit_pose(index, count, config.scenario_radius);
        registry.set_attributes(id, &pose)?;
        debug!("Placed {id} at {:?}", pose.position);
        placed.push((id, pose));
    }
    info!("Created {count} listeners");
    verify(&registry, &placed)?;

    let mut moves = 0;
    loop {
        let Some(id) = registry.listeners().next() else {
            break;
        };
        if registry.len() > 1 {
            moves += 1;
        }
        registry.destroy(id)?;
        placed.retain(|(placed_id, _)| *placed_id != id);
        verify(&registry, &placed)?;
    }

    let remaining = registry.len();
    info!(
        "Engine reports {} listeners after teardown",
        registry.subsystem_listener_count()?
    );

    Ok(ScenarioReport {
        created: count,
        moves,
        remaining,
    })
}

/// Checks slot density, the engine's count, and every live pose.
fn verify<S: ListenerSubsystem>(
    registry: &ListenerRegistry<S>,
    placed: &[(ListenerId, Attributes3D)],
) -> Result<()> {
    let engine_count = registry.subsystem_listener_count()?;
    ensure!(
        engine_count == registry.len(),
        "engine sees {engine_count} listeners, registry has {}",
        registry.len()
    );

    let mut occupied = vec![false; registry.len()];
    for (id, pose) in placed {
        let slot = registry
            .slot_of(*id)
            .ok_or_else(|| anyhow::anyhow!("{id} lost its slot"))?;
        ensure!(slot < occupied.len() && !occupied[slot], "slot {slot} is not unique");
        occupied[slot] = true;

        let actual = registry.attributes(*id)?;
        ensure!(actual == *pose, "{id} in slot {slot} has pose {actual:?}, expected {pose:?}");
    }
    ensure!(occupied.iter().all(|&taken| taken), "slot range has gaps");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_orbit_pose_faces_center() {
        let pose = orbit_pose(0, 4, 50.0);
        assert!((pose.position - Vec3::new(50.0, 0.0, 0.0)).length() < 1e-4);
        assert!((pose.forward - Vec3::NEG_X).length() < 1e-4);
        assert!((pose.velocity - Vec3::new(0.0, ORBIT_SPEED, 0.0)).length() < 1e-4);
        assert_eq!(pose.up, Vec3::Z);
        assert!(pose.has_valid_orientation());
    }

    #[test]
    fn test_default_session() {
        let report = run(&EngineConfig::default()).expect("session");
        assert_eq!(report.created, 4);
        // Destroying slot 0 moves the tail on every destroy but the last.
        assert_eq!(report.moves, 3);
        assert_eq!(report.remaining, 0);
    }

    #[test]
    fn test_single_listener_session() {
        let config = EngineConfig {
            scenario_listeners: 1,
            ..EngineConfig::default()
        };
        let report = run(&config).expect("session");
        assert_eq!(report.moves, 0);
        assert_eq!(report.remaining, 0);
    }

    #[test]
    fn test_two_listener_session_moves_once() {
        let config = EngineConfig {
            scenario_listeners: 2,
            ..EngineConfig::default()
        };
        let report = run(&config).expect("session");
        assert_eq!(report.created, 2);
        assert_eq!(report.moves, 1);
        assert_eq!(report.remaining, 0);
    }

    #[test]
    fn test_session_over_capacity_fails() {
        let config = EngineConfig {
            max_listeners: 2,
            scenario_listeners: 3,
            ..EngineConfig::default()
        };
        assert!(run(&config).is_err());
    }
}
