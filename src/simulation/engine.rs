//! Tick driver that ties the intersection simulation together
//!
//! One [`SimulationEngine::tick`] call runs, in order: clock conversion,
//! spawn attempts, signal control, vehicle motion and eviction. Signals are
//! always committed before vehicles run, so every vehicle sees the same color
//! for its road within a tick.

use anyhow::{Context, Result};
use log::debug;
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::clock::SimClock;
use super::config::SimConfig;
use super::scenario::{Scenario, SpawnOutcome};
use super::signal_controller::SignalTransition;
use super::snapshot::SceneSnapshot;
use super::types::{RoadId, VehicleId};
use super::vehicle::SimVehicle;

/// Everything that happened during one tick
#[derive(Debug, Clone)]
pub struct TickReport {
    pub virtual_dt: f32,
    pub spawned: Vec<VehicleId>,
    /// Spawn draws that found both lanes occupied
    pub dropped_spawns: usize,
    pub signal: SignalTransition,
    /// Vehicles removed this tick, in their final state
    pub evicted: Vec<SimVehicle>,
}

pub struct SimulationEngine {
    scenario: Scenario,
    clock: SimClock,
    rng: StdRng,
    ticks: u64,
}

impl SimulationEngine {
    /// Create an engine with an OS-seeded RNG
    pub fn new(config: SimConfig) -> Result<Self> {
        config.validate().context("Invalid simulation config")?;
        Ok(Self::from_scenario(Scenario::new(config), StdRng::from_os_rng()))
    }

    /// Create an engine with a seeded RNG for reproducible simulations
    pub fn with_seed(config: SimConfig, seed: u64) -> Result<Self> {
        config.validate().context("Invalid simulation config")?;
        Ok(Self::from_scenario(
            Scenario::new(config),
            StdRng::seed_from_u64(seed),
        ))
    }

    /// Drive a pre-built scenario
    pub fn from_scenario(scenario: Scenario, rng: StdRng) -> Self {
        let clock = SimClock::new(scenario.config().speed_factor);
        Self {
            scenario,
            clock,
            rng,
            ticks: 0,
        }
    }

    pub fn scenario(&self) -> &Scenario {
        &self.scenario
    }

    pub fn scenario_mut(&mut self) -> &mut Scenario {
        &mut self.scenario
    }

    pub fn config(&self) -> &SimConfig {
        self.scenario.config()
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Main simulation tick, fed one real elapsed-time sample
    pub fn tick(&mut self, real_dt: f32) -> TickReport {
        self.ticks += 1;
        let virtual_dt = self.clock.advance(real_dt);

        let mut spawned = Vec::new();
        let mut dropped_spawns = 0;
        for road in RoadId::ALL {
            match self.scenario.attempt_spawn(road, &mut self.rng) {
                SpawnOutcome::Spawned(vehicle_id) => spawned.push(vehicle_id),
                SpawnOutcome::Dropped => dropped_spawns += 1,
                SpawnOutcome::NotDrawn => {}
            }
        }

        let signal = self.scenario.advance_signals(virtual_dt);
        if let SignalTransition::Switched { green } = signal {
            debug!(
                "t={:.2}s: {green:?} road green",
                self.clock.virtual_elapsed()
            );
        }

        self.scenario.advance_vehicles(virtual_dt);

        let evicted = self.scenario.evict_off_screen();

        TickReport {
            virtual_dt,
            spawned,
            dropped_spawns,
            signal,
            evicted,
        }
    }

    /// Copy out the current scene for rendering or sampling
    pub fn snapshot(&self) -> SceneSnapshot {
        SceneSnapshot::capture(
            &self.scenario,
            self.clock.virtual_elapsed(),
            self.clock.real_elapsed(),
        )
    }
}
