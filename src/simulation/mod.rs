//! Intersection simulation engine
//!
//! This module contains the vehicle, lane, road and signal logic of a
//! two-road signalized intersection, and the tick driver that runs them.
//! Nothing here draws anything; renderers read [`SceneSnapshot`]s.

mod clock;
mod config;
mod engine;
mod lane;
mod road;
mod scenario;
mod signal;
mod signal_controller;
mod snapshot;
mod stats;
mod types;
mod vehicle;

pub use clock::SimClock;
pub use config::{RoadConfig, SimConfig, VehicleOrdering};
pub use engine::{SimulationEngine, TickReport};
pub use lane::SimLane;
pub use road::SimRoad;
pub use scenario::{Scenario, SpawnOutcome};
pub use signal::TrafficSignal;
pub use signal_controller::{
    QueueDepths, SignalController, SignalPhase, SignalTiming, SignalTransition,
};
pub use snapshot::{Entity, IntersectionView, RoadView, SceneSnapshot, SignalView, VehicleView};
pub use stats::SimulationStats;
pub use types::{
    LaneSide, Position, Rect, RoadId, SignalColor, SimId, VehicleId, VehicleState,
};
pub use vehicle::{SimVehicle, VehicleStep};
