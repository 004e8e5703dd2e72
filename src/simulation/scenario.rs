//! Registry of every live entity in the intersection
//!
//! The scenario is the single owner of vehicles, roads (and through them
//! lanes) and the signal controller. Vehicles never hold references back into
//! it; they are looked up by [`VehicleId`] and handed the signal color and
//! ahead-vehicle they need for a tick. Adding or removing a vehicle always
//! updates the flat registry and the owning lane together.

use log::{debug, trace};
use ordered_float::OrderedFloat;
use rand::Rng;
use std::collections::BTreeMap;

use super::config::{SimConfig, VehicleOrdering};
use super::lane::SimLane;
use super::road::SimRoad;
use super::signal::TrafficSignal;
use super::signal_controller::{QueueDepths, SignalController, SignalTiming, SignalTransition};
use super::types::{LaneSide, Position, RoadId, SignalColor, SimId, VehicleId, VehicleState};
use super::vehicle::{SimVehicle, VehicleStep};

/// Result of one spawn attempt on a road
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnOutcome {
    /// The intensity draw failed, nothing was tried
    NotDrawn,
    /// The draw succeeded but both lane entry points were occupied
    Dropped,
    Spawned(VehicleId),
}

pub struct Scenario {
    config: SimConfig,
    /// Keyed by id, so iteration follows spawn order
    vehicles: BTreeMap<VehicleId, SimVehicle>,
    roads: [SimRoad; 2],
    controller: SignalController,
    next_id: usize,
}

impl Scenario {
    /// Build the intersection with vertical red and horizontal green
    pub fn new(config: SimConfig) -> Self {
        Self::with_signals(config, SignalColor::Red, SignalColor::Green)
    }

    /// Build the intersection with explicit starting signal colors
    pub fn with_signals(
        config: SimConfig,
        vertical: SignalColor,
        horizontal: SignalColor,
    ) -> Self {
        let controller =
            SignalController::new(vertical, horizontal, SignalTiming::from_config(&config));
        let roads = [
            SimRoad::new(RoadId::Vertical, config.vertical.traffic_intensity),
            SimRoad::new(RoadId::Horizontal, config.horizontal.traffic_intensity),
        ];
        Self {
            config,
            vehicles: BTreeMap::new(),
            roads,
            controller,
            next_id: 0,
        }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    fn next_vehicle_id(&mut self) -> VehicleId {
        let id = VehicleId(SimId(self.next_id));
        self.next_id += 1;
        id
    }

    pub fn road(&self, road: RoadId) -> &SimRoad {
        &self.roads[road.index()]
    }

    pub fn roads(&self) -> &[SimRoad; 2] {
        &self.roads
    }

    pub fn lanes_for(&self, road: RoadId) -> &[SimLane; 2] {
        self.road(road).lanes()
    }

    pub fn signal_for(&self, road: RoadId) -> &TrafficSignal {
        self.controller.signal(road)
    }

    pub fn controller(&self) -> &SignalController {
        &self.controller
    }

    pub fn vehicle(&self, vehicle_id: VehicleId) -> Option<&SimVehicle> {
        self.vehicles.get(&vehicle_id)
    }

    /// All live vehicles in spawn order
    pub fn vehicles(&self) -> impl Iterator<Item = &SimVehicle> {
        self.vehicles.values()
    }

    pub fn vehicle_count(&self) -> usize {
        self.vehicles.len()
    }

    pub fn queue_depth(&self, road: RoadId) -> usize {
        self.road(road).queue_depth(&self.vehicles)
    }

    pub fn queue_depths(&self) -> QueueDepths {
        QueueDepths {
            vertical: self.queue_depth(RoadId::Vertical),
            horizontal: self.queue_depth(RoadId::Horizontal),
        }
    }

    /// Whether a new vehicle would currently fit at a lane's entry point
    pub fn spawn_point_occupied(&self, road: RoadId, side: LaneSide) -> bool {
        let spawn_rect = self.config.spawn_rect(road, side);
        self.road(road)
            .lane(side)
            .spawn_point_occupied(&spawn_rect, &self.vehicles)
    }

    /// Draw against the road's intensity and, on success, spawn into a free lane
    pub fn attempt_spawn<R: Rng + ?Sized>(&mut self, road: RoadId, rng: &mut R) -> SpawnOutcome {
        let road_ref = self.road(road);
        if !road_ref.roll_spawn(rng) {
            return SpawnOutcome::NotDrawn;
        }

        match road_ref.choose_spawn_lane(rng, &self.vehicles, &self.config) {
            Some(side) => {
                let entry = self.config.lane_entry(road, side);
                let vehicle_id = self.insert_vehicle(road, side, entry);
                debug!("Spawned {vehicle_id:?} in {road:?} {side:?} lane");
                SpawnOutcome::Spawned(vehicle_id)
            }
            None => {
                trace!("Dropped spawn on {road:?} road, both lanes occupied");
                SpawnOutcome::Dropped
            }
        }
    }

    /// Register a vehicle at an explicit position, in its lane and the registry
    pub fn insert_vehicle(
        &mut self,
        road: RoadId,
        side: LaneSide,
        position: Position,
    ) -> VehicleId {
        let vehicle_id = self.next_vehicle_id();
        let vehicle = SimVehicle::new(vehicle_id, road, side, position, &self.config);
        self.roads[road.index()].lane_mut(side).push(vehicle_id);
        self.vehicles.insert(vehicle_id, vehicle);
        vehicle_id
    }

    /// Deregister a vehicle from the registry and its lane
    pub fn remove_vehicle(&mut self, vehicle_id: VehicleId) -> Option<SimVehicle> {
        let vehicle = self.vehicles.remove(&vehicle_id)?;
        self.roads[vehicle.road_id.index()]
            .lane_mut(vehicle.lane_id)
            .remove(vehicle_id);
        Some(vehicle)
    }

    /// Run the signal controller against the current queue depths
    pub fn advance_signals(&mut self, dt: f32) -> SignalTransition {
        let depths = self.queue_depths();
        self.controller.simulate(dt, &depths)
    }

    fn plan_vehicle(&self, vehicle: &SimVehicle, dt: f32) -> VehicleStep {
        let signal = self.controller.color_of(vehicle.road_id);
        let ahead = self
            .road(vehicle.road_id)
            .lane(vehicle.lane_id)
            .find_ahead(vehicle, &self.vehicles);
        vehicle.plan(signal, ahead, dt, &self.config)
    }

    /// Keep every follower the minimum gap behind a lane member whose step
    /// ends this tick waiting, which a plan made against pre-tick state can miss
    fn hold_queues(&self, steps: &mut BTreeMap<VehicleId, VehicleStep>) {
        for lane in self.roads.iter().flat_map(|road| road.lanes().iter()) {
            let mut members: Vec<&SimVehicle> = lane.members(&self.vehicles).collect();
            members.sort_by_key(|vehicle| OrderedFloat(vehicle.front()));

            for pair in members.windows(2) {
                let (ahead, follower) = (pair[0], pair[1]);
                if ahead.front() >= follower.front() {
                    continue;
                }
                let Some(ahead_step) = steps.get(&ahead.id).copied() else {
                    continue;
                };
                if ahead_step.state != VehicleState::Waiting {
                    continue;
                }

                let ahead_rear =
                    ahead.road_id.travel_coordinate(&ahead_step.position) + ahead.length();
                if let Some(step) = steps.get_mut(&follower.id) {
                    *step = follower.hold_behind(*step, ahead_rear, &self.config);
                }
            }
        }
    }

    /// Advance every vehicle by `dt` using the configured ordering
    pub fn advance_vehicles(&mut self, dt: f32) {
        match self.config.ordering {
            VehicleOrdering::Snapshot => {
                let mut steps: BTreeMap<VehicleId, VehicleStep> = self
                    .vehicles
                    .values()
                    .map(|vehicle| (vehicle.id, self.plan_vehicle(vehicle, dt)))
                    .collect();
                self.hold_queues(&mut steps);

                for (vehicle_id, step) in steps {
                    if let Some(vehicle) = self.vehicles.get_mut(&vehicle_id) {
                        vehicle.apply(step);
                    }
                }
            }
            VehicleOrdering::Sequential => {
                let vehicle_ids: Vec<VehicleId> = self.vehicles.keys().copied().collect();

                for vehicle_id in vehicle_ids {
                    let step = match self.vehicles.get(&vehicle_id) {
                        Some(vehicle) => self.plan_vehicle(vehicle, dt),
                        None => continue,
                    };
                    if let Some(vehicle) = self.vehicles.get_mut(&vehicle_id) {
                        vehicle.apply(step);
                    }
                }
            }
        }
    }

    /// Remove every vehicle whose bounding box has left the screen
    pub fn evict_off_screen(&mut self) -> Vec<SimVehicle> {
        let gone: Vec<VehicleId> = self
            .vehicles
            .values()
            .filter(|vehicle| vehicle.is_off_screen())
            .map(|vehicle| vehicle.id)
            .collect();

        gone.into_iter()
            .filter_map(|vehicle_id| {
                trace!("Evicting {vehicle_id:?}");
                self.remove_vehicle(vehicle_id)
            })
            .collect()
    }

    /// Check that registry and lanes agree: every vehicle is listed exactly
    /// once, in the lane matching its own road and lane fields, and every
    /// lane entry is a registered vehicle
    pub fn registration_consistent(&self) -> bool {
        let every_vehicle_placed = self.vehicles.values().all(|vehicle| {
            let memberships: usize = self
                .roads
                .iter()
                .flat_map(|road| road.lanes().iter())
                .map(|lane| {
                    lane.vehicle_ids()
                        .iter()
                        .filter(|id| **id == vehicle.id)
                        .count()
                })
                .sum();
            memberships == 1
                && self
                    .road(vehicle.road_id)
                    .lane(vehicle.lane_id)
                    .contains(vehicle.id)
        });

        let every_entry_registered = self.roads.iter().all(|road| {
            road.lanes().iter().all(|lane| {
                lane.road_id == road.id
                    && lane
                        .vehicle_ids()
                        .iter()
                        .all(|id| self.vehicles.contains_key(id))
            })
        });

        every_vehicle_placed && every_entry_registered
    }
}
