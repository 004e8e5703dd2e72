//! Roads own their two lanes and decide where (and whether) a new vehicle
//! may enter.

use log::trace;
use rand::Rng;
use std::collections::BTreeMap;

use super::config::SimConfig;
use super::lane::SimLane;
use super::types::{LaneSide, RoadId, VehicleId};
use super::vehicle::SimVehicle;

#[derive(Debug, Clone)]
pub struct SimRoad {
    pub id: RoadId,
    /// Spawn probability per tick, constant for the run
    pub traffic_intensity: f32,
    lanes: [SimLane; 2],
}

impl SimRoad {
    pub fn new(id: RoadId, traffic_intensity: f32) -> Self {
        Self {
            id,
            traffic_intensity,
            lanes: [
                SimLane::new(id, LaneSide::Left),
                SimLane::new(id, LaneSide::Right),
            ],
        }
    }

    pub fn lane(&self, side: LaneSide) -> &SimLane {
        &self.lanes[side.index()]
    }

    pub(crate) fn lane_mut(&mut self, side: LaneSide) -> &mut SimLane {
        &mut self.lanes[side.index()]
    }

    pub fn lanes(&self) -> &[SimLane; 2] {
        &self.lanes
    }

    /// Draw one sample against the traffic intensity
    pub fn roll_spawn<R: Rng + ?Sized>(&self, rng: &mut R) -> bool {
        rng.random::<f32>() < self.traffic_intensity
    }

    /// Pick a lane for a new vehicle: a random first choice, then the other
    /// lane, or `None` when both entry points are occupied
    pub fn choose_spawn_lane<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        registry: &BTreeMap<VehicleId, SimVehicle>,
        config: &SimConfig,
    ) -> Option<LaneSide> {
        let first = if rng.random_bool(0.5) {
            LaneSide::Left
        } else {
            LaneSide::Right
        };

        [first, first.other()].into_iter().find(|side| {
            let spawn_rect = config.spawn_rect(self.id, *side);
            let occupied = self.lane(*side).spawn_point_occupied(&spawn_rect, registry);
            if occupied {
                trace!("{:?} {:?} lane spawn point occupied", self.id, side);
            }
            !occupied
        })
    }

    /// Vehicles waiting anywhere on this road
    pub fn queue_depth(&self, registry: &BTreeMap<VehicleId, SimVehicle>) -> usize {
        self.lanes
            .iter()
            .map(|lane| lane.waiting_count(registry))
            .sum()
    }
}
