//! Lanes hold the spawn-ordered list of vehicles on one side of a road.

use ordered_float::OrderedFloat;
use std::collections::BTreeMap;

use super::types::{LaneSide, Rect, RoadId, VehicleId};
use super::vehicle::SimVehicle;

#[derive(Debug, Clone)]
pub struct SimLane {
    pub road_id: RoadId,
    pub side: LaneSide,
    /// Insertion order is spawn order
    vehicles: Vec<VehicleId>,
}

impl SimLane {
    pub fn new(road_id: RoadId, side: LaneSide) -> Self {
        Self {
            road_id,
            side,
            vehicles: Vec::new(),
        }
    }

    pub fn vehicle_ids(&self) -> &[VehicleId] {
        &self.vehicles
    }

    pub fn contains(&self, vehicle_id: VehicleId) -> bool {
        self.vehicles.contains(&vehicle_id)
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    pub(crate) fn push(&mut self, vehicle_id: VehicleId) {
        self.vehicles.push(vehicle_id);
    }

    /// Remove a vehicle, keeping the order of the rest
    pub(crate) fn remove(&mut self, vehicle_id: VehicleId) -> bool {
        match self.vehicles.iter().position(|id| *id == vehicle_id) {
            Some(index) => {
                self.vehicles.remove(index);
                true
            }
            None => false,
        }
    }

    /// Lane members resolved against the vehicle registry
    pub fn members<'a>(
        &'a self,
        registry: &'a BTreeMap<VehicleId, SimVehicle>,
    ) -> impl Iterator<Item = &'a SimVehicle> + 'a {
        self.vehicles.iter().filter_map(move |id| registry.get(id))
    }

    /// Nearest vehicle strictly ahead of `vehicle` in this lane
    pub fn find_ahead<'a>(
        &'a self,
        vehicle: &SimVehicle,
        registry: &'a BTreeMap<VehicleId, SimVehicle>,
    ) -> Option<&'a SimVehicle> {
        let front = vehicle.front();
        self.members(registry)
            .filter(|other| other.id != vehicle.id && other.front() < front)
            .min_by_key(|other| OrderedFloat(front - other.front()))
    }

    /// Number of lane members currently waiting
    pub fn waiting_count(&self, registry: &BTreeMap<VehicleId, SimVehicle>) -> usize {
        self.members(registry).filter(|v| v.is_waiting()).count()
    }

    /// Whether any lane member overlaps the given spawn area
    pub fn spawn_point_occupied(
        &self,
        spawn_rect: &Rect,
        registry: &BTreeMap<VehicleId, SimVehicle>,
    ) -> bool {
        self.members(registry)
            .any(|vehicle| vehicle.bounds().intersects(spawn_rect))
    }
}
