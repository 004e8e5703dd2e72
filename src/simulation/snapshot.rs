//! Read-only view of the scene for renderers and observers
//!
//! Each tick the engine can hand out a [`SceneSnapshot`]: plain data copied
//! out of the scenario, tagged by entity kind so a consumer can dispatch with
//! a `match` instead of inspecting types.

use super::scenario::Scenario;
use super::types::{LaneSide, Rect, RoadId, SignalColor, VehicleId, VehicleState};

#[derive(Debug, Clone, PartialEq)]
pub struct VehicleView {
    pub id: VehicleId,
    pub road_id: RoadId,
    pub lane_id: LaneSide,
    pub bounds: Rect,
    pub state: VehicleState,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoadView {
    pub road_id: RoadId,
    pub bounds: Rect,
    pub traffic_intensity: f32,
    pub queue_depth: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignalView {
    pub road_id: RoadId,
    pub color: SignalColor,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IntersectionView {
    pub bounds: Rect,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Vehicle(VehicleView),
    Road(RoadView),
    Signal(SignalView),
    Intersection(IntersectionView),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneSnapshot {
    pub virtual_time: f32,
    pub real_time: f32,
    /// Roads, intersection and signals first, then vehicles in spawn order
    pub entities: Vec<Entity>,
}

impl SceneSnapshot {
    pub fn capture(scenario: &Scenario, virtual_time: f32, real_time: f32) -> Self {
        let config = scenario.config();
        let mut entities = Vec::with_capacity(5 + scenario.vehicle_count());

        for road in RoadId::ALL {
            entities.push(Entity::Road(RoadView {
                road_id: road,
                bounds: config.road_rect(road),
                traffic_intensity: scenario.road(road).traffic_intensity,
                queue_depth: scenario.queue_depth(road),
            }));
        }

        entities.push(Entity::Intersection(IntersectionView {
            bounds: config.intersection_rect(),
        }));

        for road in RoadId::ALL {
            entities.push(Entity::Signal(SignalView {
                road_id: road,
                color: scenario.signal_for(road).color(),
            }));
        }

        entities.extend(scenario.vehicles().map(|vehicle| {
            Entity::Vehicle(VehicleView {
                id: vehicle.id,
                road_id: vehicle.road_id,
                lane_id: vehicle.lane_id,
                bounds: vehicle.bounds(),
                state: vehicle.state,
            })
        }));

        Self {
            virtual_time,
            real_time,
            entities,
        }
    }

    pub fn vehicles(&self) -> impl Iterator<Item = &VehicleView> {
        self.entities.iter().filter_map(|entity| match entity {
            Entity::Vehicle(view) => Some(view),
            _ => None,
        })
    }

    pub fn signals(&self) -> impl Iterator<Item = &SignalView> {
        self.entities.iter().filter_map(|entity| match entity {
            Entity::Signal(view) => Some(view),
            _ => None,
        })
    }
}
