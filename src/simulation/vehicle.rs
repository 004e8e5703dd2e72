//! Vehicle behavior for the intersection simulation
//!
//! A vehicle re-evaluates its Moving/Waiting state from scratch every tick.
//! Planning is separated from applying so the tick driver can choose whether
//! vehicles see each other's pre-tick or in-progress state.

use super::config::SimConfig;
use super::types::{LaneSide, Position, Rect, RoadId, SignalColor, VehicleId, VehicleState};

/// Outcome of planning one tick for a vehicle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleStep {
    pub state: VehicleState,
    pub position: Position,
}

/// A vehicle travelling along one lane toward (and past) the stop line
#[derive(Debug, Clone)]
pub struct SimVehicle {
    pub id: VehicleId,
    pub road_id: RoadId,
    pub lane_id: LaneSide,
    pub width: f32,
    pub height: f32,
    /// Meters per second, fixed after spawn
    pub velocity: f32,
    /// Top-left corner in pixels
    pub position: Position,
    pub state: VehicleState,
    /// Travel-axis coordinate where a red light holds the vehicle's front
    pub stop_line_position: f32,
}

impl SimVehicle {
    pub fn new(
        id: VehicleId,
        road_id: RoadId,
        lane_id: LaneSide,
        position: Position,
        config: &SimConfig,
    ) -> Self {
        let (width, height) = config.vehicle_size(road_id);
        Self {
            id,
            road_id,
            lane_id,
            width,
            height,
            velocity: config.vehicle_velocity_mps,
            position,
            state: VehicleState::Moving,
            stop_line_position: config.stop_line(road_id),
        }
    }

    /// Leading edge along the travel axis
    pub fn front(&self) -> f32 {
        self.road_id.travel_coordinate(&self.position)
    }

    /// Extent along the travel axis
    pub fn length(&self) -> f32 {
        match self.road_id {
            RoadId::Vertical => self.height,
            RoadId::Horizontal => self.width,
        }
    }

    /// Trailing edge along the travel axis
    pub fn rear(&self) -> f32 {
        self.front() + self.length()
    }

    pub fn bounds(&self) -> Rect {
        Rect::at(self.position, self.width, self.height)
    }

    pub fn is_waiting(&self) -> bool {
        self.state == VehicleState::Waiting
    }

    /// True once the bounding box has fully left the screen
    pub fn is_off_screen(&self) -> bool {
        self.rear() <= 0.0
    }

    /// Free space between this vehicle's front and the rear of `ahead`
    pub fn gap_to(&self, ahead: &SimVehicle) -> f32 {
        self.front() - ahead.rear()
    }

    /// Decide this tick's state and resulting position without mutating
    ///
    /// `ahead` is the nearest vehicle strictly ahead in the same lane, if any.
    pub fn plan(
        &self,
        signal: SignalColor,
        ahead: Option<&SimVehicle>,
        dt: f32,
        config: &SimConfig,
    ) -> VehicleStep {
        let distance = self.velocity * dt * config.pixels_per_meter;
        let front = self.front();
        let stop = self.stop_line_position;

        // Held by a waiting vehicle ahead: stay put whatever the signal shows
        let blocked = ahead.is_some_and(|ahead| {
            ahead.is_waiting() && self.gap_to(ahead) <= config.min_following_gap_px()
        });
        if blocked {
            return VehicleStep {
                state: VehicleState::Waiting,
                position: self.position,
            };
        }

        let mut target = front - distance;
        let mut state = VehicleState::Moving;

        // Would close within the minimum gap of a waiting vehicle: stop right at it
        if let Some(ahead) = ahead.filter(|ahead| ahead.is_waiting()) {
            let limit = ahead.rear() + config.min_following_gap_px();
            if target <= limit {
                target = limit;
                state = VehicleState::Waiting;
            }
        }

        if signal == SignalColor::Red {
            if front > stop && target <= stop {
                // Would cross the line this tick: hold exactly at it
                target = stop;
                state = VehicleState::Waiting;
            } else if front <= stop && front >= stop - config.stop_line_tolerance_px {
                target = front;
                state = VehicleState::Waiting;
            }
            // Otherwise committed past the line or still approaching it
        }

        let mut position = self.position;
        self.road_id.set_travel_coordinate(&mut position, target);
        VehicleStep { state, position }
    }

    /// Hold a planned step back so it keeps the minimum gap behind a vehicle
    /// whose own step for this tick ends with its rear at `ahead_rear`, waiting
    ///
    /// The vehicle never moves backwards: if it is already closer than the
    /// minimum gap it stays where it is.
    pub fn hold_behind(
        &self,
        step: VehicleStep,
        ahead_rear: f32,
        config: &SimConfig,
    ) -> VehicleStep {
        let limit = ahead_rear + config.min_following_gap_px();
        if self.road_id.travel_coordinate(&step.position) >= limit {
            return step;
        }

        let mut position = step.position;
        self.road_id.set_travel_coordinate(&mut position, limit.min(self.front()));
        VehicleStep {
            state: VehicleState::Waiting,
            position,
        }
    }

    pub fn apply(&mut self, step: VehicleStep) {
        self.state = step.state;
        self.position = step.position;
    }
}
