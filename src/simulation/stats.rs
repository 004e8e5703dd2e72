//! Run statistics sampled from the engine after each tick
//!
//! Tracks how many vehicles wait over time and how long each vehicle spent
//! waiting before it left the screen.

use log::info;
use std::collections::HashMap;

use super::engine::TickReport;
use super::scenario::Scenario;
use super::signal_controller::SignalTransition;
use super::types::{RoadId, VehicleId};

#[derive(Debug, Clone, Default)]
pub struct SimulationStats {
    pub vehicles_spawned: usize,
    pub vehicles_evicted: usize,
    pub spawns_dropped: usize,
    pub signal_switches: usize,

    pub total_virtual_time: f32,
    /// Sum of waiting count times tick length
    pub waiting_integral: f32,
    pub samples: usize,
    pub vertical_waiting_sum: usize,
    pub horizontal_waiting_sum: usize,
    pub peak_vertical_queue: usize,
    pub peak_horizontal_queue: usize,

    /// Waiting seconds accumulated by each live vehicle
    wait_times: HashMap<VehicleId, f32>,
    /// `(vehicle, waiting seconds)` for every vehicle that has been finalised
    pub final_wait_times: Vec<(VehicleId, f32)>,
}

impl SimulationStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sample the scenario right after `report`'s tick completed
    pub fn record_tick(&mut self, report: &TickReport, scenario: &Scenario) {
        let dt = report.virtual_dt;

        self.vehicles_spawned += report.spawned.len();
        self.spawns_dropped += report.dropped_spawns;
        if matches!(report.signal, SignalTransition::Switched { .. }) {
            self.signal_switches += 1;
        }

        for vehicle_id in &report.spawned {
            self.wait_times.entry(*vehicle_id).or_insert(0.0);
        }

        for vehicle in &report.evicted {
            let waited = self.wait_times.remove(&vehicle.id).unwrap_or(0.0);
            self.final_wait_times.push((vehicle.id, waited));
            self.vehicles_evicted += 1;
        }

        for vehicle in scenario.vehicles().filter(|v| v.is_waiting()) {
            *self.wait_times.entry(vehicle.id).or_insert(0.0) += dt;
        }

        let vertical = scenario.queue_depth(RoadId::Vertical);
        let horizontal = scenario.queue_depth(RoadId::Horizontal);
        self.samples += 1;
        self.vertical_waiting_sum += vertical;
        self.horizontal_waiting_sum += horizontal;
        self.peak_vertical_queue = self.peak_vertical_queue.max(vertical);
        self.peak_horizontal_queue = self.peak_horizontal_queue.max(horizontal);
        self.waiting_integral += (vertical + horizontal) as f32 * dt;
        self.total_virtual_time += dt;
    }

    /// Close out the waiting time of every vehicle still on screen
    pub fn finalize(&mut self) {
        let mut remaining: Vec<(VehicleId, f32)> = self.wait_times.drain().collect();
        remaining.sort_by_key(|(vehicle_id, _)| *vehicle_id);
        self.final_wait_times.extend(remaining);
    }

    /// Time-weighted mean number of waiting vehicles over the run
    pub fn average_waiting_vehicles(&self) -> f32 {
        if self.total_virtual_time == 0.0 {
            return 0.0;
        }
        self.waiting_integral / self.total_virtual_time
    }

    /// Per-sample mean of a road's queue depth
    pub fn average_queue(&self, road: RoadId) -> f32 {
        if self.samples == 0 {
            return 0.0;
        }
        let sum = match road {
            RoadId::Vertical => self.vertical_waiting_sum,
            RoadId::Horizontal => self.horizontal_waiting_sum,
        };
        sum as f32 / self.samples as f32
    }

    /// Mean waiting seconds over all finalised vehicles
    pub fn average_vehicle_wait_time(&self) -> f32 {
        if self.final_wait_times.is_empty() {
            return 0.0;
        }
        let total: f32 = self.final_wait_times.iter().map(|(_, waited)| waited).sum();
        total / self.final_wait_times.len() as f32
    }

    pub fn log_summary(&self) {
        info!("Virtual time: {:.2}s", self.total_virtual_time);
        info!("Total vehicles spawned: {}", self.vehicles_spawned);
        info!("Total vehicles exited: {}", self.vehicles_evicted);
        info!("Spawns dropped (lanes full): {}", self.spawns_dropped);
        info!("Signal switches: {}", self.signal_switches);
        info!(
            "Average waiting vehicles: {:.2}",
            self.average_waiting_vehicles()
        );
        info!(
            "Average vertical queue: {:.2} (peak {})",
            self.average_queue(RoadId::Vertical),
            self.peak_vertical_queue
        );
        info!(
            "Average horizontal queue: {:.2} (peak {})",
            self.average_queue(RoadId::Horizontal),
            self.peak_horizontal_queue
        );
        info!(
            "Average vehicle wait time: {:.2}s",
            self.average_vehicle_wait_time()
        );
    }
}
