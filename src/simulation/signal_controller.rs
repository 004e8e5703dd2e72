//! Adaptive signal control
//!
//! One road is green at a time. The green road keeps right-of-way for at
//! least `min_green`, hands it over early once the red road's queue grows
//! past its threshold, and hands it over unconditionally at `max_green`.
//! Every hand-over passes through a both-red dwell.

use log::debug;

use super::config::SimConfig;
use super::signal::TrafficSignal;
use super::types::{RoadId, SignalColor};

/// Slack for comparing accumulated f32 time against configured durations
const TIME_EPSILON: f32 = 1e-4;

/// Timing and threshold parameters for [`SignalController`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalTiming {
    pub min_green: f32,
    pub max_green: f32,
    pub both_red: f32,
    pub vertical_threshold: usize,
    pub horizontal_threshold: usize,
}

impl SignalTiming {
    pub fn from_config(config: &SimConfig) -> Self {
        Self {
            min_green: config.min_green_secs,
            max_green: config.max_green_secs,
            both_red: config.both_red_secs,
            vertical_threshold: config.vertical.queue_threshold,
            horizontal_threshold: config.horizontal.queue_threshold,
        }
    }

    pub fn threshold(&self, road: RoadId) -> usize {
        match road {
            RoadId::Vertical => self.vertical_threshold,
            RoadId::Horizontal => self.horizontal_threshold,
        }
    }
}

/// Waiting-vehicle counts per road, measured before the controller runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QueueDepths {
    pub vertical: usize,
    pub horizontal: usize,
}

impl QueueDepths {
    pub fn of(&self, road: RoadId) -> usize {
        match road {
            RoadId::Vertical => self.vertical,
            RoadId::Horizontal => self.horizontal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SignalPhase {
    GreenVertical,
    BothRed { remaining: f32 },
    GreenHorizontal,
}

/// What a call to [`SignalController::simulate`] changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalTransition {
    None,
    /// Green was withdrawn and the both-red dwell started
    BothRedStarted,
    /// The dwell finished and the pending colors were applied
    Switched { green: RoadId },
}

#[derive(Debug, Clone)]
pub struct SignalController {
    vertical: TrafficSignal,
    horizontal: TrafficSignal,
    timing: SignalTiming,
    /// Seconds since the current green phase began
    virtual_time_elapsed: f32,
    both_red_remaining: f32,
    /// `(vertical, horizontal)` colors to apply when the dwell ends
    pending: Option<(SignalColor, SignalColor)>,
}

impl SignalController {
    /// Build a controller; identical starting colors resolve to vertical green
    pub fn new(vertical: SignalColor, horizontal: SignalColor, timing: SignalTiming) -> Self {
        let (vertical, horizontal) = if vertical == horizontal {
            (SignalColor::Green, SignalColor::Red)
        } else {
            (vertical, horizontal)
        };

        Self {
            vertical: TrafficSignal::new(RoadId::Vertical, vertical),
            horizontal: TrafficSignal::new(RoadId::Horizontal, horizontal),
            timing,
            virtual_time_elapsed: 0.0,
            both_red_remaining: 0.0,
            pending: None,
        }
    }

    pub fn signal(&self, road: RoadId) -> &TrafficSignal {
        match road {
            RoadId::Vertical => &self.vertical,
            RoadId::Horizontal => &self.horizontal,
        }
    }

    pub fn color_of(&self, road: RoadId) -> SignalColor {
        self.signal(road).color()
    }

    pub fn timing(&self) -> &SignalTiming {
        &self.timing
    }

    pub fn virtual_time_elapsed(&self) -> f32 {
        self.virtual_time_elapsed
    }

    pub fn both_red_remaining(&self) -> f32 {
        self.both_red_remaining
    }

    pub fn phase(&self) -> SignalPhase {
        if self.pending.is_some() {
            SignalPhase::BothRed {
                remaining: self.both_red_remaining,
            }
        } else if self.vertical.is_green() {
            SignalPhase::GreenVertical
        } else {
            SignalPhase::GreenHorizontal
        }
    }

    /// The road currently holding green, if any
    pub fn green_road(&self) -> Option<RoadId> {
        RoadId::ALL
            .into_iter()
            .find(|road| self.signal(*road).is_green())
    }

    /// Advance the controller by `dt` virtual seconds
    pub fn simulate(&mut self, dt: f32, depths: &QueueDepths) -> SignalTransition {
        if let Some((vertical, horizontal)) = self.pending {
            self.both_red_remaining -= dt;
            if self.both_red_remaining <= TIME_EPSILON {
                self.vertical.set_color(vertical);
                self.horizontal.set_color(horizontal);
                self.pending = None;
                self.both_red_remaining = 0.0;

                let green = if vertical == SignalColor::Green {
                    RoadId::Vertical
                } else {
                    RoadId::Horizontal
                };
                return SignalTransition::Switched { green };
            }
            return SignalTransition::None;
        }

        self.virtual_time_elapsed += dt;

        // Outside the dwell exactly one signal is green
        let green = if self.vertical.is_green() {
            RoadId::Vertical
        } else {
            RoadId::Horizontal
        };
        let red = green.other();
        let queue_depth = depths.of(red);
        let threshold = self.timing.threshold(red);

        if self.virtual_time_elapsed + TIME_EPSILON >= self.timing.max_green {
            debug!(
                "{green:?} green hit max duration after {:.2}s (queue on {red:?}: {queue_depth})",
                self.virtual_time_elapsed
            );
            self.toggle_signals();
            SignalTransition::BothRedStarted
        } else if self.virtual_time_elapsed + TIME_EPSILON >= self.timing.min_green
            && queue_depth > threshold
        {
            debug!(
                "{red:?} queue {queue_depth} over {threshold} after {:.2}s of {green:?} green",
                self.virtual_time_elapsed
            );
            self.toggle_signals();
            SignalTransition::BothRedStarted
        } else {
            SignalTransition::None
        }
    }

    /// Start the hand-over: both red now, opposite colors after the dwell
    pub fn toggle_signals(&mut self) {
        if self.pending.is_some() {
            return;
        }
        self.pending = Some((
            self.vertical.color().opposite(),
            self.horizontal.color().opposite(),
        ));
        self.vertical.set_color(SignalColor::Red);
        self.horizontal.set_color(SignalColor::Red);
        self.both_red_remaining = self.timing.both_red;
        self.virtual_time_elapsed = 0.0;
    }
}
