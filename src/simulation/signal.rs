use super::types::{RoadId, SignalColor};

/// A two-color light controlling one road
#[derive(Debug, Clone)]
pub struct TrafficSignal {
    pub road_id: RoadId,
    color: SignalColor,
}

impl TrafficSignal {
    pub fn new(road_id: RoadId, color: SignalColor) -> Self {
        Self { road_id, color }
    }

    pub fn color(&self) -> SignalColor {
        self.color
    }

    pub fn is_green(&self) -> bool {
        self.color == SignalColor::Green
    }

    pub fn set_color(&mut self, color: SignalColor) {
        self.color = color;
    }
}
