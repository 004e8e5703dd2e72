//! Core types for the intersection simulation
//!
//! Identifiers, road/lane enums and the small geometry helpers shared by
//! every component.

/// A unique identifier for simulation entities
/// This is a simple wrapper around a usize for type safety
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SimId(pub usize);

/// A wrapper type for vehicle IDs
///
/// Ids are handed out in spawn order, so ordering by id is ordering by spawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VehicleId(pub SimId);

/// One of the two roads crossing at the intersection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoadId {
    /// Travels toward decreasing `y`
    Vertical,
    /// Travels toward decreasing `x`
    Horizontal,
}

impl RoadId {
    pub const ALL: [RoadId; 2] = [RoadId::Vertical, RoadId::Horizontal];

    /// Index into per-road arrays
    pub fn index(self) -> usize {
        match self {
            RoadId::Vertical => 0,
            RoadId::Horizontal => 1,
        }
    }

    pub fn other(self) -> RoadId {
        match self {
            RoadId::Vertical => RoadId::Horizontal,
            RoadId::Horizontal => RoadId::Vertical,
        }
    }

    /// Coordinate of `position` along this road's travel axis
    pub fn travel_coordinate(self, position: &Position) -> f32 {
        match self {
            RoadId::Vertical => position.y,
            RoadId::Horizontal => position.x,
        }
    }

    /// Overwrite the travel-axis coordinate of `position`
    pub fn set_travel_coordinate(self, position: &mut Position, value: f32) {
        match self {
            RoadId::Vertical => position.y = value,
            RoadId::Horizontal => position.x = value,
        }
    }

    /// Move `position` forward by `distance` pixels (toward decreasing coordinate)
    pub fn advance(self, position: &mut Position, distance: f32) {
        let current = self.travel_coordinate(position);
        self.set_travel_coordinate(position, current - distance);
    }
}

/// Which side of a road a lane sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LaneSide {
    Left,
    Right,
}

impl LaneSide {
    pub fn index(self) -> usize {
        match self {
            LaneSide::Left => 0,
            LaneSide::Right => 1,
        }
    }

    pub fn other(self) -> LaneSide {
        match self {
            LaneSide::Left => LaneSide::Right,
            LaneSide::Right => LaneSide::Left,
        }
    }
}

/// Behavior state of a vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VehicleState {
    #[default]
    Moving,
    Waiting,
}

/// Color shown by a traffic signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalColor {
    Red,
    Green,
}

impl SignalColor {
    pub fn opposite(self) -> SignalColor {
        match self {
            SignalColor::Red => SignalColor::Green,
            SignalColor::Green => SignalColor::Red,
        }
    }
}

/// A 2D position in screen pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in screen pixels, anchored at its top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn at(position: Position, width: f32, height: f32) -> Self {
        Self::new(position.x, position.y, width, height)
    }

    /// Grow the rectangle by `margin` on every side
    pub fn inflate(&self, margin: f32) -> Rect {
        Rect {
            x: self.x - margin,
            y: self.y - margin,
            width: self.width + 2.0 * margin,
            height: self.height + 2.0 * margin,
        }
    }

    /// Strict overlap test; rectangles that only share an edge do not intersect
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }
}
