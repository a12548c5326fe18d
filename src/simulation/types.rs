//! Core types for the intersection simulation

use std::fmt;

/// A unique identifier for simulation entities
/// This is a simple wrapper around a usize for type safety
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SimId(pub usize);

/// A wrapper type for vehicle IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VehicleId(pub SimId);

/// One of the four roads feeding the intersection
///
/// Phases cycle in declaration order: A, B, C, D, A, ...
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Road {
    /// Enters from the top edge, travelling down
    A,
    /// Enters from the right edge, travelling left
    B,
    /// Enters from the bottom edge, travelling up
    C,
    /// Enters from the left edge, travelling right
    D,
}

impl Road {
    pub const ALL: [Road; 4] = [Road::A, Road::B, Road::C, Road::D];

    /// The road that receives the green after this one
    pub fn next(self) -> Road {
        match self {
            Road::A => Road::B,
            Road::B => Road::C,
            Road::C => Road::D,
            Road::D => Road::A,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Road::A => 0,
            Road::B => 1,
            Road::C => 2,
            Road::D => 3,
        }
    }

    pub fn letter(self) -> char {
        match self {
            Road::A => 'A',
            Road::B => 'B',
            Road::C => 'C',
            Road::D => 'D',
        }
    }

    /// Map the numeric road field of a 5-field record (1..=4)
    pub fn from_number(number: u32) -> Option<Road> {
        match number {
            1 => Some(Road::A),
            2 => Some(Road::B),
            3 => Some(Road::C),
            4 => Some(Road::D),
            _ => None,
        }
    }
}

impl fmt::Display for Road {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// How vehicles in a lane move through the intersection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaneKind {
    /// Goes straight across, waits for the road's green
    Through,
    /// Turns left at a fixed point, never waits for the signal
    Turn,
}

/// Identifies one lane queue: a road plus a zero-based lane index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LaneKey {
    pub road: Road,
    pub lane: usize,
}

impl LaneKey {
    pub fn new(road: Road, lane: usize) -> Self {
        Self { road, lane }
    }
}

/// State of a single traffic light
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightState {
    Red,
    Green,
}

/// A coordinate axis of the intersection frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    pub fn other(self) -> Axis {
        match self {
            Axis::X => Axis::Y,
            Axis::Y => Axis::X,
        }
    }
}

/// A 2D position in the intersection frame (pixels, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Position) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn coord(&self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    pub fn set_coord(&mut self, axis: Axis, value: f32) {
        match axis {
            Axis::X => self.x = value,
            Axis::Y => self.y = value,
        }
    }
}
