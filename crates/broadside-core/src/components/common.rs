//! Common components and geometry shared by crew, stations and crises.

use serde::{Deserialize, Serialize};

/// 2D position in ship space (pixels, y grows downward)
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance_squared(&self, other: &Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    pub fn distance(&self, other: &Self) -> f32 {
        self.distance_squared(other).sqrt()
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

impl std::ops::Add for Vec2 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl std::ops::Mul<f32> for Vec2 {
    type Output = Self;
    fn mul(self, scalar: f32) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
        }
    }
}

/// Axis-aligned footprint, stored as centre plus size
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Rect {
    pub center: Vec2,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(center: Vec2, width: f32, height: f32) -> Self {
        Self {
            center,
            width,
            height,
        }
    }

    pub fn min(&self) -> Vec2 {
        Vec2::new(
            self.center.x - self.width / 2.0,
            self.center.y - self.height / 2.0,
        )
    }

    pub fn max(&self) -> Vec2 {
        Vec2::new(
            self.center.x + self.width / 2.0,
            self.center.y + self.height / 2.0,
        )
    }

    pub fn contains(&self, point: &Vec2) -> bool {
        let min = self.min();
        let max = self.max();
        point.x >= min.x && point.x <= max.x && point.y >= min.y && point.y <= max.y
    }
}

/// Where a crew member is currently standing
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Position(pub Vec2);

/// Movement component - present only while a crew member walks somewhere
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Movement {
    pub destination: Vec2,
    /// Pixels per second
    pub speed: f32,
}

impl Movement {
    pub const fn new(destination: Vec2, speed: f32) -> Self {
        Self { destination, speed }
    }
}
