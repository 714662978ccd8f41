//! Percentage-space geometry for damage regions.
//!
//! Every coordinate here is a percentage (0-100) of the displayed image's
//! width or height, so boxes stay aligned however the image is scaled.
//! Values outside 0-100 are legal: a pointer dragged past the image edge
//! produces them and boxes are allowed to clip.

use serde::{Deserialize, Serialize};

use crate::constants::PERCENT_SCALE;

/// A pointer position in percentage space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Convert a raw client-space pointer position into percentages of the
    /// element it landed on. No clamping is applied.
    pub fn from_client(client_x: f32, client_y: f32, bounds: &ElementBounds) -> Self {
        Self {
            x: bounds.fraction_x(client_x) * PERCENT_SCALE,
            y: bounds.fraction_y(client_y) * PERCENT_SCALE,
        }
    }
}

/// Client-space bounding box of the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ElementBounds {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl ElementBounds {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    fn fraction_x(&self, client_x: f32) -> f32 {
        if self.width == 0.0 {
            return 0.0;
        }
        (client_x - self.left) / self.width
    }

    fn fraction_y(&self, client_y: f32) -> f32 {
        if self.height == 0.0 {
            return 0.0;
        }
        (client_y - self.top) / self.height
    }
}

/// An axis-aligned rectangle in percentage space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Width, never negative
    pub width: f32,
    /// Height, never negative
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    /// Normalized rectangle spanned by two drag points.
    ///
    /// The result does not depend on which point was the anchor.
    pub fn from_drag(p1: Point, p2: Point) -> Self {
        Self {
            x: p1.x.min(p2.x),
            y: p1.y.min(p2.y),
            width: (p2.x - p1.x).abs(),
            height: (p2.y - p1.y).abs(),
        }
    }

    /// Fixed-size square placed around `center`, pushed back inside the
    /// top/left edges when it would start at a negative coordinate.
    pub fn manual_at(center: Point, size: f32) -> Self {
        let half = size / 2.0;
        Self::new(
            (center.x - half).max(0.0),
            (center.y - half).max(0.0),
            size,
            size,
        )
    }

    /// Whether both sides strictly exceed `min_size`.
    pub fn exceeds(&self, min_size: f32) -> bool {
        self.width > min_size && self.height > min_size
    }

    /// Check if a point is inside the rectangle (edges included).
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn area(&self) -> f32 {
        self.width * self.height
    }
}
