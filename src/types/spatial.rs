// Copyright (c) 2024 Mike Tsao

use nalgebra::Vector3;

/// A point in the host's world space.
pub type Position = Vector3<f64>;

/// The Euclidean distance between two world positions.
pub fn distance_between(a: &Position, b: &Position) -> f64 {
    (a - b).norm()
}
