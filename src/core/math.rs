// Math utilities and helper functions

use glam::Vec2;

/// Clamp a value between min and max
pub fn clamp<T: PartialOrd>(value: T, min: T, max: T) -> T {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Where `value` sits between `a` and `b`, as an unclamped interpolation factor
pub fn inverse_lerp(a: f32, b: f32, value: f32) -> f32 {
    if approx_equal(a, b, f32::EPSILON) {
        return 0.0;
    }
    (value - a) / (b - a)
}

/// Check if two f32 values are approximately equal
pub fn approx_equal(a: f32, b: f32, epsilon: f32) -> bool {
    (a - b).abs() < epsilon
}

/// Map an analog magnitude through a deadzone.
///
/// Anything at or below `deadzone` reads as 0.0, the rest is rescaled so the
/// deadzone edge maps to 0.0 and full deflection maps to 1.0.
pub fn apply_deadzone(magnitude: f32, deadzone: f32) -> f32 {
    if magnitude <= deadzone {
        return 0.0;
    }
    clamp(inverse_lerp(deadzone, 1.0, magnitude), 0.0, 1.0)
}

/// Apply a radial deadzone to a 2D input vector, limiting its length to 1.0
pub fn apply_radial_deadzone(vector: Vec2, deadzone: f32) -> Vec2 {
    let length = vector.length();
    if length <= deadzone {
        return Vec2::ZERO;
    }
    if length > 1.0 {
        return vector / length;
    }
    vector * (apply_deadzone(length, deadzone) / length)
}
