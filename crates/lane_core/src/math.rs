//! Fixed-point math utilities for deterministic simulation.
//!
//! All combat simulation uses fixed-point arithmetic so that the same
//! sequence of ticks produces the same battlefield on every run.
//! Elapsed time is expressed as a fixed-point number of seconds.

use fixed::types::I32F32;
use serde::{Deserialize, Serialize};

/// Fixed-point number type for all simulation math.
///
/// Uses 32 bits for integer part and 32 bits for fractional part.
pub type Fixed = I32F32;

/// Fixed-point 2D vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Vec2Fixed {
    /// X coordinate.
    #[serde(with = "fixed_serde")]
    pub x: Fixed,
    /// Y coordinate.
    #[serde(with = "fixed_serde")]
    pub y: Fixed,
}

/// Serde support for fixed-point numbers.
///
/// Serializes fixed-point numbers as their raw bit representation (i64)
/// to preserve exact precision across serialization boundaries.
pub mod fixed_serde {
    use super::Fixed;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize a fixed-point number as its raw bit representation.
    pub fn serialize<S>(value: &Fixed, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        value.to_bits().serialize(serializer)
    }

    /// Deserialize a fixed-point number from its raw bit representation.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Fixed, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bits = i64::deserialize(deserializer)?;
        Ok(Fixed::from_bits(bits))
    }
}

impl Vec2Fixed {
    /// Create a new fixed-point vector.
    #[must_use]
    pub const fn new(x: Fixed, y: Fixed) -> Self {
        Self { x, y }
    }

    /// Zero vector.
    pub const ZERO: Self = Self {
        x: Fixed::ZERO,
        y: Fixed::ZERO,
    };

    /// Calculate squared distance (avoids sqrt for comparisons).
    #[must_use]
    pub fn distance_squared(self, other: Self) -> Fixed {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Squared length of the vector.
    #[must_use]
    pub fn length_squared(self) -> Fixed {
        self.x * self.x + self.y * self.y
    }

    /// Length of the vector.
    #[must_use]
    pub fn length(self) -> Fixed {
        fixed_sqrt(self.length_squared())
    }

    /// Scale both components by a scalar.
    #[must_use]
    pub fn scaled(self, factor: Fixed) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }

    /// Normalize vector using fixed-point math.
    ///
    /// Returns the zero vector when the input has (near) zero length,
    /// so callers must handle the degenerate case themselves.
    #[must_use]
    pub fn normalize(self) -> Self {
        let len = self.length();
        if len == Fixed::ZERO {
            return Self::ZERO;
        }
        Self::new(self.x / len, self.y / len)
    }
}

/// Computes the square root of a fixed-point number using binary search.
///
/// This is deterministic and avoids overflow issues.
#[must_use]
pub fn fixed_sqrt(value: Fixed) -> Fixed {
    if value <= Fixed::ZERO {
        return Fixed::ZERO;
    }

    let mut low = Fixed::ZERO;
    let mut high = if value > Fixed::from_num(1) {
        value
    } else {
        Fixed::from_num(1)
    };

    // 32 iterations gives us good precision for I32F32
    for _ in 0..32 {
        let mid = (low + high) / Fixed::from_num(2);
        let mid_sq = mid.saturating_mul(mid);

        if mid_sq <= value {
            low = mid;
        } else {
            high = mid;
        }
    }

    low
}

impl std::ops::Add for Vec2Fixed {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl std::ops::Sub for Vec2Fixed {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec2_distance_squared() {
        let a = Vec2Fixed::new(Fixed::from_num(3), Fixed::from_num(0));
        let b = Vec2Fixed::new(Fixed::from_num(0), Fixed::from_num(4));
        let dist_sq = a.distance_squared(b);
        // 3² + 4² = 25
        assert_eq!(dist_sq, Fixed::from_num(25));
    }

    #[test]
    fn test_fixed_determinism() {
        // Same operations must produce identical results
        let a = Fixed::from_num(1) / Fixed::from_num(3);
        let b = Fixed::from_num(1) / Fixed::from_num(3);
        assert_eq!(a, b);

        let result1 = a * Fixed::from_num(7);
        let result2 = b * Fixed::from_num(7);
        assert_eq!(result1, result2);
    }

    #[test]
    fn test_vec2_normalize() {
        let v = Vec2Fixed::new(Fixed::from_num(3), Fixed::from_num(4));
        let norm = v.normalize();

        // Length squared should be very close to 1
        let len_sq = norm.length_squared();
        let one = Fixed::from_num(1);
        let epsilon = one / Fixed::from_num(10000);
        assert!(
            (len_sq - one).abs() < epsilon,
            "normalized vector length² should be ~1, got {:?}",
            len_sq
        );
    }

    #[test]
    fn test_normalize_zero_vector() {
        assert_eq!(Vec2Fixed::ZERO.normalize(), Vec2Fixed::ZERO);
    }

    #[test]
    fn test_scaled() {
        let v = Vec2Fixed::new(Fixed::from_num(2), Fixed::from_num(-1));
        let s = v.scaled(Fixed::from_num(3));
        assert_eq!(s, Vec2Fixed::new(Fixed::from_num(6), Fixed::from_num(-3)));
    }

    #[test]
    fn test_fixed_sqrt_exact_squares() {
        assert_eq!(fixed_sqrt(Fixed::ZERO), Fixed::ZERO);
        let four = fixed_sqrt(Fixed::from_num(4));
        let epsilon = Fixed::from_num(1) / Fixed::from_num(10000);
        assert!((four - Fixed::from_num(2)).abs() < epsilon);
    }
}
