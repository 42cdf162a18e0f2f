use derive_more::{Add, AddAssign, Display, From, Into, Sub, Sum};

/// A horizontal distance in device pixels, as reported by a
/// [`WidthOracle`](crate::WidthOracle) and used for every width budget
#[derive(
    Debug, Default, Copy, Clone, PartialEq, PartialOrd, Add, AddAssign, Sub, Sum, Display, From, Into,
)]
#[display("{_0}px")]
pub struct Px(pub f32);

impl Px {
    pub const ZERO: Px = Px(0.0);

    /// `true` if the value is neither infinite nor NaN
    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }

    pub fn max(self, other: Px) -> Px {
        Px(self.0.max(other.0))
    }
}

impl From<f64> for Px {
    fn from(value: f64) -> Self {
        Px(value as f32)
    }
}
