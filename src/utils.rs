//! Small value types shared across modules.

use std::hash::{Hash, Hasher};

/// An `f64` used as a grouping key.
///
/// Two keys are the same group exactly when their parsed values are bit-for-bit identical,
/// with every `NaN` payload folded into one canonical `NaN`. In particular `0.0` and `-0.0`
/// are distinct groups, and no tolerance is ever applied.
#[derive(Clone, Copy, Debug)]
pub struct GroupKey(pub f64);

impl GroupKey {
    #[inline]
    fn bits(self) -> u64 {
        if self.0.is_nan() {
            f64::NAN.to_bits()
        } else {
            self.0.to_bits()
        }
    }
}

impl PartialEq for GroupKey {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.bits() == other.bits()
    }
}

impl Eq for GroupKey {}

impl Hash for GroupKey {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bits().hash(state);
    }
}

impl From<f64> for GroupKey {
    fn from(value: f64) -> Self {
        Self(value)
    }
}

impl From<GroupKey> for f64 {
    fn from(value: GroupKey) -> Self {
        value.0
    }
}
