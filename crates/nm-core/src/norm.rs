//! The four norm kinds and the per-agent acknowledgment flags.
//!
//! Norms are a closed enumeration.  Every place that needs "one value per
//! norm" uses [`NormSet`] (or a `[T; NormKind::COUNT]` indexed by
//! [`NormKind::index`]) rather than looking fields up by name.

use std::fmt;
use std::str::FromStr;

use crate::{CoreError, SimRng};

/// A category of social obligation.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum NormKind {
    Legal,
    Apriori,
    Care,
    Epistemic,
}

impl NormKind {
    pub const COUNT: usize = 4;

    /// All norm kinds in canonical order.
    pub const ALL: [NormKind; NormKind::COUNT] = [
        NormKind::Legal,
        NormKind::Apriori,
        NormKind::Care,
        NormKind::Epistemic,
    ];

    /// Position in [`NormKind::ALL`].
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            NormKind::Legal => 0,
            NormKind::Apriori => 1,
            NormKind::Care => 2,
            NormKind::Epistemic => 3,
        }
    }

    /// Uniform draw over the four norms.
    pub fn sample(rng: &mut SimRng) -> NormKind {
        NormKind::ALL[rng.gen_range(0..NormKind::COUNT)]
    }

    pub const fn name(self) -> &'static str {
        match self {
            NormKind::Legal => "legal",
            NormKind::Apriori => "apriori",
            NormKind::Care => "care",
            NormKind::Epistemic => "epistemic",
        }
    }
}

impl fmt::Display for NormKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NormKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        match lower.as_str() {
            "legal" => Ok(NormKind::Legal),
            "apriori" | "a-priori" | "a_priori" => Ok(NormKind::Apriori),
            "care" => Ok(NormKind::Care),
            "epistemic" => Ok(NormKind::Epistemic),
            _ => Err(CoreError::UnknownNorm(s.to_owned())),
        }
    }
}

// ── NormSet ───────────────────────────────────────────────────────────────────

/// One "does this agent treat the norm as binding" flag per [`NormKind`].
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NormSet([bool; NormKind::COUNT]);

impl NormSet {
    /// Every norm acknowledged.
    pub const ALL: NormSet = NormSet([true; NormKind::COUNT]);

    /// No norm acknowledged.
    pub const NONE: NormSet = NormSet([false; NormKind::COUNT]);

    /// Build a set by evaluating `f` once per norm, in canonical order.
    pub fn from_fn(mut f: impl FnMut(NormKind) -> bool) -> Self {
        let mut flags = [false; NormKind::COUNT];
        for norm in NormKind::ALL {
            flags[norm.index()] = f(norm);
        }
        NormSet(flags)
    }

    /// Exactly one norm acknowledged.
    pub fn only(norm: NormKind) -> Self {
        let mut set = NormSet::NONE;
        set.set(norm, true);
        set
    }

    #[inline]
    pub fn acknowledges(&self, norm: NormKind) -> bool {
        self.0[norm.index()]
    }

    #[inline]
    pub fn set(&mut self, norm: NormKind, value: bool) {
        self.0[norm.index()] = value;
    }

    /// Number of acknowledged norms.
    pub fn count(&self) -> usize {
        self.0.iter().filter(|&&b| b).count()
    }

    /// `(norm, acknowledged)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (NormKind, bool)> + '_ {
        NormKind::ALL.into_iter().map(|n| (n, self.0[n.index()]))
    }

    /// Norms whose flag differs between `self` and `other`.
    pub fn diff(&self, other: &NormSet) -> impl Iterator<Item = NormKind> + '_ {
        let other = *other;
        NormKind::ALL
            .into_iter()
            .filter(move |n| self.acknowledges(*n) != other.acknowledges(*n))
    }

    /// Mismatch between a preferred norm and this acknowledgment profile.
    ///
    /// 1.0 if `preference` is not acknowledged, plus 0.5 for every other norm
    /// that is.  Range: [0.0, 2.5].
    pub fn conflict_with(&self, preference: NormKind) -> f32 {
        self.iter().fold(0.0, |acc, (norm, ack)| {
            if norm == preference {
                if ack { acc } else { acc + 1.0 }
            } else if ack {
                acc + 0.5
            } else {
                acc
            }
        })
    }
}

impl From<[bool; NormKind::COUNT]> for NormSet {
    fn from(flags: [bool; NormKind::COUNT]) -> Self {
        NormSet(flags)
    }
}

impl fmt::Display for NormSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        f.write_str("{")?;
        for (norm, ack) in self.iter() {
            if ack {
                if !first {
                    f.write_str(", ")?;
                }
                f.write_str(norm.name())?;
                first = false;
            }
        }
        f.write_str("}")
    }
}
