//! Output target flags

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Set of enabled primary outputs
///
/// Flags combine with `|` and are tested with [`OutputTargets::contains`],
/// which requires every bit of the queried flag to be present.
///
/// ```
/// use channel_logger::OutputTargets;
///
/// let targets = OutputTargets::CONSOLE | OutputTargets::FILE;
/// assert!(targets.contains(OutputTargets::CONSOLE));
/// assert!(targets.contains(OutputTargets::FILE));
/// assert!(!OutputTargets::NONE.contains(OutputTargets::FILE));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutputTargets(u8);

impl OutputTargets {
    pub const NONE: OutputTargets = OutputTargets(0);
    pub const CONSOLE: OutputTargets = OutputTargets(1 << 0);
    pub const FILE: OutputTargets = OutputTargets(1 << 1);
    pub const ALL: OutputTargets = OutputTargets(Self::CONSOLE.0 | Self::FILE.0);

    #[inline]
    pub const fn contains(self, other: OutputTargets) -> bool {
        other.0 != 0 && self.0 & other.0 == other.0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn bits(self) -> u8 {
        self.0
    }
}

impl Default for OutputTargets {
    fn default() -> Self {
        OutputTargets::CONSOLE
    }
}

impl BitOr for OutputTargets {
    type Output = OutputTargets;

    fn bitor(self, rhs: Self) -> Self::Output {
        OutputTargets(self.0 | rhs.0)
    }
}

impl BitOrAssign for OutputTargets {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for OutputTargets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names = Vec::new();
        if self.contains(OutputTargets::CONSOLE) {
            names.push("CONSOLE");
        }
        if self.contains(OutputTargets::FILE) {
            names.push("FILE");
        }
        if names.is_empty() {
            names.push("NONE");
        }
        write!(f, "OutputTargets({})", names.join(" | "))
    }
}
