//! The operating mode of the pool.

/// Mode
///
/// Selects how much corruption checking the pool performs. The mode is chosen at construction and affects observable
/// behavior, not the API shape: both paths are ordinary runtime branches.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Mode {
    /// Fast path: only the lead sentinel is maintained.
    ///
    /// Double frees and foreign pointers are still rejected; a write past the end of an allocated block goes
    /// undetected. This trades safety for speed.
    Release,
    /// Checked path: fill patterns, end sentinels, and the teardown integrity scan are active.
    ///
    /// Freshly constructed and freed memory is stamped with a recognizable pattern, and a write past the end of an
    /// allocated block is reported as `Error::CorruptedMemory`.
    Diagnostics,
}

impl Mode {
    /// Returns whether the diagnostics checks are active.
    pub fn is_diagnostics(self) -> bool { matches!(self, Mode::Diagnostics) }
}

impl Default for Mode {
    /// Mirrors the build profile: `Diagnostics` when debug-assertions are on, `Release` otherwise.
    fn default() -> Self {
        if cfg!(debug_assertions) { Mode::Diagnostics } else { Mode::Release }
    }
}

#[cfg(test)]
mod tests {

use super::*;

#[test]
fn mode_is_diagnostics() {
    assert!(Mode::Diagnostics.is_diagnostics());
    assert!(!Mode::Release.is_diagnostics());
}

} // mod tests
