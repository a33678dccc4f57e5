/// Session phase of a render loop.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Phase {
    Uninitialized,
    /// `on_load` has been entered but has not returned successfully yet.
    Loading,
    Loaded,
    Running,
    /// Terminal.
    Unloaded,
}

#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
pub enum LifecycleError {
    #[error("cannot load a session that is {0:?}")]
    InvalidLoad(Phase),
}

/// `Uninitialized -> Loaded -> Running -> Unloaded` state machine.
///
/// The runtime consults it before every hook so that ticks never run outside
/// a loaded session and unload happens exactly once. A load that fails part
/// way (`Loading`) still gets its unload, so whatever it acquired is released
/// while the device is alive.
#[derive(Debug, Clone)]
pub struct Lifecycle {
    phase: Phase,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self {
            phase: Phase::Uninitialized,
        }
    }
}

impl Lifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Called right before `on_load`.
    pub fn begin_load(&mut self) -> Result<(), LifecycleError> {
        match self.phase {
            Phase::Uninitialized => {
                self.phase = Phase::Loading;
                Ok(())
            }
            other => Err(LifecycleError::InvalidLoad(other)),
        }
    }

    /// Records a successful load.
    pub fn mark_loaded(&mut self) -> Result<(), LifecycleError> {
        match self.phase {
            Phase::Loading => {
                self.phase = Phase::Loaded;
                Ok(())
            }
            other => Err(LifecycleError::InvalidLoad(other)),
        }
    }

    /// Starts an update/render tick. Returns `false` when no tick may run.
    pub fn begin_tick(&mut self) -> bool {
        match self.phase {
            Phase::Loaded | Phase::Running => {
                self.phase = Phase::Running;
                true
            }
            Phase::Uninitialized | Phase::Loading | Phase::Unloaded => false,
        }
    }

    /// Resize hooks only make sense while resources exist.
    #[inline]
    pub fn accepts_resize(&self) -> bool {
        matches!(self.phase, Phase::Loaded | Phase::Running)
    }

    /// Enters the terminal phase.
    ///
    /// Returns `true` when the unload hook must run, i.e. `on_load` had been
    /// entered and the session has not been unloaded before.
    pub fn begin_unload(&mut self) -> bool {
        let was = std::mem::replace(&mut self.phase, Phase::Unloaded);
        matches!(was, Phase::Loading | Phase::Loaded | Phase::Running)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded() -> Lifecycle {
        let mut lc = Lifecycle::new();
        lc.begin_load().unwrap();
        lc.mark_loaded().unwrap();
        lc
    }

    #[test]
    fn full_session_walks_every_phase() {
        let mut lc = Lifecycle::new();
        assert_eq!(lc.phase(), Phase::Uninitialized);

        lc.begin_load().unwrap();
        assert_eq!(lc.phase(), Phase::Loading);
        lc.mark_loaded().unwrap();
        assert_eq!(lc.phase(), Phase::Loaded);

        assert!(lc.begin_tick());
        assert_eq!(lc.phase(), Phase::Running);
        assert!(lc.begin_tick());

        assert!(lc.begin_unload());
        assert_eq!(lc.phase(), Phase::Unloaded);
    }

    #[test]
    fn no_tick_before_load() {
        let mut lc = Lifecycle::new();
        assert!(!lc.begin_tick());
        assert!(!lc.accepts_resize());
        assert_eq!(lc.phase(), Phase::Uninitialized);
    }

    #[test]
    fn no_tick_after_unload() {
        let mut lc = loaded();
        lc.begin_unload();
        assert!(!lc.begin_tick());
        assert!(!lc.accepts_resize());
    }

    #[test]
    fn unload_hook_runs_once() {
        let mut lc = loaded();
        assert!(lc.begin_unload());
        assert!(!lc.begin_unload());
    }

    #[test]
    fn unload_without_load_skips_hook() {
        let mut lc = Lifecycle::new();
        assert!(!lc.begin_unload());
        assert_eq!(lc.phase(), Phase::Unloaded);
    }

    #[test]
    fn load_is_only_allowed_once() {
        let mut lc = loaded();
        assert_eq!(lc.begin_load(), Err(LifecycleError::InvalidLoad(Phase::Loaded)));
        assert_eq!(lc.mark_loaded(), Err(LifecycleError::InvalidLoad(Phase::Loaded)));

        lc.begin_unload();
        assert_eq!(lc.begin_load(), Err(LifecycleError::InvalidLoad(Phase::Unloaded)));
    }

    #[test]
    fn loaded_requires_begin_load() {
        let mut lc = Lifecycle::new();
        assert_eq!(
            lc.mark_loaded(),
            Err(LifecycleError::InvalidLoad(Phase::Uninitialized))
        );
    }

    #[test]
    fn failed_load_still_unloads_once() {
        let mut lc = Lifecycle::new();
        lc.begin_load().unwrap();

        assert!(!lc.begin_tick());
        assert!(!lc.accepts_resize());
        assert!(lc.begin_unload());
        assert!(!lc.begin_unload());
    }
}
