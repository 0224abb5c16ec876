//! Forward-only build phase tracking.

use std::fmt;

/// Where a run currently is. Phases only move forward, one step at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildPhase {
    #[default]
    Init,
    Preflight,
    Cleaned,
    Scaffolded,
    TemplatesDone,
    PagesDone,
    ComponentsDone,
    ServerDone,
    StaticDone,
    ManifestWritten,
    MetadataWritten,
    Done,
    Failed,
}

impl BuildPhase {
    /// The phase that follows a successful step, if any.
    pub fn next(self) -> Option<BuildPhase> {
        use BuildPhase::*;
        Some(match self {
            Init => Preflight,
            Preflight => Cleaned,
            Cleaned => Scaffolded,
            Scaffolded => TemplatesDone,
            TemplatesDone => PagesDone,
            PagesDone => ComponentsDone,
            ComponentsDone => ServerDone,
            ServerDone => StaticDone,
            StaticDone => ManifestWritten,
            ManifestWritten => MetadataWritten,
            MetadataWritten => Done,
            Done | Failed => return None,
        })
    }

    /// Only the setup phases can end the run in failure.
    pub fn can_fail(self) -> bool {
        matches!(
            self,
            BuildPhase::Preflight | BuildPhase::Cleaned | BuildPhase::Scaffolded
        )
    }

    pub fn can_advance_to(self, next: BuildPhase) -> bool {
        if next == BuildPhase::Failed {
            return self.can_fail();
        }
        self.next() == Some(next)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, BuildPhase::Done | BuildPhase::Failed)
    }
}

impl fmt::Display for BuildPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walks_every_phase_in_order() {
        let mut phase = BuildPhase::Init;
        let mut steps = 0;
        while let Some(next) = phase.next() {
            assert!(phase.can_advance_to(next));
            phase = next;
            steps += 1;
        }
        assert_eq!(phase, BuildPhase::Done);
        assert_eq!(steps, 11);
    }

    #[test]
    fn no_skipping_or_going_back() {
        assert!(!BuildPhase::Init.can_advance_to(BuildPhase::Cleaned));
        assert!(!BuildPhase::PagesDone.can_advance_to(BuildPhase::TemplatesDone));
        assert!(!BuildPhase::Done.can_advance_to(BuildPhase::Init));
    }

    #[test]
    fn failure_only_from_setup_phases() {
        for phase in [BuildPhase::Preflight, BuildPhase::Cleaned, BuildPhase::Scaffolded] {
            assert!(phase.can_advance_to(BuildPhase::Failed), "{phase}");
        }
        for phase in [
            BuildPhase::Init,
            BuildPhase::TemplatesDone,
            BuildPhase::StaticDone,
            BuildPhase::Done,
        ] {
            assert!(!phase.can_advance_to(BuildPhase::Failed), "{phase}");
        }
        assert!(BuildPhase::Failed.is_terminal());
    }
}
