use crate::error::EngineError;

/// # Tenant Lifecycle
///
/// ```text
/// Uninitialized ──▶ Loading ──▶ Ready ⇄ Disabled
/// ```
///
/// Loading bulk-loads the graph from persistence; an empty graph is a
/// valid Ready. Disabled stops background cycles but keeps the cached
/// graph readable. Commands and cycle starts require Ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TenantState {
    Uninitialized,
    Loading,
    Ready,
    Disabled,
}

impl TenantState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Loading => "loading",
            Self::Ready => "ready",
            Self::Disabled => "disabled",
        }
    }

    /// Guard for commands and analysis reads.
    pub fn require_ready(&self, tenant: &str) -> Result<(), EngineError> {
        match self {
            Self::Ready => Ok(()),
            other => Err(EngineError::State { tenant: tenant.to_string(), state: other.as_str() }),
        }
    }

    /// Whether `self → next` is a legal transition.
    pub fn can_transition_to(&self, next: TenantState) -> bool {
        matches!(
            (self, next),
            (Self::Uninitialized, Self::Loading)
                | (Self::Loading, Self::Ready)
                | (Self::Ready, Self::Disabled)
                | (Self::Disabled, Self::Ready)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_documented_transitions_are_legal() {
        use TenantState::*;
        assert!(Uninitialized.can_transition_to(Loading));
        assert!(Loading.can_transition_to(Ready));
        assert!(Ready.can_transition_to(Disabled));
        assert!(Disabled.can_transition_to(Ready));

        assert!(!Uninitialized.can_transition_to(Ready));
        assert!(!Loading.can_transition_to(Disabled));
        assert!(!Disabled.can_transition_to(Loading));
        assert!(!Ready.can_transition_to(Loading));
    }

    #[test]
    fn ready_guard_names_the_offending_state() {
        let err = TenantState::Loading.require_ready("fam-1").unwrap_err();
        assert!(err.to_string().contains("loading"));
        assert!(TenantState::Ready.require_ready("fam-1").is_ok());
    }
}
