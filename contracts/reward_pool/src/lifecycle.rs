use soroban_sdk::contracttype;

use crate::storage::MintWindow;

/// Lifecycle phase, always recomputed from the clock, never stored.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Phase {
    /// Before the window opens: contributions only
    Upcoming = 0,
    /// Window open: contributions and minting
    Open = 1,
    /// Window ended: redemptions only
    Closed = 2,
}

pub fn phase_at(window: &MintWindow, now: u64) -> Phase {
    if now < window.start {
        Phase::Upcoming
    } else if now < window.end {
        Phase::Open
    } else {
        Phase::Closed
    }
}

/// Contributions close when redemption opens, not when minting does.
pub fn contribution_open(window: &MintWindow, now: u64) -> bool {
    now < window.end
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> MintWindow {
        MintWindow {
            start: 1000,
            end: 2000,
        }
    }

    #[test]
    fn test_phase_boundaries() {
        let w = window();
        assert_eq!(phase_at(&w, 0), Phase::Upcoming);
        assert_eq!(phase_at(&w, 999), Phase::Upcoming);
        assert_eq!(phase_at(&w, 1000), Phase::Open);
        assert_eq!(phase_at(&w, 1999), Phase::Open);
        assert_eq!(phase_at(&w, 2000), Phase::Closed);
        assert_eq!(phase_at(&w, u64::MAX), Phase::Closed);
    }

    #[test]
    fn test_contribution_open_until_end() {
        let w = window();
        assert!(contribution_open(&w, 0));
        assert!(contribution_open(&w, 1500));
        assert!(contribution_open(&w, 1999));
        assert!(!contribution_open(&w, 2000));
    }
}
