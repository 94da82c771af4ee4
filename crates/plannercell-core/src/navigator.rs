use chrono::NaiveDate;
use plannercell_domain::MonthKey;

/// Whether a cursor tracks the real-world month or was moved away from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigatorState {
    Current,
    Viewing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationPolicy {
    /// Forward moves past the real-world month are rejected.
    NoFuture,
    Unrestricted,
}

/// Month cursor. The active (edit) month uses [`NavigationPolicy::NoFuture`];
/// calendar browsing uses [`NavigationPolicy::Unrestricted`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthNavigator {
    month: MonthKey,
    policy: NavigationPolicy,
}

impl MonthNavigator {
    pub fn new(today: NaiveDate, policy: NavigationPolicy) -> Self {
        Self {
            month: MonthKey::from_date(today),
            policy,
        }
    }

    pub fn month(&self) -> MonthKey {
        self.month
    }

    pub fn policy(&self) -> NavigationPolicy {
        self.policy
    }

    pub fn state(&self, today: NaiveDate) -> NavigatorState {
        if self.month == MonthKey::from_date(today) {
            NavigatorState::Current
        } else {
            NavigatorState::Viewing
        }
    }

    pub fn previous(&mut self) -> MonthKey {
        self.month = self.month.previous();
        self.month
    }

    /// Moves one month forward. Returns `false` and leaves the cursor in place
    /// when the policy forbids it.
    pub fn next(&mut self, today: NaiveDate) -> bool {
        self.jump_to(self.month.next(), today)
    }

    pub fn jump_to(&mut self, month: MonthKey, today: NaiveDate) -> bool {
        if self.policy == NavigationPolicy::NoFuture && month > MonthKey::from_date(today) {
            return false;
        }
        self.month = month;
        true
    }

    /// Points the cursor back at the real-world month.
    pub fn reset(&mut self, today: NaiveDate) {
        self.month = MonthKey::from_date(today);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 18).unwrap()
    }

    #[test]
    fn forward_from_current_month_is_rejected() {
        let mut nav = MonthNavigator::new(today(), NavigationPolicy::NoFuture);
        assert_eq!(nav.state(today()), NavigatorState::Current);
        assert!(!nav.next(today()));
        assert_eq!(nav.month().to_string(), "2024-03");
    }

    #[test]
    fn twelve_back_then_twelve_forward_returns_home() {
        let mut nav = MonthNavigator::new(today(), NavigationPolicy::NoFuture);
        let home = nav.month();
        for _ in 0..12 {
            nav.previous();
        }
        assert_eq!(nav.month().to_string(), "2023-03");
        assert_eq!(nav.state(today()), NavigatorState::Viewing);
        for _ in 0..12 {
            assert!(nav.next(today()));
        }
        assert_eq!(nav.month(), home);
        assert_eq!(nav.state(today()), NavigatorState::Current);
        assert!(!nav.next(today()));
    }

    #[test]
    fn unrestricted_cursor_can_browse_ahead() {
        let mut nav = MonthNavigator::new(today(), NavigationPolicy::Unrestricted);
        assert!(nav.next(today()));
        assert_eq!(nav.month().to_string(), "2024-04");
        nav.reset(today());
        assert_eq!(nav.state(today()), NavigatorState::Current);
    }

    #[test]
    fn jump_to_respects_policy() {
        let mut nav = MonthNavigator::new(today(), NavigationPolicy::NoFuture);
        let past = MonthKey::new(2022, 7).unwrap();
        assert!(nav.jump_to(past, today()));
        assert!(!nav.jump_to(MonthKey::new(2025, 1).unwrap(), today()));
        assert_eq!(nav.month(), past);
    }
}
