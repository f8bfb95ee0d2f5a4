use crate::api::Time;

/// Hands out ids derived from the creation time in milliseconds
///
/// Ids from one generator are strictly increasing, even when the clock did
/// not move between two calls.
#[derive(Clone, Debug, Default)]
pub struct IdGen {
    last: i64,
}

impl IdGen {
    /// A generator that will only hand out ids greater than `last`
    pub fn after(last: i64) -> IdGen {
        IdGen { last }
    }

    pub fn next_at(&mut self, now: Time) -> i64 {
        let id = std::cmp::max(now.timestamp_millis(), self.last.saturating_add(1));
        self.last = id;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn follows_the_clock() {
        let now = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        let mut ids = IdGen::default();
        assert_eq!(ids.next_at(now), 1_700_000_000_000);
        assert_eq!(
            ids.next_at(now + chrono::Duration::milliseconds(5)),
            1_700_000_000_005
        );
    }

    #[test]
    fn never_repeats() {
        let now = Utc.timestamp_millis_opt(1_000).unwrap();
        let mut ids = IdGen::after(5_000);
        assert_eq!(ids.next_at(now), 5_001);
        assert_eq!(ids.next_at(now), 5_002);
    }
}
