use serde::{
    Deserialize,
    Serialize,
};

/// A `[start, end)` range during which an entity was observed down.  An open interval (the
/// entity is still down) has no end; this serializes as `null`, so it can't be confused with any
/// real timestamp.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct DowntimeInterval {
    pub start: i64,
    pub end: Option<i64>,
}

impl DowntimeInterval {
    pub fn open(start: i64) -> DowntimeInterval {
        DowntimeInterval { start, end: None }
    }

    pub fn closed(start: i64, end: i64) -> DowntimeInterval {
        DowntimeInterval { start, end: Some(end) }
    }

    pub fn is_open(&self) -> bool {
        self.end.is_none()
    }

    pub fn duration(&self) -> Option<i64> {
        self.end.map(|end| end - self.start)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Transition {
    Opened,
    Closed(i64),
    Unchanged,
}

/// The ordered downtime history of a single entity.  All of the open/close bookkeeping lives
/// here, so resources and namespaces share exactly the same semantics: only the tail interval can
/// be open, and intervals never overlap.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Downtimes(Vec<DowntimeInterval>);

impl Downtimes {
    pub fn new() -> Downtimes {
        Downtimes(vec![])
    }

    pub fn intervals(&self) -> &[DowntimeInterval] {
        &self.0
    }

    pub fn is_open(&self) -> bool {
        self.0.last().is_some_and(|i| i.is_open())
    }

    pub fn observe(&mut self, up: bool, now: i64) -> Transition {
        if up { self.close(now) } else { self.open(now) }
    }

    pub fn open(&mut self, now: i64) -> Transition {
        if self.is_open() {
            return Transition::Unchanged;
        }

        // Guard against the clock stepping backwards between polls
        let start = match self.0.last().and_then(|i| i.end) {
            Some(last_end) => now.max(last_end),
            None => now,
        };
        self.0.push(DowntimeInterval::open(start));
        Transition::Opened
    }

    pub fn close(&mut self, now: i64) -> Transition {
        match self.0.last_mut() {
            Some(last) if last.is_open() => {
                let end = now.max(last.start);
                last.end = Some(end);
                Transition::Closed(end - last.start)
            },
            _ => Transition::Unchanged,
        }
    }

    pub fn total_seconds(&self) -> i64 {
        self.0.iter().filter_map(DowntimeInterval::duration).sum()
    }

    #[cfg(test)]
    pub fn is_well_formed(&self) -> bool {
        let ordered = self.0.windows(2).all(|w| match w[0].end {
            Some(end) => end <= w[1].start,
            None => false,
        });
        let valid = self.0.iter().all(|i| i.end.is_none_or(|end| end >= i.start));
        ordered && valid
    }
}

impl From<Vec<DowntimeInterval>> for Downtimes {
    fn from(intervals: Vec<DowntimeInterval>) -> Downtimes {
        Downtimes(intervals)
    }
}
