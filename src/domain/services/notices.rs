#[cfg(test)]
#[path = "notices_test.rs"]
mod tests;

use std::time::Duration;
use std::time::Instant;

use crate::domain::models::Notice;
use crate::domain::models::NoticeType;

pub const NOTICE_VISIBLE: Duration = Duration::from_millis(4500);
pub const NOTICE_EXIT: Duration = Duration::from_millis(500);

struct Entry {
    notice: Notice,
    created: Instant,
}

/// Stack of transient notifications. Entries stay fully visible for 4.5s,
/// spend 0.5s in a dimmed exiting state, then drop on the next tick.
#[derive(Default)]
pub struct Notices {
    entries: Vec<Entry>,
    next_id: u64,
}

impl Notices {
    pub fn push(&mut self, ntype: NoticeType, text: &str) -> u64 {
        return self.push_at(Instant::now(), ntype, text);
    }

    pub fn push_at(&mut self, now: Instant, ntype: NoticeType, text: &str) -> u64 {
        self.next_id += 1;
        let id = self.next_id;
        self.entries.push(Entry {
            notice: Notice {
                id,
                ntype,
                text: text.to_string(),
            },
            created: now,
        });

        tracing::debug!(id = id, text = text, "notice");
        return id;
    }

    pub fn dismiss(&mut self, id: u64) {
        self.entries.retain(|e| return e.notice.id != id);
    }

    pub fn dismiss_newest(&mut self) {
        self.entries.pop();
    }

    pub fn prune(&mut self, now: Instant) {
        self.entries
            .retain(|e| return now.duration_since(e.created) < NOTICE_VISIBLE + NOTICE_EXIT);
    }

    /// Notices in display order, each flagged when in its exit phase.
    pub fn visible(&self, now: Instant) -> Vec<(&Notice, bool)> {
        return self
            .entries
            .iter()
            .map(|e| {
                let exiting = now.duration_since(e.created) >= NOTICE_VISIBLE;
                return (&e.notice, exiting);
            })
            .collect();
    }

    pub fn len(&self) -> usize {
        return self.entries.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.entries.is_empty();
    }
}
