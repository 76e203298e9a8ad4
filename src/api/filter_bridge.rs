use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::RowFilter;

/// Host-side selection/filter channel.
///
/// Implementations forward subscriptions to whatever delivers filter events;
/// delivered events come back through `FilterBridge::on_filter_event`.
pub trait FilterChannel {
    fn subscribe(&mut self, table_id: &str, filter_ids: &[String]);
    fn unsubscribe(&mut self, table_id: &str);
}

/// Channel for hosts without filter support.
#[derive(Debug, Default)]
pub struct NullFilterChannel {
    pub subscribe_calls: usize,
    pub unsubscribe_calls: usize,
}

impl FilterChannel for NullFilterChannel {
    fn subscribe(&mut self, _table_id: &str, _filter_ids: &[String]) {
        self.subscribe_calls += 1;
    }

    fn unsubscribe(&mut self, _table_id: &str) {
        self.unsubscribe_calls += 1;
    }
}

/// Filter published for one table. `None` clears the filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterEvent {
    pub table_id: String,
    #[serde(default)]
    pub filter: Option<RowFilter>,
}

impl FilterEvent {
    #[must_use]
    pub fn new(table_id: impl Into<String>, filter: Option<RowFilter>) -> Self {
        Self {
            table_id: table_id.into(),
            filter,
        }
    }
}

/// Subscription state for one data table.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterBridge {
    table_id: String,
    filter_ids: Vec<String>,
    subscribed: bool,
    current: Option<RowFilter>,
}

impl FilterBridge {
    #[must_use]
    pub fn new(table_id: impl Into<String>, filter_ids: Vec<String>) -> Self {
        Self {
            table_id: table_id.into(),
            filter_ids,
            subscribed: false,
            current: None,
        }
    }

    #[must_use]
    pub fn table_id(&self) -> &str {
        &self.table_id
    }

    #[must_use]
    pub fn is_subscribed(&self) -> bool {
        self.subscribed
    }

    #[must_use]
    pub fn current_filter(&self) -> Option<&RowFilter> {
        self.current.as_ref()
    }

    /// Returns `false` when already subscribed.
    pub fn subscribe(&mut self, channel: &mut dyn FilterChannel) -> bool {
        if self.subscribed {
            return false;
        }
        channel.subscribe(&self.table_id, &self.filter_ids);
        self.subscribed = true;
        debug!(table_id = %self.table_id, filters = self.filter_ids.len(), "subscribed to filter events");
        true
    }

    /// Drops the subscription and the last received filter.
    pub fn unsubscribe(&mut self, channel: &mut dyn FilterChannel) -> bool {
        if !self.subscribed {
            return false;
        }
        channel.unsubscribe(&self.table_id);
        self.subscribed = false;
        self.current = None;
        debug!(table_id = %self.table_id, "unsubscribed from filter events");
        true
    }

    /// Stores the event's filter; returns whether the series need a rebuild.
    pub fn on_filter_event(&mut self, event: FilterEvent) -> bool {
        if !self.subscribed {
            trace!(table_id = %event.table_id, "ignoring filter event while unsubscribed");
            return false;
        }
        if event.table_id != self.table_id {
            trace!(table_id = %event.table_id, "ignoring filter event for another table");
            return false;
        }
        if self.current == event.filter {
            return false;
        }
        self.current = event.filter;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::{FilterBridge, FilterEvent, NullFilterChannel};
    use crate::core::RowFilter;

    #[test]
    fn subscribe_is_idempotent() {
        let mut channel = NullFilterChannel::default();
        let mut bridge = FilterBridge::new("t", vec!["f1".to_owned()]);
        assert!(bridge.subscribe(&mut channel));
        assert!(!bridge.subscribe(&mut channel));
        assert_eq!(channel.subscribe_calls, 1);
    }

    #[test]
    fn unsubscribed_bridge_ignores_events() {
        let mut bridge = FilterBridge::new("t", Vec::new());
        let changed = bridge.on_filter_event(FilterEvent::new("t", Some(RowFilter::new("f"))));
        assert!(!changed);
        assert!(bridge.current_filter().is_none());
    }
}
