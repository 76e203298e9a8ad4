use serde::{Deserialize, Serialize};

/// Ordered repaint classes.
///
/// `Light` restyles existing elements, `Layout` re-runs margins and the chart
/// update, `Data` rebinds series data to existing chart objects and `Full`
/// tears the chart down and creates it again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub enum InvalidationLevel {
    #[default]
    None,
    Light,
    Layout,
    Data,
    Full,
}

impl InvalidationLevel {
    #[must_use]
    pub const fn max(self, other: Self) -> Self {
        if self as u8 >= other as u8 {
            self
        } else {
            other
        }
    }

    /// Whether this change can be applied to the live chart objects.
    #[must_use]
    pub const fn is_incremental(self) -> bool {
        !matches!(self, Self::Full)
    }
}

/// What part of the view a repaint request is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InvalidationTopic {
    Title,
    Axis,
    Legend,
    Grid,
    Series,
    Interpolation,
    ChartType,
    Tooltip,
    Filter,
    Size,
}

impl InvalidationTopic {
    const fn bit(self) -> u16 {
        match self {
            Self::Title => 1 << 0,
            Self::Axis => 1 << 1,
            Self::Legend => 1 << 2,
            Self::Grid => 1 << 3,
            Self::Series => 1 << 4,
            Self::Interpolation => 1 << 5,
            Self::ChartType => 1 << 6,
            Self::Tooltip => 1 << 7,
            Self::Filter => 1 << 8,
            Self::Size => 1 << 9,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct InvalidationTopics {
    bits: u16,
}

impl InvalidationTopics {
    const ALL_BITS: u16 = (1 << 10) - 1;

    #[must_use]
    pub const fn none() -> Self {
        Self { bits: 0 }
    }

    #[must_use]
    pub const fn all() -> Self {
        Self {
            bits: Self::ALL_BITS,
        }
    }

    #[must_use]
    pub const fn from_topic(topic: InvalidationTopic) -> Self {
        Self { bits: topic.bit() }
    }

    #[must_use]
    pub const fn with_topic(self, topic: InvalidationTopic) -> Self {
        Self {
            bits: self.bits | topic.bit(),
        }
    }

    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self {
            bits: self.bits | other.bits,
        }
    }

    #[must_use]
    pub const fn contains_topic(self, topic: InvalidationTopic) -> bool {
        (self.bits & topic.bit()) != 0
    }

    #[must_use]
    pub const fn is_none(self) -> bool {
        self.bits == 0
    }
}

/// Coalesced repaint request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct InvalidationMask {
    level: InvalidationLevel,
    #[serde(default)]
    topics: InvalidationTopics,
}

impl InvalidationMask {
    #[must_use]
    pub const fn none() -> Self {
        Self {
            level: InvalidationLevel::None,
            topics: InvalidationTopics::none(),
        }
    }

    #[must_use]
    pub const fn new(level: InvalidationLevel, topic: InvalidationTopic) -> Self {
        Self {
            level,
            topics: InvalidationTopics::from_topic(topic),
        }
    }

    #[must_use]
    pub const fn full() -> Self {
        Self {
            level: InvalidationLevel::Full,
            topics: InvalidationTopics::all(),
        }
    }

    #[must_use]
    pub const fn level(self) -> InvalidationLevel {
        self.level
    }

    #[must_use]
    pub const fn topics(self) -> InvalidationTopics {
        self.topics
    }

    #[must_use]
    pub const fn has_topic(self, topic: InvalidationTopic) -> bool {
        self.topics.contains_topic(topic)
    }

    #[must_use]
    pub const fn is_none(self) -> bool {
        matches!(self.level, InvalidationLevel::None)
    }

    #[must_use]
    pub const fn with_topic(mut self, topic: InvalidationTopic) -> Self {
        self.topics = self.topics.with_topic(topic);
        self
    }

    pub fn merge(&mut self, other: Self) {
        self.level = self.level.max(other.level);
        self.topics = self.topics.union(other.topics);
    }
}

#[cfg(test)]
mod tests {
    use super::{InvalidationLevel, InvalidationMask, InvalidationTopic};

    #[test]
    fn merge_keeps_highest_level_and_all_topics() {
        let mut mask = InvalidationMask::new(InvalidationLevel::Light, InvalidationTopic::Grid);
        mask.merge(InvalidationMask::new(
            InvalidationLevel::Layout,
            InvalidationTopic::Axis,
        ));
        assert_eq!(mask.level(), InvalidationLevel::Layout);
        assert!(mask.has_topic(InvalidationTopic::Grid));
        assert!(mask.has_topic(InvalidationTopic::Axis));
        assert!(!mask.has_topic(InvalidationTopic::Title));
    }

    #[test]
    fn only_full_is_not_incremental() {
        assert!(InvalidationLevel::Data.is_incremental());
        assert!(!InvalidationLevel::Full.is_incremental());
    }
}
