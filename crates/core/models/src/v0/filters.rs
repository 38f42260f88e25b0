use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use super::LocationType;

auto_derived!(
    /// Part of the day an event starts in, from its local hour
    #[derive(Copy, Hash, PartialOrd, Ord)]
    #[serde(rename_all = "snake_case")]
    pub enum TimeOfDay {
        /// 05:00 to 11:59
        Morning,
        /// 12:00 to 16:59
        Afternoon,
        /// 17:00 to 04:59
        Evening,
    }

    /// Calendar layout, decides the date range fetched
    #[derive(Copy, Hash, Default)]
    #[serde(rename_all = "snake_case")]
    pub enum CalendarView {
        #[default]
        Month,
        Week,
        List,
    }

    /// Combined set of active filter selections
    ///
    /// An empty set means the field does not filter anything.
    #[derive(Default, Hash, PartialOrd, Ord)]
    pub struct FilterSpec {
        /// Selected major ids
        #[serde(skip_serializing_if = "BTreeSet::is_empty", default)]
        pub majors: BTreeSet<String>,
        /// Selected tags, matched exactly
        #[serde(skip_serializing_if = "BTreeSet::is_empty", default)]
        pub tags: BTreeSet<String>,
        /// Selected club ids
        #[serde(skip_serializing_if = "BTreeSet::is_empty", default)]
        pub clubs: BTreeSet<String>,
        /// Selected location types
        #[serde(skip_serializing_if = "BTreeSet::is_empty", default)]
        pub location_types: BTreeSet<LocationType>,
        /// Selected time-of-day buckets
        #[serde(skip_serializing_if = "BTreeSet::is_empty", default)]
        pub time_of_day: BTreeSet<TimeOfDay>,
        /// Free-text search
        #[serde(skip_serializing_if = "String::is_empty", default)]
        pub search: String,
        /// Exclude cancelled events and deleted requests
        #[serde(skip_serializing_if = "crate::if_false", default)]
        pub hide_cancelled: bool,
    }
);

impl TimeOfDay {
    pub const MORNING_START: u32 = 5;
    pub const AFTERNOON_START: u32 = 12;
    pub const EVENING_START: u32 = 17;

    /// Bucket for a local hour (0-23)
    pub fn from_hour(hour: u32) -> TimeOfDay {
        match hour {
            h if (Self::MORNING_START..Self::AFTERNOON_START).contains(&h) => TimeOfDay::Morning,
            h if (Self::AFTERNOON_START..Self::EVENING_START).contains(&h) => {
                TimeOfDay::Afternoon
            }
            _ => TimeOfDay::Evening,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeOfDay::Morning => "morning",
            TimeOfDay::Afternoon => "afternoon",
            TimeOfDay::Evening => "evening",
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeOfDay {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "morning" => Ok(TimeOfDay::Morning),
            "afternoon" => Ok(TimeOfDay::Afternoon),
            "evening" => Ok(TimeOfDay::Evening),
            _ => Err(format!("unknown time of day `{s}`")),
        }
    }
}

impl FromStr for CalendarView {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "month" => Ok(CalendarView::Month),
            "week" => Ok(CalendarView::Week),
            "list" => Ok(CalendarView::List),
            _ => Err(format!("unknown calendar view `{s}`")),
        }
    }
}

impl FilterSpec {
    /// Whether no filter is active
    pub fn is_empty(&self) -> bool {
        self.majors.is_empty()
            && self.tags.is_empty()
            && self.clubs.is_empty()
            && self.location_types.is_empty()
            && self.time_of_day.is_empty()
            && self.search_query().is_none()
            && !self.hide_cancelled
    }

    /// Lowercased search text, if any
    pub fn search_query(&self) -> Option<String> {
        let query = self.search.trim();
        (!query.is_empty()).then(|| query.to_lowercase())
    }

    /// Number of active selections, for the filter badge
    pub fn active_count(&self) -> usize {
        self.majors.len()
            + self.tags.len()
            + self.clubs.len()
            + self.location_types.len()
            + self.time_of_day.len()
            + usize::from(self.hide_cancelled)
    }

    /// Select a major, or deselect it if already selected
    pub fn toggle_major(&mut self, major_id: &str) {
        if !self.majors.remove(major_id) {
            self.majors.insert(major_id.to_string());
        }
    }

    /// Select a tag, or deselect it if already selected
    pub fn toggle_tag(&mut self, tag: &str) {
        if !self.tags.remove(tag) {
            self.tags.insert(tag.to_string());
        }
    }

    /// Clear every selection but keep the search text
    pub fn clear_selections(&mut self) {
        *self = FilterSpec {
            search: std::mem::take(&mut self.search),
            ..Default::default()
        };
    }
}

#[cfg(test)]
mod tests {
    use crate::v0::{FilterSpec, TimeOfDay};

    #[test]
    fn every_hour_lands_in_exactly_one_bucket() {
        for hour in 0..24 {
            let bucket = TimeOfDay::from_hour(hour);
            let expected = if (5..12).contains(&hour) {
                TimeOfDay::Morning
            } else if (12..17).contains(&hour) {
                TimeOfDay::Afternoon
            } else {
                TimeOfDay::Evening
            };

            assert_eq!(bucket, expected, "hour {hour}");
        }
    }

    #[test]
    fn boundaries() {
        assert_eq!(TimeOfDay::from_hour(4), TimeOfDay::Evening);
        assert_eq!(TimeOfDay::from_hour(5), TimeOfDay::Morning);
        assert_eq!(TimeOfDay::from_hour(11), TimeOfDay::Morning);
        assert_eq!(TimeOfDay::from_hour(12), TimeOfDay::Afternoon);
        assert_eq!(TimeOfDay::from_hour(16), TimeOfDay::Afternoon);
        assert_eq!(TimeOfDay::from_hour(17), TimeOfDay::Evening);
        assert_eq!(TimeOfDay::from_hour(23), TimeOfDay::Evening);
    }

    #[test]
    fn blank_search_is_inactive() {
        let spec = FilterSpec {
            search: "   ".to_string(),
            ..Default::default()
        };
        assert!(spec.is_empty());
        assert_eq!(spec.search_query(), None);

        let spec = FilterSpec {
            search: " Robotics ".to_string(),
            ..Default::default()
        };
        assert_eq!(spec.search_query().as_deref(), Some("robotics"));
    }

    #[test]
    fn toggles_and_clears() {
        let mut spec = FilterSpec {
            search: "club".to_string(),
            hide_cancelled: true,
            ..Default::default()
        };

        spec.toggle_major("cs");
        spec.toggle_tag("food");
        assert_eq!(spec.active_count(), 3);

        spec.toggle_major("cs");
        assert!(spec.majors.is_empty());

        spec.clear_selections();
        assert_eq!(spec.active_count(), 0);
        assert_eq!(spec.search, "club");
    }
}
