//! Notification schedules and their date labels.
//!
//! Each schedule keyword fixes how the run date is rendered in the subject:
//!
//! | Schedules                                       | Label          |
//! |-------------------------------------------------|----------------|
//! | `daily`, `twice_week`, `weekly*`, `twice_month` | `2026-10-18`   |
//! | `monthly`, `twice_year`, `quarterly`            | `October 2026` |
//! | `yearly`                                        | `2026`         |

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;

/// Label format for day-granular schedules.
const DAY_FORMAT: &str = "%Y-%m-%d";
/// Label format for month-granular schedules.
const MONTH_FORMAT: &str = "%B %Y";
/// Label format for year-granular schedules.
const YEAR_FORMAT: &str = "%Y";

/// Unknown schedule keyword.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown schedule '{0}'")]
pub struct ParseScheduleError(pub String);

/// How often a notification is sent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[cfg_attr(feature = "clap", value(rename_all = "snake_case"))]
pub enum Schedule {
    #[default]
    Daily,
    TwiceWeek,
    Weekly,
    WeeklyMonday,
    WeeklyTuesday,
    WeeklyWednesday,
    WeeklyThursday,
    WeeklyFriday,
    WeeklySaturday,
    WeeklySunday,
    TwiceMonth,
    Monthly,
    TwiceYear,
    Quarterly,
    Yearly,
}

impl Schedule {
    /// Every schedule, in keyword order.
    pub const ALL: [Self; 15] = [
        Self::Daily,
        Self::TwiceWeek,
        Self::Weekly,
        Self::WeeklyMonday,
        Self::WeeklyTuesday,
        Self::WeeklyWednesday,
        Self::WeeklyThursday,
        Self::WeeklyFriday,
        Self::WeeklySaturday,
        Self::WeeklySunday,
        Self::TwiceMonth,
        Self::Monthly,
        Self::TwiceYear,
        Self::Quarterly,
        Self::Yearly,
    ];

    /// Keyword as used on the command line and in the subject line.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::TwiceWeek => "twice_week",
            Self::Weekly => "weekly",
            Self::WeeklyMonday => "weekly_monday",
            Self::WeeklyTuesday => "weekly_tuesday",
            Self::WeeklyWednesday => "weekly_wednesday",
            Self::WeeklyThursday => "weekly_thursday",
            Self::WeeklyFriday => "weekly_friday",
            Self::WeeklySaturday => "weekly_saturday",
            Self::WeeklySunday => "weekly_sunday",
            Self::TwiceMonth => "twice_month",
            Self::Monthly => "monthly",
            Self::TwiceYear => "twice_year",
            Self::Quarterly => "quarterly",
            Self::Yearly => "yearly",
        }
    }

    fn label_format(self) -> &'static str {
        match self {
            Self::Daily
            | Self::TwiceWeek
            | Self::Weekly
            | Self::WeeklyMonday
            | Self::WeeklyTuesday
            | Self::WeeklyWednesday
            | Self::WeeklyThursday
            | Self::WeeklyFriday
            | Self::WeeklySaturday
            | Self::WeeklySunday
            | Self::TwiceMonth => DAY_FORMAT,
            Self::Monthly | Self::TwiceYear | Self::Quarterly => MONTH_FORMAT,
            Self::Yearly => YEAR_FORMAT,
        }
    }

    /// Render `date` at this schedule's granularity.
    #[must_use]
    pub fn date_label(self, date: NaiveDate) -> String {
        date.format(self.label_format()).to_string()
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Schedule {
    type Err = ParseScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let keyword = s.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|schedule| schedule.as_str() == keyword)
            .ok_or_else(|| ParseScheduleError(s.to_owned()))
    }
}
