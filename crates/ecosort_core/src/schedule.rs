//! The weekly collection schedule: a fixed table, one entry per weekday.

use strum::EnumIter;

/// Days of the week, Sunday first to match the day-selector layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Weekday {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Weekday {
    pub const COUNT: usize = 7;

    /// Index 0..=6, Sunday = 0.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Total inverse of [`Weekday::index`]; wraps modulo 7 so any selector
    /// input maps to a day.
    pub const fn from_index(index: usize) -> Self {
        match index % Self::COUNT {
            0 => Weekday::Sunday,
            1 => Weekday::Monday,
            2 => Weekday::Tuesday,
            3 => Weekday::Wednesday,
            4 => Weekday::Thursday,
            5 => Weekday::Friday,
            _ => Weekday::Saturday,
        }
    }

    /// The local calendar day.
    pub fn today() -> Self {
        use chrono::Datelike;
        let days_from_sunday = chrono::Local::now().date_naive().weekday().num_days_from_sunday();
        Self::from_index(days_from_sunday as usize)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Weekday::Sunday => "Sunday",
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
        }
    }

    /// Two-letter label for the day selector.
    pub const fn short_label(self) -> &'static str {
        match self {
            Weekday::Sunday => "Su",
            Weekday::Monday => "Mo",
            Weekday::Tuesday => "Tu",
            Weekday::Wednesday => "We",
            Weekday::Thursday => "Th",
            Weekday::Friday => "Fr",
            Weekday::Saturday => "Sa",
        }
    }
}

/// Palette tag carried by schedule entries; the front end maps tones to its
/// theme colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Rest day, nothing collected.
    Muted,
    /// General and food waste.
    Trash,
    /// Plastics and cans.
    Recycle,
    /// Paper and glass.
    Paper,
    /// Bulky items.
    Bulky,
}

impl Tone {
    pub const fn hex(self) -> &'static str {
        match self {
            Tone::Muted => "#9E9E9E",
            Tone::Trash => "#FF5722",
            Tone::Recycle => "#4CAF50",
            Tone::Paper => "#2196F3",
            Tone::Bulky => "#9C27B0",
        }
    }
}

/// One fixed collection rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleEntry {
    pub day: Weekday,
    pub items: &'static str,
    /// Collection window; `None` on rest days.
    pub window: Option<&'static str>,
    pub tone: Tone,
}

impl ScheduleEntry {
    pub const fn is_rest_day(&self) -> bool {
        self.window.is_none()
    }
}

const SCHEDULE: [ScheduleEntry; Weekday::COUNT] = [
    ScheduleEntry {
        day: Weekday::Sunday,
        items: "Rest day, no collection",
        window: None,
        tone: Tone::Muted,
    },
    ScheduleEntry {
        day: Weekday::Monday,
        items: "General waste, food waste",
        window: Some("21:00 - 24:00"),
        tone: Tone::Trash,
    },
    ScheduleEntry {
        day: Weekday::Tuesday,
        items: "Recyclables (plastics, cans)",
        window: Some("21:00 - 24:00"),
        tone: Tone::Recycle,
    },
    ScheduleEntry {
        day: Weekday::Wednesday,
        items: "General waste, food waste",
        window: Some("21:00 - 24:00"),
        tone: Tone::Trash,
    },
    ScheduleEntry {
        day: Weekday::Thursday,
        items: "Recyclables (paper, glass)",
        window: Some("21:00 - 24:00"),
        tone: Tone::Paper,
    },
    ScheduleEntry {
        day: Weekday::Friday,
        items: "General waste, food waste",
        window: Some("21:00 - 24:00"),
        tone: Tone::Trash,
    },
    ScheduleEntry {
        day: Weekday::Saturday,
        items: "Bulky items (report first)",
        window: Some("09:00 - 18:00"),
        tone: Tone::Bulky,
    },
];

/// Total lookup into the fixed weekly table.
pub fn schedule_for(day: Weekday) -> &'static ScheduleEntry {
    &SCHEDULE[day.index()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn lookup_is_total_and_stable() {
        for day in Weekday::iter() {
            let first = schedule_for(day);
            let second = schedule_for(day);
            assert_eq!(first.day, day);
            // Same static entry on every call.
            assert!(std::ptr::eq(first, second));
        }
    }

    #[test]
    fn sunday_is_the_only_rest_day() {
        for day in Weekday::iter() {
            let entry = schedule_for(day);
            if day == Weekday::Sunday {
                assert!(entry.is_rest_day());
                assert_eq!(entry.tone, Tone::Muted);
            } else {
                assert!(entry.window.is_some());
                assert!(!entry.items.is_empty());
            }
        }
    }

    #[test]
    fn saturday_has_the_daytime_window() {
        assert_eq!(
            schedule_for(Weekday::Saturday).window,
            Some("09:00 - 18:00")
        );
        assert_eq!(schedule_for(Weekday::Monday).window, Some("21:00 - 24:00"));
    }

    #[test]
    fn index_roundtrip_wraps() {
        for day in Weekday::iter() {
            assert_eq!(Weekday::from_index(day.index()), day);
        }
        assert_eq!(Weekday::from_index(7), Weekday::Sunday);
        assert_eq!(Weekday::from_index(8), Weekday::Monday);
    }

    #[test]
    fn tones_map_to_palette_hex() {
        assert_eq!(schedule_for(Weekday::Tuesday).tone.hex(), "#4CAF50");
        assert_eq!(schedule_for(Weekday::Saturday).tone.hex(), "#9C27B0");
    }
}
