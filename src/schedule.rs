//! Client-side grouping and filtering of events and meetings

use crate::types::{Event, Meeting};
use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

static MEETING_TIME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-1]?[0-9]|2[0-3]):[0-5][0-9]$").expect("valid regex"));

const MONTHS_PT: [&str; 12] = [
    "Janeiro",
    "Fevereiro",
    "Março",
    "Abril",
    "Maio",
    "Junho",
    "Julho",
    "Agosto",
    "Setembro",
    "Outubro",
    "Novembro",
    "Dezembro",
];

/// São Paulo local time (UTC-3, no daylight saving since 2019)
pub fn sao_paulo() -> FixedOffset {
    FixedOffset::west_opt(3 * 3600).unwrap_or_else(|| Utc.fix())
}

/// Parse an event timestamp.
///
/// RFC 3339 instants are taken as is. A bare `YYYY-MM-DDTHH:MM[:SS[.fff]]`
/// (what a datetime form field produces) is read as São Paulo local time. A
/// date-only `YYYY-MM-DD` is midnight UTC, as browsers read it.
pub fn parse_event_time(value: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Some(instant);
    }

    let local = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .and_then(|naive| sao_paulo().from_local_datetime(&naive).single());
    if local.is_some() {
        return local;
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive).fixed_offset())
}

/// Events strictly after `now`, in input order. Unparsable dates are dropped.
pub fn filter_future_events(events: &[Event], now: DateTime<Utc>) -> Vec<Event> {
    events
        .iter()
        .filter(|event| parse_event_time(&event.date_time).is_some_and(|at| at > now))
        .cloned()
        .collect()
}

/// Events of one calendar month
#[derive(Debug, Clone, PartialEq)]
pub struct MonthGroup {
    /// `YYYY-MM`
    pub key: String,
    /// e.g. `Janeiro/2025`
    pub label: String,
    pub events: Vec<Event>,
}

/// Group events by São Paulo calendar month.
///
/// Groups come out in chronological order and events inside a group are
/// sorted by date. Events with unparsable dates are left out.
pub fn group_events_by_month(events: &[Event]) -> Vec<MonthGroup> {
    let mut grouped: BTreeMap<(i32, u32), Vec<(DateTime<FixedOffset>, &Event)>> = BTreeMap::new();

    for event in events {
        let Some(at) = parse_event_time(&event.date_time) else {
            continue;
        };
        let local = at.with_timezone(&sao_paulo());
        grouped
            .entry((local.year(), local.month()))
            .or_default()
            .push((at, event));
    }

    grouped
        .into_iter()
        .map(|((year, month), mut entries)| {
            entries.sort_by_key(|(at, _)| *at);
            MonthGroup {
                key: format!("{year}-{month:02}"),
                label: format!("{}/{year}", MONTHS_PT[(month - 1) as usize]),
                events: entries.into_iter().map(|(_, event)| event.clone()).collect(),
            }
        })
        .collect()
}

/// Day of the week as the API labels meetings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Weekday {
    Domingo,
    Segunda,
    Terca,
    Quarta,
    Quinta,
    Sexta,
    Sabado,
}

impl Weekday {
    /// Calendar order, Sunday first
    pub const ALL: [Weekday; 7] = [
        Weekday::Domingo,
        Weekday::Segunda,
        Weekday::Terca,
        Weekday::Quarta,
        Weekday::Quinta,
        Weekday::Sexta,
        Weekday::Sabado,
    ];

    /// Label stored in `Meeting::day_of_week`
    pub fn label(self) -> &'static str {
        match self {
            Weekday::Domingo => "Domingo",
            Weekday::Segunda => "Segunda-feira",
            Weekday::Terca => "Terça-feira",
            Weekday::Quarta => "Quarta-feira",
            Weekday::Quinta => "Quinta-feira",
            Weekday::Sexta => "Sexta-feira",
            Weekday::Sabado => "Sábado",
        }
    }

    pub fn short(self) -> &'static str {
        match self {
            Weekday::Domingo => "DOM",
            Weekday::Segunda => "SEG",
            Weekday::Terca => "TER",
            Weekday::Quarta => "QUA",
            Weekday::Quinta => "QUI",
            Weekday::Sexta => "SEX",
            Weekday::Sabado => "SAB",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|day| day.label() == label)
    }

    pub fn from_chrono(day: chrono::Weekday) -> Self {
        Self::ALL[day.num_days_from_sunday() as usize]
    }

    /// Today in São Paulo
    pub fn today() -> Self {
        Self::from_chrono(Utc::now().with_timezone(&sao_paulo()).weekday())
    }
}

/// Meetings held on `day`, in input order
pub fn meetings_for_day(meetings: &[Meeting], day: Weekday) -> Vec<&Meeting> {
    meetings
        .iter()
        .filter(|meeting| meeting.day_of_week == day.label())
        .collect()
}

/// One column per weekday, Sunday first
pub fn meetings_by_weekday(meetings: &[Meeting]) -> Vec<(Weekday, Vec<&Meeting>)> {
    Weekday::ALL
        .into_iter()
        .map(|day| (day, meetings_for_day(meetings, day)))
        .collect()
}

/// `H:MM` or `HH:MM`, 00:00 to 23:59
pub fn is_valid_meeting_time(time: &str) -> bool {
    MEETING_TIME.is_match(time)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(id: &str, date_time: &str) -> Event {
        Event {
            id: id.to_string(),
            title: format!("Evento {id}"),
            description: "Descrição".to_string(),
            date_time: date_time.to_string(),
            location: "Local".to_string(),
            kind: "Palestra".to_string(),
            category: "Acadêmico".to_string(),
            created_at: None,
            updated_at: None,
            author_id: None,
            author: None,
        }
    }

    fn meeting(id: &str, day: &str) -> Meeting {
        Meeting {
            id: id.to_string(),
            day_of_week: day.to_string(),
            time: "19:30".to_string(),
            end_time: None,
            kind: "Aberta".to_string(),
            category: "Reunião Tradicional".to_string(),
            room_opener: "João".to_string(),
        }
    }

    #[test]
    fn test_group_events_by_month() {
        let events = vec![
            event("2", "2025-01-20T14:00:00Z"),
            event("3", "2025-02-10T16:00:00Z"),
            event("1", "2025-01-15T10:00:00Z"),
        ];

        let groups = group_events_by_month(&events);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].key, "2025-01");
        assert_eq!(groups[0].label, "Janeiro/2025");
        let ids: Vec<_> = groups[0].events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["1", "2"]);
        assert_eq!(groups[1].key, "2025-02");
        assert_eq!(groups[1].label, "Fevereiro/2025");
        assert_eq!(groups[1].events.len(), 1);
    }

    #[test]
    fn test_grouping_uses_sao_paulo_month() {
        // 02:00 UTC on March 1st is still February 28th in São Paulo
        let groups = group_events_by_month(&[event("1", "2025-03-01T02:00:00Z")]);
        assert_eq!(groups[0].key, "2025-02");

        let groups = group_events_by_month(&[event("1", "2024-12-31T12:00:00Z"), event("2", "bad")]);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].label, "Dezembro/2024");
    }

    #[test]
    fn test_parse_event_time_forms() {
        let utc = |value: &str| parse_event_time(value).map(|at| at.with_timezone(&Utc).to_rfc3339());

        assert_eq!(utc("2025-01-15T10:00:00Z").as_deref(), Some("2025-01-15T10:00:00+00:00"));
        assert_eq!(utc("2025-01-15T10:00").as_deref(), Some("2025-01-15T13:00:00+00:00"));
        assert_eq!(utc("2025-01-15T10:00:30").as_deref(), Some("2025-01-15T13:00:30+00:00"));
        assert_eq!(
            utc("2025-01-15T10:00:00.123").as_deref(),
            Some("2025-01-15T13:00:00.123+00:00")
        );
        assert_eq!(utc("2025-01-15").as_deref(), Some("2025-01-15T00:00:00+00:00"));
        assert!(utc("15/01/2025").is_none());
    }

    #[test]
    fn test_loose_dates_are_grouped_and_filtered() {
        let events = vec![
            event("date-only", "2025-01-15"),
            event("millis", "2025-02-03T18:00:00.250"),
        ];

        let groups = group_events_by_month(&events);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].events[0].id, "date-only");
        assert_eq!(groups[1].events[0].id, "millis");

        let now = DateTime::parse_from_rfc3339("2025-01-20T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let future: Vec<_> = filter_future_events(&events, now)
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(future, ["millis"]);
    }

    #[test]
    fn test_filter_future_events() {
        let now = DateTime::parse_from_rfc3339("2025-06-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let events = vec![
            event("past", "2025-05-31T23:59:59Z"),
            event("now", "2025-06-01T12:00:00Z"),
            event("future", "2025-06-01T12:00:01Z"),
            event("local", "2025-06-01T10:00"),
            event("garbage", "amanhã"),
        ];

        let future: Vec<_> = filter_future_events(&events, now)
            .into_iter()
            .map(|e| e.id)
            .collect();

        // 10:00 in São Paulo is 13:00 UTC
        assert_eq!(future, ["future", "local"]);
    }

    #[test]
    fn test_meetings_for_day() {
        let meetings = vec![
            meeting("1", "Segunda-feira"),
            meeting("2", "Sábado"),
            meeting("3", "Segunda-feira"),
        ];

        let monday: Vec<_> = meetings_for_day(&meetings, Weekday::Segunda)
            .into_iter()
            .map(|m| m.id.as_str())
            .collect();
        assert_eq!(monday, ["1", "3"]);
        assert!(meetings_for_day(&meetings, Weekday::Domingo).is_empty());

        let columns = meetings_by_weekday(&meetings);
        assert_eq!(columns.len(), 7);
        assert_eq!(columns[0].0, Weekday::Domingo);
        assert_eq!(columns[6].1.len(), 1);
    }

    #[test]
    fn test_weekday_labels() {
        assert_eq!(Weekday::from_label("Terça-feira"), Some(Weekday::Terca));
        assert_eq!(Weekday::from_label("terça"), None);
        assert_eq!(Weekday::from_chrono(chrono::Weekday::Sun), Weekday::Domingo);
        assert_eq!(Weekday::from_chrono(chrono::Weekday::Sat).short(), "SAB");
    }

    #[test]
    fn test_meeting_time_format() {
        for ok in ["9:05", "09:05", "00:00", "23:59", "19:30"] {
            assert!(is_valid_meeting_time(ok), "{ok}");
        }
        for bad in ["24:00", "12:60", "1230", "", "7:5", "12:30:00", " 12:30"] {
            assert!(!is_valid_meeting_time(bad), "{bad}");
        }
    }
}
