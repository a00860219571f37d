use chrono::{DateTime, Datelike, Days, Local, NaiveDate, NaiveTime, TimeZone, Weekday};

/// Resolve a free-text delivery timeframe like "Monday at 5:00 PM" into an
/// absolute local timestamp, using the calendar year of `now`.
///
/// Returns `None` whenever the string cannot be resolved; callers treat that
/// as "not yet expired" and skip the row instead of comparing against a
/// garbage date.
pub fn parse_timeframe(raw: &str, now: DateTime<Local>) -> Option<DateTime<Local>> {
    let (date_part, time_part) = raw.split_once(" at")?;

    let date = parse_date_phrase(date_part.trim(), now)?;
    let time = parse_time_phrase(time_part.trim())?;

    Local.from_local_datetime(&date.and_time(time)).single()
}

/// Accepted date phrases: "today", "tomorrow", a weekday name (full or
/// three-letter), or a month-day phrase like "June 5" / "Jun 5".
fn parse_date_phrase(phrase: &str, now: DateTime<Local>) -> Option<NaiveDate> {
    let phrase = phrase.trim_matches(|c: char| c == ',' || c.is_whitespace());
    if phrase.is_empty() {
        return None;
    }

    let today = now.date_naive();

    match phrase.to_ascii_lowercase().as_str() {
        "today" => return Some(today),
        "tomorrow" => return today.checked_add_days(Days::new(1)),
        _ => {}
    }

    if let Ok(weekday) = phrase.parse::<Weekday>() {
        return weekday_in_current_week(today, weekday);
    }

    let with_year = format!("{} {}", phrase, now.year());
    for format in ["%B %d %Y", "%b %d %Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(&with_year, format) {
            return Some(date);
        }
    }

    None
}

/// Weeks run Sunday through Saturday: "Monday" seen on a Tuesday means
/// yesterday, seen on the preceding Sunday it means the day after.
fn weekday_in_current_week(today: NaiveDate, weekday: Weekday) -> Option<NaiveDate> {
    let week_start =
        today.checked_sub_days(Days::new(u64::from(today.weekday().num_days_from_sunday())))?;
    week_start.checked_add_days(Days::new(u64::from(weekday.num_days_from_sunday())))
}

/// Accepted time phrases: "5:00 PM", "17:00", "5 PM" (case-insensitive).
fn parse_time_phrase(phrase: &str) -> Option<NaiveTime> {
    let normalized = phrase.trim().to_ascii_uppercase();
    if normalized.is_empty() {
        return None;
    }

    for format in ["%I:%M %p", "%H:%M"] {
        if let Ok(time) = NaiveTime::parse_from_str(&normalized, format) {
            return Some(time);
        }
    }

    // Bare-hour phrases like "5 PM" carry no minutes; give them some before
    // the 12-hour parse.
    if let Some((hour, meridiem)) = normalized.split_once(' ') {
        let rebuilt = format!("{}:00 {}", hour, meridiem);
        if let Ok(time) = NaiveTime::parse_from_str(&rebuilt, "%I:%M %p") {
            return Some(time);
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(year, month, day, hour, minute, 0).unwrap()
    }

    // 2026-08-02 is a Sunday, 2026-08-03 a Monday, 2026-08-04 a Tuesday.

    #[test]
    fn weekday_phrase_is_past_by_the_following_tuesday() {
        let now = local(2026, 8, 4, 12, 0);
        let parsed = parse_timeframe("Monday at 5:00 PM", now).unwrap();
        assert_eq!(parsed, local(2026, 8, 3, 17, 0));
        assert!(now > parsed);
    }

    #[test]
    fn weekday_phrase_is_still_ahead_on_the_preceding_sunday() {
        let now = local(2026, 8, 2, 12, 0);
        let parsed = parse_timeframe("Monday at 5:00 PM", now).unwrap();
        assert_eq!(parsed, local(2026, 8, 3, 17, 0));
        assert!(now < parsed);
    }

    #[test]
    fn weekday_phrase_accepts_short_names_and_lowercase() {
        let now = local(2026, 8, 4, 12, 0);
        assert_eq!(
            parse_timeframe("mon at 5:00 pm", now),
            Some(local(2026, 8, 3, 17, 0))
        );
    }

    #[test]
    fn month_day_phrase_resolves_against_the_current_year() {
        let now = local(2026, 8, 4, 12, 0);
        assert_eq!(
            parse_timeframe("June 5 at 5:00 PM", now),
            Some(local(2026, 6, 5, 17, 0))
        );
        assert_eq!(
            parse_timeframe("Jun 5 at 17:00", now),
            Some(local(2026, 6, 5, 17, 0))
        );
    }

    #[test]
    fn today_and_tomorrow_phrases() {
        let now = local(2026, 8, 4, 12, 0);
        assert_eq!(
            parse_timeframe("today at 9:30 AM", now),
            Some(local(2026, 8, 4, 9, 30))
        );
        assert_eq!(
            parse_timeframe("Tomorrow at 9:30 AM", now),
            Some(local(2026, 8, 5, 9, 30))
        );
    }

    #[test]
    fn bare_hour_time_phrase() {
        let now = local(2026, 8, 4, 12, 0);
        assert_eq!(
            parse_timeframe("today at 5 PM", now),
            Some(local(2026, 8, 4, 17, 0))
        );
    }

    #[test]
    fn midnight_is_twelve_am() {
        let now = local(2026, 8, 4, 12, 0);
        assert_eq!(
            parse_timeframe("today at 12:00 AM", now),
            Some(local(2026, 8, 4, 0, 0))
        );
    }

    #[test]
    fn missing_separator_fails() {
        let now = local(2026, 8, 4, 12, 0);
        assert_eq!(parse_timeframe("Monday 5:00 PM", now), None);
        assert_eq!(parse_timeframe("", now), None);
    }

    #[test]
    fn unrecognized_date_phrase_fails() {
        let now = local(2026, 8, 4, 12, 0);
        assert_eq!(parse_timeframe("whenever at 5:00 PM", now), None);
    }

    #[test]
    fn unrecognized_time_phrase_fails() {
        let now = local(2026, 8, 4, 12, 0);
        assert_eq!(parse_timeframe("Monday at sometime", now), None);
        assert_eq!(parse_timeframe("Monday at", now), None);
    }

    #[test]
    fn impossible_calendar_date_fails() {
        let now = local(2026, 8, 4, 12, 0);
        assert_eq!(parse_timeframe("February 30 at 5:00 PM", now), None);
    }
}
