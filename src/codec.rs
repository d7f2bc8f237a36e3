//! Duration and time-of-day codecs for provider values.

/// Parses a provider duration of the form `PT<h>H<m>M` into minutes.
/// Either component may be absent. Malformed input yields 0 rather than
/// an error; a broken duration must not take down a whole result render.
pub fn parse_duration(text: &str) -> u32 {
    let rest = match text.find("PT") {
        Some(idx) => &text[idx + 2..],
        None => return 0,
    };

    let (value, rest) = take_number(rest);
    let (hours, minutes) = match rest.as_bytes().first() {
        Some(b'H') => {
            let (m, rest) = take_number(&rest[1..]);
            match rest.as_bytes().first() {
                Some(b'M') => (value, m),
                _ => (value, 0),
            }
        }
        Some(b'M') => (0, value),
        _ => (0, 0),
    };

    hours * 60 + minutes
}

fn take_number(text: &str) -> (u32, &str) {
    let end = text
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(text.len());
    let value = text[..end].parse().unwrap_or(0);
    (value, &text[end..])
}

/// Renders minutes as `"<h>h <m>m"`, dropping a zero component.
/// Zero minutes renders as `"0m"`.
pub fn format_duration(minutes: u32) -> String {
    let h = minutes / 60;
    let m = minutes % 60;
    if h == 0 {
        return format!("{}m", m);
    }
    if m == 0 {
        return format!("{}h", h);
    }
    format!("{}h {}m", h, m)
}

/// Renders a minutes-from-midnight offset as 12-hour clock time with
/// AM/PM. The offset is interpreted modulo 24 hours; noon and midnight
/// render as 12.
pub fn format_minutes_as_time(minutes: u32) -> String {
    let h = (minutes / 60) % 24;
    let m = minutes % 60;
    let period = if h >= 12 { "PM" } else { "AM" };

    let hour12 = if h == 0 {
        12
    } else if h > 12 {
        h - 12
    } else {
        h
    };

    format!("{}:{:02} {}", hour12, m, period)
}

/// Renders a date as `yyyy-mm-dd`, the form the provider expects in
/// query parameters and the chart uses as point labels.
pub fn format_date(date: time::Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

/// Human label for a stop count: "Nonstop", "1 stop", "n stops".
pub fn format_stops_label(stops: u32) -> String {
    match stops {
        0 => "Nonstop".to_string(),
        1 => "1 stop".to_string(),
        n => format!("{} stops", n),
    }
}
