use time::{format_description::well_known::Rfc3339, OffsetDateTime, PrimitiveDateTime};

/// Current wall-clock time as a naive UTC timestamp, matching how the
/// database columns store it.
pub(crate) fn primitive_now_utc() -> PrimitiveDateTime {
    let now = OffsetDateTime::now_utc();
    PrimitiveDateTime::new(now.date(), now.time())
}

/// Renders a stored timestamp as Rfc3339 with an explicit Z suffix.
pub(crate) fn format_primitive(value: PrimitiveDateTime) -> String {
    let utc = value.assume_utc();
    utc.format(&Rfc3339).unwrap_or_else(|_| utc.to_string())
}

#[cfg(test)]
mod tests {
    use time::{Date, Time};

    use super::*;

    #[test]
    fn format_primitive_outputs_utc_z() {
        let date = Date::from_calendar_date(2026, time::Month::March, 15).unwrap();
        let time = Time::from_hms(8, 5, 0).unwrap();
        let value = PrimitiveDateTime::new(date, time);
        assert_eq!(format_primitive(value), "2026-03-15T08:05:00Z");
    }

    #[test]
    fn now_is_monotonic_enough_for_ordering() {
        let first = primitive_now_utc();
        let second = primitive_now_utc();
        assert!(second >= first);
    }
}
