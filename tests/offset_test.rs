use jetlag::offset::{local_datetime, local_hour, parse_offset, UtcOffset};
use rstest::rstest;

#[rstest]
#[case("2025-08-18T13:05:00+02:00", 2.0, 2)]
#[case("2025-08-18T17:30:00-04:00", -4.0, -4)]
#[case("2025-08-18T17:30:00-0400", -4.0, -4)]
#[case("2025-08-18T09:00:00+05:30", 5.5, 5)]
#[case("2025-08-18T09:00:00+05:45", 5.75, 5)]
#[case("2025-08-18T09:00:00-09:30", -9.5, -9)]
#[case("2025-08-18T09:00:00+00:00", 0.0, 0)]
#[case("2025-08-18T09:00:00.000+14:00", 14.0, 14)]
fn parses_offset_suffix(#[case] ts: &str, #[case] hours: f64, #[case] whole: i32) {
    let offset = parse_offset(ts).expect("offset present");
    assert_eq!(offset.as_hours(), hours);
    assert_eq!(offset.hour_component(), whole);
}

#[rstest]
#[case::no_suffix("2025-08-18T17:30:00")]
#[case::zulu("2025-08-18T17:30:00Z")]
#[case::date_only("2025-08-18")]
#[case::short_offset("2025-08-18T17:30:00+2")]
#[case::trailing_space("2025-08-18T17:30:00+02:00 ")]
#[case::empty("")]
fn rejects_missing_offset(#[case] ts: &str) {
    assert_eq!(parse_offset(ts), None);
}

#[test]
fn offset_keeps_sign_and_parts() {
    assert_eq!(
        parse_offset("2025-01-01T00:00:00-03:30"),
        Some(UtcOffset {
            negative: true,
            hours: 3,
            minutes: 30,
        })
    );
}

#[test]
fn offset_display_is_canonical() {
    let offset = parse_offset("2025-01-01T00:00:00-0330").unwrap();
    assert_eq!(offset.to_string(), "-03:30");
}

#[rstest]
#[case::with_offset("2025-08-18T17:30:00-04:00", Some(17))]
#[case::east_offset("2025-08-19T03:15:00+09:00", Some(3))]
#[case::fractional_seconds("2025-08-18T08:00:00.250+01:00", Some(8))]
#[case::no_seconds("2025-08-18T23:45+01:00", Some(23))]
#[case::naive("2025-08-18T06:00:00", Some(6))]
#[case::zulu("2025-08-18T12:00:00Z", Some(12))]
#[case::space_separated("2025-08-18 21:00:00", Some(21))]
#[case::garbage("next tuesday", None)]
#[case::date_only("2025-08-18", None)]
fn local_hour_is_wall_clock(#[case] ts: &str, #[case] hour: Option<u32>) {
    assert_eq!(local_hour(ts), hour);
}

#[test]
fn local_datetime_ignores_the_offset() {
    let dt = local_datetime("2025-08-18T17:30:00-04:00").unwrap();
    assert_eq!(dt.to_string(), "2025-08-18 17:30:00");
}
