use almanac_core::calendar::Calendar;
use almanac_core::clock::{TickUnit, VirtualClock};
use almanac_core::error::CoreError;
use almanac_core::models::{Occurrence, OccurrenceKind};
use almanac_core::moment::Moment;
use almanac_core::recurrence::{Frequency, Termination};
use almanac_core::reminder::Cadence;
use almanac_core::timeline::{Removed, Timeline};
use chrono::Weekday;
use rstest::{fixture, rstest};

fn day(date: &str) -> Moment {
    Moment::from_date_string(date).expect("valid test date")
}

fn at(date: &str, time: &str) -> Moment {
    Moment::from_date_time_strings(date, time).expect("valid test moment")
}

fn dates(occurrences: &[Occurrence]) -> Vec<String> {
    occurrences
        .iter()
        .map(|o| o.start().format_with("%d/%m/%Y").expect("valid pattern"))
        .collect()
}

/// A calendar with one of each kind of item, anchored in the first week of 2024.
#[fixture]
fn busy_calendar() -> Calendar {
    let mut calendar = Calendar::new("Busy");
    let timeline = calendar.timeline_mut();
    timeline.create_occurrence("Kickoff", at("02/01/2024", "10:00:am"), at("02/01/2024", "11:30:am"));
    timeline
        .create_recurrence(
            "Standup",
            "Standup",
            at("01/01/2024", "09:00:am"),
            at("01/01/2024", "09:15:am"),
            vec![Frequency::Daily],
            Termination::FiniteCount(5),
        )
        .expect("daily rule");
    timeline
        .create_recurrence(
            "Gym",
            "Gym",
            at("01/01/2024", "06:00:pm"),
            at("01/01/2024", "07:00:pm"),
            vec![Frequency::Weekly(Weekday::Mon), Frequency::Weekly(Weekday::Wed)],
            Termination::UntilDate(day("31/01/2024")),
        )
        .expect("weekly rule");
    timeline.create_fixed_rule("Holiday", 0, 1, 13).expect("fixed rule");
    calendar
}

#[rstest]
#[case(1)]
#[case(5)]
#[case(31)]
#[case(400)]
fn test_daily_rule_with_count_yields_exactly_count(#[case] count: u32) {
    let mut timeline = Timeline::new();
    let created = at("01/01/2024", "08:00:am");
    let id = timeline
        .create_recurrence("s", "daily", created, created, vec![Frequency::Daily], Termination::FiniteCount(count))
        .expect("rule");

    let occurrences = timeline
        .rule_by_id(id)
        .expect("rule exists")
        .generate(created, Moment::FAR_FUTURE)
        .expect("expansion");
    assert_eq!(occurrences.len(), count as usize);

    let expected_last = created
        .offset_millis(i64::from(count - 1) * 24 * 60 * 60 * 1000)
        .expect("in range");
    assert_eq!(occurrences.last().map(Occurrence::start), Some(expected_last));
}

#[rstest]
fn test_daily_count_five_inclusive_window(busy_calendar: Calendar) {
    let rule = &busy_calendar.timeline().rules()[0];
    let occurrences = rule.generate(day("02/01/2024"), day("04/01/2024")).expect("expansion");
    assert_eq!(dates(&occurrences), vec!["02/01/2024", "03/01/2024", "04/01/2024"]);
}

#[rstest]
#[case("01/01/2024", "07/01/2024")]
#[case("08/01/2024", "14/01/2024")]
#[case("22/01/2024", "28/01/2024")]
fn test_weekly_rule_hits_monday_and_wednesday(busy_calendar: Calendar, #[case] from: &str, #[case] to: &str) {
    let rule = &busy_calendar.timeline().rules()[1];
    let week = rule.generate(day(from), day(to)).expect("expansion");
    let weekdays: Vec<Weekday> = week.iter().map(|o| o.start().weekday()).collect();
    assert_eq!(weekdays, vec![Weekday::Mon, Weekday::Wed]);
}

#[rstest]
#[case("07/01/2024", true)]
#[case("04/02/2024", true)]
#[case("03/03/2024", true)]
#[case("06/10/2024", true)]
#[case("14/01/2024", false)]
#[case("08/01/2024", false)]
#[case("31/03/2024", false)]
fn test_first_sunday_holiday(#[case] date: &str, #[case] expected: bool) {
    let mut timeline = Timeline::new();
    let id = timeline.create_fixed_rule("Holiday", 0, 1, 13).expect("fixed rule");
    let rule = timeline.fixed_rules().iter().find(|r| r.id() == id).expect("stored");
    assert_eq!(rule.is_on_date(day(date)), expected);
}

#[rstest]
#[case(2024)]
#[case(2025)]
#[case(2100)]
fn test_third_friday_matches_once_a_month(#[case] year: i32) {
    let mut timeline = Timeline::new();
    timeline.create_fixed_rule("Review", 5, 3, 13).expect("fixed rule");
    let start = Moment::from_ymd_hm(year, 1, 1, 1, 0).expect("start");
    let end = Moment::from_ymd_hm(year, 12, 31, 1, 0).expect("end");
    let all = timeline.events_between(start, end).expect("query");
    assert_eq!(all.len(), 12);
}

#[rstest]
fn test_deleting_a_template_removes_only_the_rule(mut busy_calendar: Calendar) {
    let rule_id = busy_calendar.timeline().rules()[0].id();
    let plain_before = busy_calendar.timeline().occurrences().len();

    let removed = busy_calendar.delete(rule_id).expect("delete");
    assert!(matches!(removed, Removed::Rule(rule) if rule.id() == rule_id));
    assert_eq!(busy_calendar.timeline().rules().len(), 1);
    assert_eq!(busy_calendar.timeline().occurrences().len(), plain_before);
    assert!(matches!(
        busy_calendar.timeline().rule_by_id(rule_id),
        Err(CoreError::RuleNotFound(id)) if id == rule_id
    ));
}

#[rstest]
fn test_deleting_an_instance_id_removes_its_rule(mut busy_calendar: Calendar) {
    let instance = busy_calendar.timeline().events_on_date(day("03/01/2024")).expect("query")
        .into_iter()
        .find(|o| o.title() == "Gym")
        .expect("gym on a wednesday");
    assert!(matches!(instance.kind(), OccurrenceKind::Series { rule_id: Some(_), .. }));

    assert!(matches!(busy_calendar.delete(instance.id()), Ok(Removed::Rule(_))));
    let later = busy_calendar.timeline().events_on_date(day("10/01/2024")).expect("query");
    assert!(later.iter().all(|o| o.title() != "Gym"));
}

#[rstest]
fn test_day_view_merges_all_sources(busy_calendar: Calendar) {
    // 07/01/2024: first Sunday, a standup-free day, no gym.
    let sunday = busy_calendar.timeline().events_on_date(day("07/01/2024")).expect("query");
    assert_eq!(sunday.len(), 1);
    assert_eq!(sunday[0].title(), "Holiday");

    let tuesday = busy_calendar.timeline().events_on_date(day("02/01/2024")).expect("query");
    let titles: Vec<&str> = tuesday.iter().map(Occurrence::title).collect();
    assert_eq!(titles, vec!["Standup", "Kickoff"]);

    let wednesday = busy_calendar.timeline().events_on_date(at("03/01/2024", "04:00:pm")).expect("query");
    let titles: Vec<&str> = wednesday.iter().map(Occurrence::title).collect();
    assert_eq!(titles, vec!["Standup", "Gym"]);
}

#[rstest]
fn test_classification_follows_the_clock(busy_calendar: Calendar) {
    let timeline = busy_calendar.timeline();
    let mut clock = VirtualClock::new(at("02/01/2024", "10:30:am"));

    let ongoing = timeline.ongoing(&clock).expect("classify");
    assert!(ongoing.iter().any(|o| o.title() == "Kickoff"));

    clock.advance(TickUnit::Hour, 2).expect("tick");
    let classification = timeline.classify(&clock).expect("classify");
    assert!(classification.past.iter().any(|o| o.title() == "Kickoff"));
    assert!(!classification.ongoing.iter().any(|o| o.title() == "Kickoff"));
    assert!(!classification.upcoming.iter().any(|o| o.title() == "Kickoff"));
}

#[rstest]
fn test_driver_window_sees_each_reminder_once(mut busy_calendar: Calendar) {
    let kickoff = busy_calendar.timeline().occurrences()[0].id();
    let broker = *busy_calendar.broker();
    let occurrence = busy_calendar.timeline_mut().occurrence_mut(kickoff).expect("plain");
    broker
        .attach_series(occurrence, "kickoff soon", Cadence::QuarterHourly, at("02/01/2024", "09:00:am"))
        .expect("reminders");

    let mut clock = VirtualClock::new(at("02/01/2024", "08:59:am"));
    let mut seen = Vec::new();
    for _ in 0..90 {
        let before = clock.current();
        let now = clock.advance(TickUnit::Minute, 1).expect("tick");
        // Half-open per tick so a reminder on a boundary is not reported twice.
        seen.extend(
            busy_calendar
                .reminders_between(before, now)
                .into_iter()
                .filter(|r| r.fire_at > before),
        );
    }
    // 09:00 through 10:00 every quarter hour.
    assert_eq!(seen.len(), 5);
}

#[rstest]
fn test_calendar_survives_serialization(busy_calendar: Calendar) {
    let json = serde_json::to_string_pretty(&busy_calendar).expect("serialize");
    let restored: Calendar = serde_json::from_str(&json).expect("deserialize");

    let original = busy_calendar.timeline().events_between(day("01/01/2024"), day("31/01/2024")).expect("query");
    let round_tripped = restored.timeline().events_between(day("01/01/2024"), day("31/01/2024")).expect("query");
    assert_eq!(dates(&original), dates(&round_tripped));
    assert_eq!(
        original.iter().map(Occurrence::id).collect::<Vec<_>>(),
        round_tripped.iter().map(Occurrence::id).collect::<Vec<_>>()
    );
}
