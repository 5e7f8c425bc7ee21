use crate::error::CoreError;
use crate::models::Occurrence;
use crate::moment::Moment;
use crate::recurrence::RecurrenceRule;
use crate::reminder::{Cadence, Reminder, ReminderRule};

/// Attaches reminders to occurrences and finds the ones due in a window.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReminderBroker;

impl ReminderBroker {
    pub fn new() -> Self {
        Self
    }

    /// Collects reminders due in `[start, end]`.
    ///
    /// # Arguments
    /// * `occurrences` - Occurrences whose own reminders are filtered by fire time
    /// * `rules` - Recurrence rules considered as a whole
    /// * `start` - Window start, inclusive
    /// * `end` - Window end, inclusive
    ///
    /// # Behavior
    /// - Each occurrence contributes the reminders that fire inside the window
    /// - A rule whose whole lifetime sits inside the window contributes every
    ///   reminder on its template, unfiltered
    /// - Results keep source order and are not deduplicated
    pub fn reminders_in_window(
        &self,
        occurrences: &[Occurrence],
        rules: &[RecurrenceRule],
        start: Moment,
        end: Moment,
    ) -> Vec<Reminder> {
        let mut due: Vec<Reminder> = occurrences
            .iter()
            .flat_map(Occurrence::reminders)
            .filter(|reminder| start <= reminder.fire_at && reminder.fire_at <= end)
            .cloned()
            .collect();

        for rule in rules {
            if rule.created_on() >= start && rule.end_moment() <= end {
                due.extend(rule.template().reminders().iter().cloned());
            }
        }

        tracing::debug!(from = %start, until = %end, count = due.len(), "reminders in window");
        due
    }

    /// Adds a single reminder to `occurrence`.
    pub fn attach(&self, occurrence: &mut Occurrence, message: impl Into<String>, at: Moment) {
        occurrence.add_reminders([Reminder::new(message, at)]);
    }

    /// Adds one reminder per `cadence` step from `from` up to the occurrence's start.
    /// Returns how many were added.
    pub fn attach_series(
        &self,
        occurrence: &mut Occurrence,
        message: impl Into<String>,
        cadence: Cadence,
        from: Moment,
    ) -> Result<usize, CoreError> {
        let reminders = ReminderRule::new(message, cadence).generate(from, occurrence.start())?;
        let added = reminders.len();
        occurrence.add_reminders(reminders);
        Ok(added)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recurrence::{Frequency, Termination};

    fn at(date: &str, time: &str) -> Moment {
        Moment::from_date_time_strings(date, time).unwrap()
    }

    fn day(date: &str) -> Moment {
        Moment::from_date_string(date).unwrap()
    }

    #[test]
    fn test_attach_and_filter_by_window() {
        let broker = ReminderBroker::new();
        let mut meeting = Occurrence::new("Meeting", at("10/03/2024", "03:00:pm"), at("10/03/2024", "04:00:pm"));
        broker.attach(&mut meeting, "morning heads-up", at("10/03/2024", "09:00:am"));
        broker.attach(&mut meeting, "day before", at("09/03/2024", "09:00:am"));

        let due = broker.reminders_in_window(
            std::slice::from_ref(&meeting),
            &[],
            at("10/03/2024", "08:00:am"),
            at("10/03/2024", "09:00:am"),
        );
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].message, "morning heads-up");
    }

    #[test]
    fn test_attach_series_runs_up_to_start() {
        let broker = ReminderBroker::new();
        let mut meeting = Occurrence::new("Meeting", at("10/03/2024", "03:00:pm"), at("10/03/2024", "04:00:pm"));
        let added = broker
            .attach_series(&mut meeting, "prepare", Cadence::Hourly, at("10/03/2024", "01:00:pm"))
            .unwrap();
        // 13:00, 14:00 and 15:00.
        assert_eq!(added, 3);
        assert_eq!(meeting.reminders().last().map(|r| r.fire_at), Some(meeting.start()));
    }

    #[test]
    fn test_rule_inside_window_contributes_all_template_reminders() {
        let broker = ReminderBroker::new();
        let mut template = Occurrence::series_template("Gym", "Workout", at("01/03/2024", "06:00:am"), at("01/03/2024", "07:00:am"));
        broker.attach(&mut template, "far outside", at("01/01/2020", "06:00:am"));
        broker.attach(&mut template, "also outside", at("01/01/2030", "06:00:am"));
        let rule = RecurrenceRule::new(
            at("01/03/2024", "06:00:am"),
            vec![Frequency::Daily],
            template,
            Termination::FiniteCount(3),
        )
        .unwrap();

        let inside = broker.reminders_in_window(&[], std::slice::from_ref(&rule), day("01/02/2024"), day("01/05/2024"));
        assert_eq!(inside.len(), 2);

        // A window that cuts the rule's lifetime yields nothing from it.
        let cut = broker.reminders_in_window(&[], std::slice::from_ref(&rule), day("02/03/2024"), day("01/05/2024"));
        assert!(cut.is_empty());
    }
}
