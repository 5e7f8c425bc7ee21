use almanac_core::moment::Moment;
use almanac_core::recurrence::Frequency;
use anyhow::{Context, Result};

/// Parses "dd/MM/yyyy" or "dd/MM/yyyy hh:mm:am".
pub fn parse_moment(input: &str) -> Result<Moment> {
    let mut parts = input.split_whitespace();
    let moment = match (parts.next(), parts.next(), parts.next()) {
        (Some(date), None, None) => Moment::from_date_string(date)?,
        (Some(date), Some(time), None) => Moment::from_date_time_strings(date, time)?,
        _ => anyhow::bail!("Failed to parse '{}': expected \"dd/MM/yyyy [hh:mm:am]\"", input),
    };
    Ok(moment)
}

/// Start and end on `date`; the end defaults to the start.
pub fn parse_span(date: &str, start: &str, end: Option<&str>) -> Result<(Moment, Moment)> {
    let start_moment = Moment::from_date_time_strings(date, start)?;
    let end_moment = match end {
        Some(end) => Moment::from_date_time_strings(date, end)?,
        None => start_moment,
    };
    Ok((start_moment, end_moment))
}

pub fn parse_frequencies(tokens: &[String]) -> Result<Vec<Frequency>> {
    tokens
        .iter()
        .map(|token| {
            token
                .trim()
                .parse::<Frequency>()
                .with_context(|| format!("Failed to parse repetition '{}'", token))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    #[test]
    fn test_parse_moment_with_and_without_time() {
        let date_only = parse_moment("15/03/2024").unwrap();
        assert_eq!(date_only.time_of_day(), (1, 0));

        let with_time = parse_moment("15/03/2024 02:30:pm").unwrap();
        assert_eq!(with_time.time_of_day(), (14, 30));

        assert!(parse_moment("").is_err());
        assert!(parse_moment("15/03/2024 02:30:pm extra").is_err());
        assert!(parse_moment("2024-03-15").is_err());
    }

    #[test]
    fn test_parse_span_defaults_end() {
        let (start, end) = parse_span("01/01/2024", "09:00:am", None).unwrap();
        assert_eq!(start, end);

        let (start, end) = parse_span("01/01/2024", "09:00:am", Some("10:30:am")).unwrap();
        assert_eq!(end.millis() - start.millis(), 90 * 60 * 1000);
    }

    #[test]
    fn test_parse_frequencies() {
        let tokens = vec!["mon".to_string(), " wed".to_string()];
        assert_eq!(
            parse_frequencies(&tokens).unwrap(),
            vec![Frequency::Weekly(Weekday::Mon), Frequency::Weekly(Weekday::Wed)]
        );
        assert!(parse_frequencies(&["fortnightly".to_string()]).is_err());
    }
}
