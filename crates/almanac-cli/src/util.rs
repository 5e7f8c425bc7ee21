use almanac_core::calendar::Calendar;
use almanac_core::error::CoreError;
use anyhow::{anyhow, Result};
use uuid::Uuid;

use crate::error::CliError;

/// Resolves a full id or a unique prefix against every item on the calendar.
pub fn resolve_id(calendar: &Calendar, short_id: &str) -> Result<Uuid> {
    if let Ok(id) = short_id.parse::<Uuid>() {
        return Ok(id);
    }
    if short_id.len() < 2 {
        return Err(anyhow!(CoreError::InvalidInput(
            "Short ID must be at least 2 characters long.".to_string()
        )));
    }

    let timeline = calendar.timeline();
    let candidates: Vec<(Uuid, String)> = timeline
        .occurrences()
        .iter()
        .map(|o| (o.id(), o.title().to_string()))
        .chain(timeline.rules().iter().map(|r| (r.id(), r.series_name().to_string())))
        .chain(timeline.fixed_rules().iter().map(|r| (r.id(), r.name().to_string())))
        .filter(|(id, _)| id.to_string().starts_with(short_id))
        .collect();

    match candidates.as_slice() {
        [] => Err(anyhow!(CliError::NoMatch(short_id.to_string()))),
        [(id, _)] => Ok(*id),
        _ => Err(anyhow!(CliError::AmbiguousId(short_id.to_string(), candidates))),
    }
}
