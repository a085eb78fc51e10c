//! Screening schedule feed.
//!
//! The feed is a JSON object keyed by date, each value describing the
//! screenings of that day:
//!
//! ```json
//! {"2014-09-05": {"date": "Sep 5", "eventformat": "Public",
//!                 "timekeys": [{"starttime": "19:00", "venue_name": "...",
//!                               "extended_q_and_a": "1", "premium": "0", ...}]}}
//! ```
//!
//! Films without screenings get an HTML fallback page instead, recognisable
//! by the feed path showing up in its body.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::{PageFetcher, Result, ScheduleItem};

/// Present in the fallback body served when a film has no schedule.
pub const NO_SCHEDULE_MARKER: &str = "whats-on-film";

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ScheduleFeed {
    Dates(BTreeMap<String, DateBlock>),
    // An empty map comes through as `[]`.
    Empty(Vec<Value>),
}

#[derive(Debug, Default, Deserialize)]
struct DateBlock {
    #[serde(default, deserialize_with = "lenient_text")]
    date: String,
    #[serde(default, deserialize_with = "lenient_text")]
    eventformat: String,
    #[serde(default)]
    timekeys: Option<Vec<TimeKey>>,
}

#[derive(Debug, Default, Deserialize)]
struct TimeKey {
    #[serde(default, deserialize_with = "lenient_text")]
    starttime: String,
    #[serde(default, deserialize_with = "lenient_text")]
    venue_name: String,
    #[serde(default, deserialize_with = "lenient_text")]
    room_name: String,
    #[serde(default, deserialize_with = "present")]
    extended_q_and_a: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    premium: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    press: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    industry: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    school: Option<Value>,
}

fn text_of(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn lenient_text<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<String, D::Error> {
    Ok(text_of(Value::deserialize(deserializer)?))
}

// Keeps an explicit `null` apart from a missing key.
fn present<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

/// Feed flags are the string `"0"` for off; any other value that is present
/// (including numbers and `null`) means on. A missing flag is off.
pub fn flag(value: Option<Value>) -> bool {
    match value {
        Some(Value::String(s)) => s != "0",
        Some(_) => true,
        None => false,
    }
}

impl DateBlock {
    fn into_items(self) -> Vec<ScheduleItem> {
        let day = ScheduleItem {
            date_str: self.date,
            event_format: self.eventformat,
            ..Default::default()
        };
        let slots = self.timekeys.unwrap_or_default();
        if slots.is_empty() {
            return vec![day];
        }

        slots
            .into_iter()
            .map(|slot| ScheduleItem {
                time_str: slot.starttime,
                venue: slot.venue_name,
                venue_room: slot.room_name,
                q_and_a: flag(slot.extended_q_and_a),
                premium: flag(slot.premium),
                press: flag(slot.press),
                school: flag(slot.school),
                industry: flag(slot.industry),
                ..day.clone()
            })
            .collect()
    }
}

/// Whether the body is the "no schedule" fallback rather than a feed.
pub fn is_unscheduled(body: &str) -> bool {
    body.contains(NO_SCHEDULE_MARKER)
}

/// Decode a schedule feed body into one item per (date, time slot).
///
/// Missing fields fall back to empty values; a body that is not JSON, or not
/// shaped like a date map, is an error.
pub fn decode(body: &str) -> Result<Vec<ScheduleItem>> {
    let items = match serde_json::from_str::<ScheduleFeed>(body)? {
        ScheduleFeed::Dates(dates) => dates
            .into_values()
            .flat_map(DateBlock::into_items)
            .collect(),
        ScheduleFeed::Empty(list) if list.is_empty() => Vec::new(),
        ScheduleFeed::Empty(_) => {
            return Err(<serde_json::Error as serde::de::Error>::custom(
                "schedule feed is a non-empty list, expected a map of dates",
            )
            .into());
        }
    };
    Ok(items)
}

/// Build the feed URL for an object id.
pub fn feed_url(endpoint: &str, object_id: &str) -> String {
    format!("{}{}", endpoint, object_id)
}

/// Fetch and decode the schedule for `object_id`.
///
/// Returns an empty schedule when the site serves its fallback page.
pub async fn fetch_schedule<F: PageFetcher + ?Sized>(
    fetcher: &F,
    endpoint: &str,
    object_id: &str,
) -> Result<Vec<ScheduleItem>> {
    let body = fetcher.fetch_text(&feed_url(endpoint, object_id)).await?;
    if is_unscheduled(&body) {
        tracing::warn!("{} does not have a schedule", object_id);
        return Ok(Vec::new());
    }
    decode(&body)
}
