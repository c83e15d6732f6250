// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Time remaining in the current calendar day.

use chrono::{FixedOffset, NaiveDateTime, NaiveTime, Utc};
use futures_util::Stream;
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Hours, minutes and seconds left until 23:59:59.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Remaining {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub hours: i64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub minutes: i64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub seconds: i64,
}

impl fmt::Display for Remaining {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} : {} : {}", self.hours, self.minutes, self.seconds)
    }
}

/// Remaining time from `now` (local wall clock) until 23:59:59 the same day.
///
/// Components are floored. The last second of the day reads as zero.
pub fn time_until_end_of_day(now: NaiveDateTime) -> Remaining {
    let end_of_day = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN);
    let target = now.date().and_time(end_of_day);
    let total_ms = (target - now).num_milliseconds().max(0);
    let total_secs = total_ms / 1000;

    Remaining {
        hours: total_secs / 3600,
        minutes: (total_secs / 60) % 60,
        seconds: total_secs % 60,
    }
}

/// Ticks once per second, starting immediately.
///
/// The interval lives inside the stream: dropping the stream (for example when
/// an SSE client disconnects) stops the timer.
pub fn countdown(offset: FixedOffset) -> impl Stream<Item = Remaining> + Send + 'static {
    let mut interval = tokio::time::interval(Duration::from_secs(1));
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    futures_util::stream::unfold(interval, move |mut interval| async move {
        interval.tick().await;
        let now = Utc::now().with_timezone(&offset).naive_local();
        Some((time_until_end_of_day(now), interval))
    })
}
