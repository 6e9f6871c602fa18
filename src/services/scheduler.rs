use std::time::Duration;

use chrono::{DateTime, Days, NaiveTime, Utc};

/// How often the loop wakes up to compare the clock against the next slot.
const POLL_INTERVAL: Duration = Duration::from_secs(60);

/// First scheduled instant strictly after `now`, given times of day in UTC.
pub fn next_run_after(now: DateTime<Utc>, times: &[NaiveTime]) -> Option<DateTime<Utc>> {
    let today = now.date_naive();
    let tomorrow = today.checked_add_days(Days::new(1))?;

    [today, tomorrow]
        .into_iter()
        .flat_map(|day| times.iter().map(move |t| day.and_time(*t).and_utc()))
        .filter(|candidate| *candidate > now)
        .min()
}

/// Fires a job at fixed times of day, forever.
pub struct DailyScheduler {
    times: Vec<NaiveTime>,
}

impl DailyScheduler {
    pub fn new(times: Vec<NaiveTime>) -> Self {
        Self { times }
    }

    pub fn next_run(&self) -> Option<DateTime<Utc>> {
        next_run_after(Utc::now(), &self.times)
    }

    pub fn run_forever<F>(&self, mut job: F)
    where
        F: FnMut(),
    {
        loop {
            let Some(next) = self.next_run() else {
                tracing::error!("Schedule has no times, stopping");
                return;
            };

            tracing::info!(next_run = %next.format("%Y-%m-%d %H:%M UTC"), "Waiting for next scheduled run");

            while Utc::now() < next {
                let remaining = (next - Utc::now()).to_std().unwrap_or_default();
                std::thread::sleep(remaining.min(POLL_INTERVAL));
            }

            job();
        }
    }
}
