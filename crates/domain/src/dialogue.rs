use crate::date::{parse_day_month_time, parse_time_after};
use crate::event::NewEvent;
use chrono_tz::Tz;
use thiserror::Error;

/// The field an `EventDraft` is currently waiting for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftStep {
    Title,
    StartTime,
    Address,
    Description,
}

impl DraftStep {
    pub fn prompt(&self) -> &'static str {
        match self {
            Self::Title => "🎯 New event\n\nEnter the title:",
            Self::StartTime => {
                "Enter the date and time (format DD.MM HH:MM, optionally followed by -HH:MM for the end):"
            }
            Self::Address => "Enter the address:",
            Self::Description => "Enter the description:",
        }
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum DraftInputError {
    #[error("The answer can not be empty. Please try again:")]
    Empty,
    #[error("Invalid date. Use the format DD.MM HH:MM (for example 15.12 18:00):")]
    InvalidDateTime,
}

#[derive(Debug, PartialEq)]
pub enum DraftProgress {
    /// The draft moved on and waits for the next field
    Continue(DraftStep),
    /// Every field has been collected
    Complete(NewEvent),
}

/// The event creation dialogue of one organizer.
///
/// Every answer moves the draft to the next `DraftStep`. An invalid answer
/// leaves the draft where it was so that the organizer can try again.
#[derive(Debug, Clone, PartialEq)]
pub struct EventDraft {
    pub user_id: i64,
    step: DraftStep,
    title: Option<String>,
    start_ts: Option<i64>,
    end_ts: Option<i64>,
    address: Option<String>,
}

impl EventDraft {
    pub fn new(user_id: i64) -> Self {
        Self {
            user_id,
            step: DraftStep::Title,
            title: None,
            start_ts: None,
            end_ts: None,
            address: None,
        }
    }

    pub fn step(&self) -> DraftStep {
        self.step
    }

    pub fn advance(
        &mut self,
        input: &str,
        now: i64,
        tz: &Tz,
    ) -> Result<DraftProgress, DraftInputError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(DraftInputError::Empty);
        }

        match self.step {
            DraftStep::Title => {
                self.title = Some(input.to_string());
                self.step = DraftStep::StartTime;
            }
            DraftStep::StartTime => {
                let (start_ts, end_ts) = parse_start_and_end(input, now, tz)?;
                self.start_ts = Some(start_ts);
                self.end_ts = end_ts;
                self.step = DraftStep::Address;
            }
            DraftStep::Address => {
                self.address = Some(input.to_string());
                self.step = DraftStep::Description;
            }
            DraftStep::Description => {
                return Ok(DraftProgress::Complete(NewEvent {
                    title: self.title.clone().unwrap_or_default(),
                    start_ts: self.start_ts.unwrap_or_default(),
                    end_ts: self.end_ts,
                    address: self.address.clone().unwrap_or_default(),
                    description: input.to_string(),
                }));
            }
        }

        Ok(DraftProgress::Continue(self.step))
    }
}

fn parse_start_and_end(
    input: &str,
    now: i64,
    tz: &Tz,
) -> Result<(i64, Option<i64>), DraftInputError> {
    let (start, end) = match input.split_once('-') {
        Some((start, end)) => (start, Some(end)),
        None => (input, None),
    };
    let start_ts =
        parse_day_month_time(start, now, tz).ok_or(DraftInputError::InvalidDateTime)?;
    let end_ts = match end {
        Some(end) => {
            Some(parse_time_after(end, start_ts, tz).ok_or(DraftInputError::InvalidDateTime)?)
        }
        None => None,
    };
    Ok((start_ts, end_ts))
}
