//! Resume negotiation
//!
//! Pure decisions: whether pressing play should start immediately or ask
//! the user, and what each answer to the prompt means.

use serde::{Deserialize, Serialize};

use crate::models::WatchProgressRecord;

/// Outcome of looking up saved progress for a title
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum ResumeDecision {
    PlayFromStart,
    PromptResume { position_secs: f64 },
}

/// Answer to the resume prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResumeChoice {
    Resume,
    StartOver,
    Cancel,
}

impl ResumeChoice {
    pub const ALL: [ResumeChoice; 3] = [
        ResumeChoice::Resume,
        ResumeChoice::StartOver,
        ResumeChoice::Cancel,
    ];

    /// Stable focus key of the prompt button
    pub fn key(&self) -> &'static str {
        match self {
            ResumeChoice::Resume => "resume-continue",
            ResumeChoice::StartOver => "resume-start-over",
            ResumeChoice::Cancel => "resume-cancel",
        }
    }
}

/// What the play flow should do after the prompt
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ResumeAction {
    Play { start_offset: f64 },
    /// Close the prompt and give focus back to the play control
    ReturnFocus,
}

/// Decide how to start playback given the stored record, if any
pub fn negotiate(record: Option<&WatchProgressRecord>) -> ResumeDecision {
    match record {
        Some(r) if r.last_position_secs > 0.0 => ResumeDecision::PromptResume {
            position_secs: r.last_position_secs,
        },
        _ => ResumeDecision::PlayFromStart,
    }
}

/// Map a prompt answer to the follow-up action
pub fn resolve(choice: ResumeChoice, position_secs: f64) -> ResumeAction {
    match choice {
        ResumeChoice::Resume => ResumeAction::Play {
            start_offset: position_secs,
        },
        ResumeChoice::StartOver => ResumeAction::Play { start_offset: 0.0 },
        ResumeChoice::Cancel => ResumeAction::ReturnFocus,
    }
}

/// Format seconds as `h:mm:ss`, or `m:ss` under an hour
pub fn format_position(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds as u64
    } else {
        0
    };
    let (h, m, s) = (total / 3600, (total % 3600) / 60, total % 60);
    if h > 0 {
        format!("{}:{:02}:{:02}", h, m, s)
    } else {
        format!("{}:{:02}", m, s)
    }
}

/// Label of the resume button
pub fn resume_label(position_secs: f64) -> String {
    format!("Resume from {}", format_position(position_secs))
}
