//! Renderable values handed to the presentation layer.

use crate::error::Result;
use crate::protocol::{Phase, ResultsPayload, RoundId, RoundSnapshot};

/// Shown in place of the prompt when the server sends none.
pub const PROMPT_PLACEHOLDER: &str = "—";

/// The single action region that is visible for a phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Answer,
    Guess,
    Results,
    /// No action region: any phase the client does not act on.
    None,
}

impl From<&Phase> for Region {
    fn from(phase: &Phase) -> Self {
        match phase {
            Phase::Answer => Self::Answer,
            Phase::Guess => Self::Guess,
            Phase::Results => Self::Results,
            Phase::Other(_) => Self::None,
        }
    }
}

/// Everything the UI needs to render the current round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundView {
    pub phase: Phase,
    pub region: Region,
    pub round_id: Option<RoundId>,
    pub round_total: Option<RoundId>,
    pub prompt: String,
}

impl RoundView {
    /// `"Phase: GUESS  Round 2/5"`. An unknown round number shows as `?`.
    pub fn headline(&self) -> String {
        format!(
            "Phase: {}  Round {}/{}",
            self.phase,
            round_label(self.round_id),
            round_label(self.round_total)
        )
    }
}

fn round_label(n: Option<RoundId>) -> String {
    n.map_or_else(|| "?".to_owned(), |n| n.to_string())
}

impl From<&RoundSnapshot> for RoundView {
    fn from(snapshot: &RoundSnapshot) -> Self {
        Self {
            phase: snapshot.phase.clone(),
            region: Region::from(&snapshot.phase),
            round_id: snapshot.round_id,
            round_total: snapshot.round_total,
            prompt: snapshot
                .prompt
                .as_deref()
                .filter(|p| !p.is_empty())
                .unwrap_or(PROMPT_PLACEHOLDER)
                .to_owned(),
        }
    }
}

/// A one-line status message, plain or flagged as an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub text: String,
    pub is_error: bool,
}

impl StatusLine {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

/// Text for the results area: the pretty-printed payload, or the error
/// message in its place.
pub fn results_text(result: &Result<ResultsPayload>) -> String {
    match result {
        Ok(payload) => payload.to_pretty_string(),
        Err(e) => e.status_message(),
    }
}
