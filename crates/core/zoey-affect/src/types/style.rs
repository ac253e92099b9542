//! Coping styles and tones
//!
//! The two tokens the regulator hands to prompt assembly every turn.

use crate::error::{AffectError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Behavioral mode chosen for response generation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CopingStyle {
    /// Soothe and validate (baseline)
    #[default]
    EmotionFocused,
    /// Steer towards concrete action
    ProblemFocused,
    /// Divert away from the stressor
    Avoidance,
    /// Guarded, escalated stance
    Resentful,
}

impl CopingStyle {
    /// All coping styles
    pub const ALL: [CopingStyle; 4] = [
        CopingStyle::EmotionFocused,
        CopingStyle::ProblemFocused,
        CopingStyle::Avoidance,
        CopingStyle::Resentful,
    ];

    /// Stable token for this style
    pub fn as_str(&self) -> &'static str {
        match self {
            CopingStyle::EmotionFocused => "emotion_focused",
            CopingStyle::ProblemFocused => "problem_focused",
            CopingStyle::Avoidance => "avoidance",
            CopingStyle::Resentful => "resentful",
        }
    }

    /// Behavioral traits rendered into the style prompt
    pub fn traits(&self) -> &'static [&'static str] {
        match self {
            CopingStyle::EmotionFocused => &["soothing", "validating", "reassuring"],
            CopingStyle::ProblemFocused => &["actionable", "directive", "solution-oriented"],
            CopingStyle::Avoidance => &["diverting", "distracting"],
            CopingStyle::Resentful => &["guarded", "curt", "boundary-setting"],
        }
    }
}

impl fmt::Display for CopingStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for CopingStyle {
    type Err = AffectError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "emotion_focused" => Ok(CopingStyle::EmotionFocused),
            "problem_focused" => Ok(CopingStyle::ProblemFocused),
            "avoidance" => Ok(CopingStyle::Avoidance),
            "resentful" | "escalated" => Ok(CopingStyle::Resentful),
            _ => Err(AffectError::unknown_name(
                "coping style",
                s,
                "emotion_focused, problem_focused, avoidance, resentful",
            )),
        }
    }
}

/// Prompt tone, chosen from the burst tier of the turn
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    /// Calm and empathetic
    #[default]
    Calm,
    /// Slightly assertive
    Assertive,
    /// Firm and urgent
    Firm,
    /// Direct and commanding
    Commanding,
}

impl Tone {
    /// All tones
    pub const ALL: [Tone; 4] = [Tone::Calm, Tone::Assertive, Tone::Firm, Tone::Commanding];

    /// Stable token for this tone
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Calm => "calm",
            Tone::Assertive => "assertive",
            Tone::Firm => "firm",
            Tone::Commanding => "commanding",
        }
    }

    /// Description used inside the style prompt
    pub fn description(&self) -> &'static str {
        match self {
            Tone::Calm => "Calm and empathetic",
            Tone::Assertive => "Slightly assertive, but still polite",
            Tone::Firm => "Firm and urgent, prioritising user safety",
            Tone::Commanding => "Direct and commanding, immediate action required",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Tone {
    type Err = AffectError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "calm" => Ok(Tone::Calm),
            "assertive" => Ok(Tone::Assertive),
            "firm" => Ok(Tone::Firm),
            "commanding" => Ok(Tone::Commanding),
            _ => Err(AffectError::unknown_name(
                "tone",
                s,
                "calm, assertive, firm, commanding",
            )),
        }
    }
}
