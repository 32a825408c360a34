//! Tone selection: the four tones a user can pick and the phrasing guidance each implies.
//!
//! The guidance is fed to the Tone Stylist stage so the style guide it writes is
//! anchored to concrete do/avoid phrasing instead of a bare adjective.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Formal,
    Enthusiastic,
    Conversational,
    Professional,
}

pub const ALL_TONES: [Tone; 4] = [
    Tone::Formal,
    Tone::Enthusiastic,
    Tone::Conversational,
    Tone::Professional,
];

#[derive(Debug, Error)]
#[error("unknown tone '{0}' (expected one of: formal, enthusiastic, conversational, professional)")]
pub struct UnknownTone(pub String);

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Formal => "formal",
            Tone::Enthusiastic => "enthusiastic",
            Tone::Conversational => "conversational",
            Tone::Professional => "professional",
        }
    }
}

impl FromStr for Tone {
    type Err = UnknownTone;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ALL_TONES
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownTone(wanted.to_string()))
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Phrasing calibrated to one tone.
#[derive(Debug, Clone)]
pub struct ToneGuide {
    pub register: &'static str,
    pub preferred_phrases: Vec<&'static str>,
    pub avoid_phrases: Vec<&'static str>,
}

impl ToneGuide {
    /// Bullet-list rendering used inside the tone styling prompt.
    pub fn render(&self) -> String {
        format!(
            "Register: {}\nPreferred phrasing: {}\nAvoid: {}",
            self.register,
            self.preferred_phrases.join("; "),
            self.avoid_phrases.join("; ")
        )
    }
}

pub fn get_tone_guide(tone: Tone) -> ToneGuide {
    match tone {
        Tone::Formal => ToneGuide {
            register: "reserved and respectful; complete sentences, no contractions",
            preferred_phrases: vec![
                "I am writing to express my interest in",
                "I would welcome the opportunity to",
                "My experience in",
                "I am confident that",
            ],
            avoid_phrases: vec!["super excited", "awesome", "I'd love to", "exclamation marks"],
        },
        Tone::Enthusiastic => ToneGuide {
            register: "energetic and warm; show genuine excitement backed by specifics",
            preferred_phrases: vec![
                "I was thrilled to see",
                "I can't wait to bring",
                "What excites me most about",
                "I'm eager to",
            ],
            avoid_phrases: vec![
                "to whom it may concern",
                "please find enclosed",
                "more than one exclamation mark per paragraph",
            ],
        },
        Tone::Conversational => ToneGuide {
            register: "friendly and direct; contractions are fine, short sentences",
            preferred_phrases: vec![
                "I'd love to",
                "Here's why I think",
                "What drew me to",
                "I've spent the last",
            ],
            avoid_phrases: vec!["hereby", "pursuant to", "esteemed organization", "slang"],
        },
        Tone::Professional => ToneGuide {
            register: "confident and concise; results first, polished but not stiff",
            preferred_phrases: vec![
                "I bring",
                "I delivered",
                "I look forward to discussing",
                "In my role at",
            ],
            avoid_phrases: vec!["passionate rockstar", "ninja", "hereby", "filler adjectives"],
        },
    }
}
