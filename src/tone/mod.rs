//! Tone catalog and per-tone lexical transformation
//!
//! Every tone is a static profile with a greeting, a closing and a short
//! style descriptor. Lookups never fail: unknown names resolve to the
//! professional profile.

mod keywords;
mod transform;

pub use keywords::KeywordSet;
pub use transform::apply_tone;

use serde::Serialize;

/// Name of the tone used when a request names none or an unknown one.
pub const DEFAULT_TONE: &str = "professional";

/// A named style profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ToneProfile {
    pub name: &'static str,
    pub greeting: &'static str,
    pub closing: &'static str,
    pub style: &'static str,
}

static TONES: [ToneProfile; 8] = [
    ToneProfile {
        name: "formal",
        greeting: "Dear Sir or Madam,",
        closing: "Respectfully yours,",
        style: "formal and respectful",
    },
    ToneProfile {
        name: "professional",
        greeting: "Hello,",
        closing: "Best regards,",
        style: "clear and professional",
    },
    ToneProfile {
        name: "casual",
        greeting: "Hey,",
        closing: "Cheers,",
        style: "relaxed and conversational",
    },
    ToneProfile {
        name: "friendly",
        greeting: "Hi there,",
        closing: "Warm wishes,",
        style: "warm and approachable",
    },
    ToneProfile {
        name: "persuasive",
        greeting: "Hello,",
        closing: "Looking forward to your response,",
        style: "confident and compelling",
    },
    ToneProfile {
        name: "empathetic",
        greeting: "Dear friend,",
        closing: "With warm regards,",
        style: "compassionate and understanding",
    },
    ToneProfile {
        name: "concise",
        greeting: "Hi,",
        closing: "Thanks,",
        style: "brief and direct",
    },
    ToneProfile {
        name: "apologetic",
        greeting: "Hello,",
        closing: "With sincere apologies,",
        style: "sincere and apologetic",
    },
];

/// Index of the professional profile in `TONES`.
const DEFAULT_INDEX: usize = 1;

/// Resolve a tone name to its profile (case-insensitive).
/// Falls back to the professional profile for unknown names.
pub fn resolve(name: &str) -> &'static ToneProfile {
    let name = name.trim();
    TONES
        .iter()
        .find(|tone| tone.name.eq_ignore_ascii_case(name))
        .unwrap_or(&TONES[DEFAULT_INDEX])
}

/// All known tones, in catalog order.
pub fn all() -> &'static [ToneProfile] {
    &TONES
}

impl ToneProfile {
    /// Tone name with its first letter upper-cased, as used in prompts.
    pub fn display_name(&self) -> String {
        let mut chars = self.name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// Trailing annotation appended to locally composed emails.
    pub fn annotation(&self) -> String {
        format!("[Tone: {} | Style: {}]", self.name, self.style)
    }
}
