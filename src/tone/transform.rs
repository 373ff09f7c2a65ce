//! Per-tone lexical substitution applied to a single line of text.
//!
//! Rules within a tone run in a fixed order and each one replaces every
//! occurrence of a literal, case-sensitive pattern. Later rules see the
//! output of earlier ones, so the order is part of the observable output.

use std::sync::OnceLock;

use super::keywords::KeywordSet;
use super::resolve;

const FORMAL_RULES: &[(&str, &str)] = &[
    ("I'm", "I am"),
    ("I've", "I have"),
    ("I'll", "I will"),
    ("I'd", "I would"),
    ("don't", "do not"),
    ("can't", "cannot"),
    ("won't", "will not"),
    ("isn't", "is not"),
    ("aren't", "are not"),
    ("doesn't", "does not"),
    ("didn't", "did not"),
    ("it's", "it is"),
    ("that's", "that is"),
    ("let's", "let us"),
    ("Thanks", "Thank you"),
    ("thanks", "thank you"),
    ("ASAP", "as soon as possible"),
    ("asap", "as soon as possible"),
    ("gonna", "going to"),
    ("wanna", "want to"),
    ("yeah", "yes"),
];

const CASUAL_RULES: &[(&str, &str)] = &[
    ("I would like to", "I'd like to"),
    ("I am", "I'm"),
    ("do not", "don't"),
    ("cannot", "can't"),
    ("will not", "won't"),
    ("Thank you", "Thanks"),
    ("thank you", "thanks"),
    ("at your earliest convenience", "when you can"),
    ("in order to", "to"),
    ("Regarding", "About"),
    ("regarding", "about"),
    ("Furthermore", "Also"),
    ("However", "But"),
];

const FRIENDLY_RULES: &[(&str, &str)] = &[
    ("Hello", "Hi"),
    ("Thank you", "Thanks so much"),
    ("thank you", "thanks so much"),
    ("Regards", "Cheers"),
];

const APOLOGETIC_RULES: &[(&str, &str)] = &[
    ("Unfortunately", "Regrettably"),
    ("unfortunately", "regrettably"),
    ("problem", "inconvenience"),
];

const CONCISE_RULES: &[(&str, &str)] = &[
    (" very ", " "),
    (" really ", " "),
    (" just ", " "),
    (" actually ", " "),
    (" basically ", " "),
];

const PERSUASIVE_MARKERS: &[&str] = &[
    "believe",
    "confident",
    "recommend",
    "should",
    "must",
    "certain",
];

const EMPATHY_MARKERS: &[&str] = &["understand", "appreciate", "feel", "sorry", "hope"];

static PERSUASIVE: OnceLock<KeywordSet> = OnceLock::new();
static EMPATHETIC: OnceLock<KeywordSet> = OnceLock::new();

fn replace_all(line: &str, rules: &[(&str, &str)]) -> String {
    rules
        .iter()
        .fold(line.to_string(), |text, (from, to)| text.replace(from, to))
}

/// Apply the lexical rules of `tone` to one line of text.
/// Unknown tones resolve to professional, which leaves the line unchanged.
pub fn apply_tone(line: &str, tone: &str) -> String {
    match resolve(tone).name {
        "formal" => replace_all(line, FORMAL_RULES),
        "casual" => replace_all(line, CASUAL_RULES),
        "friendly" => replace_all(line, FRIENDLY_RULES),
        "apologetic" => replace_all(line, APOLOGETIC_RULES),
        "concise" => replace_all(line, CONCISE_RULES),
        "persuasive" => {
            let markers = PERSUASIVE.get_or_init(|| KeywordSet::new(PERSUASIVE_MARKERS));
            if markers.is_match(line) {
                line.to_string()
            } else {
                format!("I believe {}", line)
            }
        }
        "empathetic" => {
            let markers = EMPATHETIC.get_or_init(|| KeywordSet::new(EMPATHY_MARKERS));
            if markers.is_match(line) {
                line.to_string()
            } else {
                format!("I understand that {}", line.to_lowercase())
            }
        }
        _ => line.to_string(),
    }
}
