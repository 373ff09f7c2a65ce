//! Local rule-based email composition
//!
//! Used whenever the chat-completion API is not configured or fails. Two
//! entry points mirror the two modes: building an email from a description
//! (write) and polishing an existing body line by line (rewrite).
//!
//! Composing an already composed email again is not idempotent: the greeting
//! check passes, but a second closing and annotation are appended.

use std::sync::OnceLock;

use crate::tone::{KeywordSet, ToneProfile, apply_tone};

/// Substrings that mark a line as already containing a greeting.
const GREETING_TOKENS: &[&str] = &["hi", "hello", "dear", "hey"];

/// Which kind of email a description asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    Meeting,
    Thanks,
    FollowUp,
    Apology,
    Generic,
}

/// Paragraphs surrounding the `Regarding:` line of a generated email
#[derive(Debug)]
pub struct Template {
    pub kind: TemplateKind,
    /// Case-insensitive substrings that select this template; empty matches anything
    keywords: &'static [&'static str],
    opening: &'static str,
    closing: &'static str,
}

/// Templates in priority order. The first whose keywords occur in the
/// description wins; the generic template is last and always matches.
static TEMPLATES: [Template; 5] = [
    Template {
        kind: TemplateKind::Meeting,
        keywords: &["meeting", "schedule"],
        opening: "I am writing to request a meeting to discuss the following.",
        closing: "Please let me know a time that works best for you, and I will arrange the details accordingly.",
    },
    Template {
        kind: TemplateKind::Thanks,
        keywords: &["thank", "appreciate"],
        opening: "I wanted to take a moment to express my sincere appreciation.",
        closing: "Your support has made a real difference, and it is truly valued.",
    },
    Template {
        kind: TemplateKind::FollowUp,
        keywords: &["follow", "update"],
        opening: "I am following up on our previous conversation with an update.",
        closing: "Please let me know if you need any additional information from my side.",
    },
    Template {
        kind: TemplateKind::Apology,
        keywords: &["sorry", "apolog"],
        opening: "I would like to sincerely apologize for any inconvenience this may have caused.",
        closing: "I am taking steps to make sure this does not happen again, and I appreciate your patience.",
    },
    Template {
        kind: TemplateKind::Generic,
        keywords: &[],
        opening: "I hope this message finds you well. I am reaching out about the following.",
        closing: "Please let me know if you have any questions or need further details.",
    },
];

static CLASSIFIERS: OnceLock<Vec<(Option<KeywordSet>, &'static Template)>> = OnceLock::new();

fn classifiers() -> &'static [(Option<KeywordSet>, &'static Template)] {
    CLASSIFIERS.get_or_init(|| {
        TEMPLATES
            .iter()
            .map(|template| {
                let predicate = if template.keywords.is_empty() {
                    None
                } else {
                    Some(KeywordSet::new(template.keywords))
                };
                (predicate, template)
            })
            .collect()
    })
}

/// Pick the template for a description.
pub fn classify(description: &str) -> &'static Template {
    classifiers()
        .iter()
        .find(|(predicate, _)| predicate.as_ref().is_none_or(|p| p.is_match(description)))
        .map(|(_, template)| *template)
        .unwrap_or(&TEMPLATES[TEMPLATES.len() - 1])
}

/// Compose a complete email from a free-form description.
pub fn compose_from_description(description: &str, tone: &ToneProfile) -> String {
    let description = description.trim();
    let template = classify(description);
    tracing::debug!("Description classified as {:?}", template.kind);

    [
        tone.greeting.to_string(),
        template.opening.to_string(),
        format!("Regarding: {}", description),
        template.closing.to_string(),
        tone.closing.to_string(),
        tone.annotation(),
    ]
    .join("\n\n")
}

/// Polish an existing email body line by line.
///
/// Blank lines, trailing ones included, are kept verbatim. A greeting is
/// prepended only when the first non-blank line contains no greeting token.
pub fn compose_from_existing(original: &str, tone: &ToneProfile) -> String {
    let mut lines: Vec<String> = Vec::new();

    let first_line = original.split('\n').find(|line| !line.trim().is_empty());
    if !first_line.is_some_and(has_greeting) {
        lines.push(tone.greeting.to_string());
        lines.push(String::new());
    }

    for line in original.split('\n') {
        if line.trim().is_empty() {
            lines.push(line.to_string());
        } else {
            lines.push(apply_tone(line, tone.name));
        }
    }

    lines.push(String::new());
    lines.push(tone.closing.to_string());
    lines.push(String::new());
    lines.push(tone.annotation());

    lines.join("\n")
}

static GREETINGS: OnceLock<KeywordSet> = OnceLock::new();

/// Whether a line contains a greeting token anywhere (case-insensitive).
fn has_greeting(line: &str) -> bool {
    GREETINGS
        .get_or_init(|| KeywordSet::new(GREETING_TOKENS))
        .is_match(line)
}
