//! # Source-Language Guessing
//!
//! Predicts the programming language of a file from its content alone. The
//! guess is independent of the file extension and of the corpus's known
//! language, so a mismatch is a useful filtering signal.

use crate::constants::UNKNOWN_LANGUAGE;
use crate::errors::ClassifyError;
use regex::Regex;

/// Predicts the programming language of a text.
pub trait SourceLanguageGuesser: Send + Sync {
    /// Returns the best-guess language name, or `Unknown` when nothing matches.
    fn guess(&self, text: &str) -> Result<String, ClassifyError>;
}

/// Weighted content patterns per language. The text is space-joined, so the
/// patterns never rely on line anchors.
const PROFILES: &[(&str, &[(&str, f64)])] = &[
    (
        "Python",
        &[
            (r"\bdef \w+\s*\(", 3.0),
            (r"\bfrom [\w.]+ import\b", 3.0),
            (r"\bimport \w+", 1.0),
            (r"\bself\.", 2.0),
            (r"\belif\b", 3.0),
            (r"\bNone\b", 2.0),
            (r"\b(?:True|False)\b", 1.0),
            (r"__\w+__", 2.0),
            (r"\bprint\(", 1.0),
            (r"\blambda\b", 1.0),
        ],
    ),
    (
        "JavaScript",
        &[
            (r"\bfunction\s*\w*\s*\(", 2.0),
            (r"\bconst \w+\s*=", 2.0),
            (r"\blet \w+\s*=", 1.0),
            (r"=>", 1.0),
            (r"\bconsole\.log\(", 3.0),
            (r"\brequire\(", 3.0),
            (r"===", 2.0),
            (r"\bundefined\b", 2.0),
            (r"\bdocument\.", 2.0),
        ],
    ),
    (
        "TypeScript",
        &[
            (r"\binterface \w+\s*\{", 2.0),
            (r":\s*(?:string|number|boolean)\b", 3.0),
            (r"\bexport (?:type|interface)\b", 3.0),
        ],
    ),
    (
        "Java",
        &[
            (r"\bpublic (?:static )?(?:class|void|final)\b", 3.0),
            (r"System\.out\.println", 4.0),
            (r"\bprivate \w+ \w+;", 2.0),
            (r"@Override", 3.0),
            (r"\bimport java\.", 5.0),
        ],
    ),
    (
        "C",
        &[
            (r"#include\s*<\w+\.h>", 4.0),
            (r"\bprintf\(", 2.0),
            (r"\bmalloc\(", 2.0),
            (r"\bint main\s*\(", 2.0),
            (r"\bstruct \w+\s*\{", 2.0),
        ],
    ),
    (
        "C++",
        &[
            (r"#include\s*<\w+>", 3.0),
            (r"\bstd::", 4.0),
            (r"\bcout\b", 3.0),
            (r"\btemplate\s*<", 3.0),
            (r"\bnamespace \w+", 2.0),
        ],
    ),
    (
        "C#",
        &[
            (r"\busing System\b", 5.0),
            (r"Console\.WriteLine", 4.0),
            (r"\{\s*get;", 4.0),
        ],
    ),
    (
        "Go",
        &[
            (r"\bpackage \w+", 2.0),
            (r"\bfunc \w*\s*\(", 3.0),
            (r":=", 2.0),
            (r"\bfmt\.\w+", 4.0),
        ],
    ),
    (
        "Rust",
        &[
            (r"\bfn \w+\s*[<(]", 3.0),
            (r"\blet mut\b", 4.0),
            (r"\bimpl\b", 2.0),
            (r"::", 1.0),
            (r"\bprintln!", 4.0),
            (r"&str\b", 3.0),
            (r"\bpub fn\b", 3.0),
            (r"\buse \w+::", 3.0),
        ],
    ),
    (
        "Ruby",
        &[
            (r"\bend\b", 2.0),
            (r"\bputs\b", 3.0),
            (r#"\brequire ['"]"#, 3.0),
            (r"\bdo \|", 3.0),
            (r"\battr_accessor\b", 4.0),
        ],
    ),
    (
        "PHP",
        &[
            (r"<\?php", 6.0),
            (r"\$\w+\s*=", 2.0),
            (r"\bfunction \w+\(\$", 3.0),
        ],
    ),
    (
        "Shell",
        &[
            (r"^#!/bin/(?:ba)?sh", 5.0),
            (r"\bfi\b", 3.0),
            (r"\$\{\w+\}", 2.0),
            (r"\bdone\b", 2.0),
            (r"\besac\b", 4.0),
        ],
    ),
    (
        "SQL",
        &[
            (r"(?i)\bselect\b.+?\bfrom\b", 3.0),
            (r"(?i)\binsert into\b", 4.0),
            (r"(?i)\bcreate table\b", 4.0),
        ],
    ),
    (
        "HTML",
        &[
            (r"(?i)<!DOCTYPE", 5.0),
            (r"<html", 5.0),
            (r"<body", 3.0),
            (r"</div>", 3.0),
        ],
    ),
];

struct LanguageProfile {
    name: &'static str,
    rules: Vec<(Regex, f64)>,
}

/// A [`SourceLanguageGuesser`] that scores weighted keyword patterns per language.
pub struct KeywordLanguageGuesser {
    profiles: Vec<LanguageProfile>,
}

impl KeywordLanguageGuesser {
    pub fn new() -> Result<Self, ClassifyError> {
        let profiles = PROFILES
            .iter()
            .map(|&(name, rules)| {
                let rules = rules
                    .iter()
                    .map(|(pattern, weight)| Ok((Regex::new(pattern)?, *weight)))
                    .collect::<Result<Vec<_>, ClassifyError>>()?;
                Ok(LanguageProfile { name, rules })
            })
            .collect::<Result<Vec<_>, ClassifyError>>()?;
        Ok(Self { profiles })
    }

    /// Per-language scores, in profile order.
    pub fn scores(&self, text: &str) -> Vec<(&'static str, f64)> {
        self.profiles
            .iter()
            .map(|profile| {
                let score = profile
                    .rules
                    .iter()
                    .map(|(re, weight)| re.find_iter(text).count() as f64 * weight)
                    .sum();
                (profile.name, score)
            })
            .collect()
    }
}

impl SourceLanguageGuesser for KeywordLanguageGuesser {
    fn guess(&self, text: &str) -> Result<String, ClassifyError> {
        // Ties go to the earlier profile.
        let best = self
            .scores(text)
            .into_iter()
            .fold(None::<(&str, f64)>, |best, (name, score)| match best {
                Some((_, top)) if top >= score => best,
                _ if score > 0.0 => Some((name, score)),
                _ => best,
            });
        Ok(best
            .map(|(name, _)| name)
            .unwrap_or(UNKNOWN_LANGUAGE)
            .to_string())
    }
}
