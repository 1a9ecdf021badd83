use serde::{Deserialize, Serialize};

/// Tri-state presence filter driven by `cv:`, `li:` and `web:` tokens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraitFlag {
    #[default]
    Unset,
    Yes,
    No,
}

impl TraitFlag {
    /// Whether a field with the given presence satisfies this flag.
    pub fn admits(self, present: bool) -> bool {
        match self {
            TraitFlag::Unset => true,
            TraitFlag::Yes => present,
            TraitFlag::No => !present,
        }
    }

    fn from_answer(value: &str) -> Option<Self> {
        match value {
            "yes" => Some(TraitFlag::Yes),
            "no" => Some(TraitFlag::No),
            _ => None,
        }
    }
}

/// Applicant attribute addressed by a trait token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraitKind {
    Cv,
    LinkedIn,
    Website,
}

impl TraitKind {
    fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "cv" => Some(TraitKind::Cv),
            "li" => Some(TraitKind::LinkedIn),
            "web" => Some(TraitKind::Website),
            _ => None,
        }
    }
}

/// Classification of a single whitespace-delimited search token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchToken<'a> {
    Trait(TraitKind, TraitFlag),
    /// Experience bounds in years; `None` leaves the corresponding bound untouched.
    Range { min: Option<u32>, max: Option<u32> },
    FreeText(&'a str),
}

/// Structured view of the search box.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub free_text: String,
    pub has_cv: TraitFlag,
    pub has_linkedin: TraitFlag,
    pub has_website: TraitFlag,
    pub exp_min: Option<u32>,
    pub exp_max: Option<u32>,
}

impl SearchQuery {
    pub fn is_empty(&self) -> bool {
        self.free_text.trim().is_empty()
            && self.has_cv == TraitFlag::Unset
            && self.has_linkedin == TraitFlag::Unset
            && self.has_website == TraitFlag::Unset
            && self.exp_min.is_none()
            && self.exp_max.is_none()
    }

    fn apply(&mut self, token: SearchToken<'_>, free_text: &mut Vec<String>) {
        match token {
            SearchToken::Trait(TraitKind::Cv, flag) => self.has_cv = flag,
            SearchToken::Trait(TraitKind::LinkedIn, flag) => self.has_linkedin = flag,
            SearchToken::Trait(TraitKind::Website, flag) => self.has_website = flag,
            SearchToken::Range { min, max } => {
                if let Some(min) = min {
                    self.exp_min = Some(min);
                }
                if let Some(max) = max {
                    self.exp_max = Some(max);
                }
            }
            SearchToken::FreeText(text) => free_text.push(text.to_string()),
        }
    }
}

/// Parse the raw search box into trait tokens, experience bounds and free text.
///
/// Tokens are processed left to right and recognised tokens assign directly,
/// so a repeated token overrides the earlier one. Unrecognised tokens are kept
/// verbatim, in order, as free text.
pub fn parse_search(raw: &str) -> SearchQuery {
    let mut query = SearchQuery::default();
    let mut free_text = Vec::new();

    for token in raw.split_whitespace() {
        query.apply(classify_token(token), &mut free_text);
    }

    query.free_text = free_text.join(" ");
    query
}

/// Classify one token. Matching is case-insensitive; the original text is
/// returned untouched when nothing matches.
pub fn classify_token(token: &str) -> SearchToken<'_> {
    let lowered = token.to_lowercase();

    if let Some((prefix, answer)) = lowered.split_once(':') {
        if let (Some(kind), Some(flag)) =
            (TraitKind::from_prefix(prefix), TraitFlag::from_answer(answer))
        {
            return SearchToken::Trait(kind, flag);
        }
    }

    if let Some(value) = lowered.strip_prefix("exp:") {
        if let Some((low, high)) = value.split_once('-') {
            if let (Some(min), Some(max)) = (parse_years(low), parse_years(high)) {
                return SearchToken::Range {
                    min: Some(min),
                    max: Some(max),
                };
            }
        } else if let Some(min) = parse_years(value) {
            return SearchToken::Range {
                min: Some(min),
                max: None,
            };
        }
    }

    if let Some(min) = lowered.strip_prefix("exp>=").and_then(parse_years) {
        return SearchToken::Range {
            min: Some(min),
            max: None,
        };
    }

    if let Some(max) = lowered.strip_prefix("exp<=").and_then(parse_years) {
        return SearchToken::Range {
            min: None,
            max: Some(max),
        };
    }

    SearchToken::FreeText(token)
}

// ASCII digits only; values that overflow u32 are not treated as bounds.
fn parse_years(value: &str) -> Option<u32> {
    if value.is_empty() || !value.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}
