use std::collections::HashMap;
use std::sync::LazyLock;

/// Classification state of a term.
///
/// `None` marks an unclassified (or under-review) term; it is not a terminal
/// choice. Every other variant carries the display name persisted in the
/// label field and the single key that selects it during triage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Label {
    None,
    Keyword,
    Noise,
    Relevant,
    NotRelevant,
    Postponed,
}

/// Terminal labels, in the order the per-label panels are stacked.
pub const TERMINAL_LABELS: [Label; 5] = [
    Label::Keyword,
    Label::Relevant,
    Label::Noise,
    Label::NotRelevant,
    Label::Postponed,
];

static BY_NAME: LazyLock<HashMap<&'static str, Label>> = LazyLock::new(|| {
    let mut map = HashMap::new();
    for label in TERMINAL_LABELS {
        if map.insert(label.name(), label).is_some() {
            panic!("duplicate label name: {}", label.name());
        }
    }
    map
});

static BY_KEY: LazyLock<HashMap<char, Label>> = LazyLock::new(|| {
    let mut map = HashMap::new();
    for label in TERMINAL_LABELS {
        let key = label.key().unwrap();
        if map.insert(key, label).is_some() {
            panic!("duplicate label key: {key}");
        }
    }
    map
});

impl Label {
    /// Display name, as persisted in the label field. Empty for `None`.
    pub fn name(self) -> &'static str {
        match self {
            Label::None => "",
            Label::Keyword => "keyword",
            Label::Noise => "noise",
            Label::Relevant => "relevant",
            Label::NotRelevant => "not-relevant",
            Label::Postponed => "postponed",
        }
    }

    /// Input key that selects this label. `None` has no key.
    pub fn key(self) -> Option<char> {
        match self {
            Label::None => None,
            Label::Keyword => Some('k'),
            Label::Noise => Some('n'),
            Label::Relevant => Some('r'),
            Label::NotRelevant => Some('x'),
            Label::Postponed => Some('p'),
        }
    }

    /// Capitalized name for panel titles ("Not-relevant").
    pub fn title(self) -> String {
        let name = self.name();
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    pub fn from_name(name: &str) -> Option<Label> {
        if name.is_empty() {
            return Some(Label::None);
        }
        BY_NAME.get(name).copied()
    }

    pub fn from_key(key: char) -> Option<Label> {
        BY_KEY.get(&key).copied()
    }

    /// Resolve a persisted label field: by name, falling back to the
    /// single-character key for data written by older versions.
    pub fn from_record_field(field: &str) -> Option<Label> {
        Label::from_name(field).or_else(|| {
            let mut chars = field.chars();
            match (chars.next(), chars.next()) {
                (Some(key), None) => Label::from_key(key),
                _ => None,
            }
        })
    }
}
