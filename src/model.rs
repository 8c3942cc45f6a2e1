use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OrderingPolicy {
    #[default]
    ByLengthAscending,
    ByLengthDescending,
    LexicographicAscending,
    LexicographicDescending,
}

impl OrderingPolicy {
    pub const ALL: [OrderingPolicy; 4] = [
        OrderingPolicy::ByLengthAscending,
        OrderingPolicy::ByLengthDescending,
        OrderingPolicy::LexicographicAscending,
        OrderingPolicy::LexicographicDescending,
    ];

    /// Label shown on the action keys and in the status bar.
    pub fn label(self) -> &'static str {
        match self {
            OrderingPolicy::ByLengthAscending => "Min. length",
            OrderingPolicy::ByLengthDescending => "Max. length",
            OrderingPolicy::LexicographicAscending => "Ascending",
            OrderingPolicy::LexicographicDescending => "Descending",
        }
    }

    /// Key used on the command line (`--policy`).
    pub fn cli_name(self) -> &'static str {
        match self {
            OrderingPolicy::ByLengthAscending => "min-length",
            OrderingPolicy::ByLengthDescending => "max-length",
            OrderingPolicy::LexicographicAscending => "ascending",
            OrderingPolicy::LexicographicDescending => "descending",
        }
    }

    fn serde_key(self) -> &'static str {
        match self {
            OrderingPolicy::ByLengthAscending => "byLengthAscending",
            OrderingPolicy::ByLengthDescending => "byLengthDescending",
            OrderingPolicy::LexicographicAscending => "lexicographicAscending",
            OrderingPolicy::LexicographicDescending => "lexicographicDescending",
        }
    }

    /// Resolve a stored value: the enum key, the CLI name, or a display label.
    ///
    /// Only JSON records are read, but a record may carry the button text
    /// instead of the key, sometimes with the `&` mnemonic marker still in
    /// it ("M&in. length"), so that marker is ignored here.
    pub fn from_stored(value: &str) -> Option<Self> {
        let value = value.trim();
        let unmarked: String = value.chars().filter(|c| *c != '&').collect();
        Self::ALL.into_iter().find(|p| {
            p.serde_key() == value
                || p.cli_name().eq_ignore_ascii_case(value)
                || p.label().eq_ignore_ascii_case(&unmarked)
        })
    }
}

impl std::fmt::Display for OrderingPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// The four boolean switches exposed in the Options panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionFlag {
    AlwaysOnTop,
    ApplyLastOnOpen,
    RemoveBlankLines,
    TrimLines,
}

impl OptionFlag {
    pub const ALL: [OptionFlag; 4] = [
        OptionFlag::AlwaysOnTop,
        OptionFlag::ApplyLastOnOpen,
        OptionFlag::RemoveBlankLines,
        OptionFlag::TrimLines,
    ];

    pub fn label(self) -> &'static str {
        match self {
            OptionFlag::AlwaysOnTop => "Always on top",
            OptionFlag::ApplyLastOnOpen => "Apply last on open",
            OptionFlag::RemoveBlankLines => "Remove blank lines",
            OptionFlag::TrimLines => "Trim lines",
        }
    }
}
