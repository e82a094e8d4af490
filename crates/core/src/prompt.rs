use std::fmt::{self, Display, Formatter};

const ROBODREAM_PREAMBLE: &str = include_str!("./preamble.md");

/// Fixed text describing the project and team, sent ahead of every
/// question.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Preamble(String);

impl Preamble {
    /// Creates a preamble from arbitrary text.
    #[inline]
    pub fn new<S: Into<String>>(text: S) -> Self {
        Self(text.into())
    }

    /// Returns the preamble text.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Builds the prompt for `question`.
    ///
    /// The question is appended verbatim, surrounding whitespace included.
    pub fn compose(&self, question: &str) -> String {
        let preamble = self.0.trim_end();
        if preamble.is_empty() {
            return format!("Question: {question}");
        }
        format!("{preamble}\nQuestion: {question}")
    }
}

impl Default for Preamble {
    /// The RoboDream project and team description.
    #[inline]
    fn default() -> Self {
        Self::new(ROBODREAM_PREAMBLE)
    }
}

impl Display for Preamble {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
