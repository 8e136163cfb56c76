use std::fmt;

/// Diagnostics accumulated while checking a response.
///
/// Every failed expectation contributes one message, in evaluation order.
/// They are reported together so a single failing assertion describes
/// everything that went wrong, not only the first mismatch.
#[derive(Default, Debug, Clone)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    /// `true` when no expectation failed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of failed expectations.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate over all diagnostic messages, in evaluation order.
    pub fn iter_messages(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|diagnostic| diagnostic.message.as_str())
    }

    pub(crate) fn push(&mut self, message: String) {
        self.0.push(Diagnostic { message });
    }

    pub(crate) fn append(&mut self, other: &mut Diagnostics) {
        self.0.append(&mut other.0);
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for diagnostic in &self.0 {
            writeln!(f, "- {}", diagnostic.message)?;
        }
        Ok(())
    }
}

/// A single failed expectation.
#[derive(Debug, Clone)]
pub(crate) struct Diagnostic {
    message: String,
}

/// The result of checking a response against a set of rules.
///
/// An outcome passes when no expectation failed. On failure it carries the
/// diagnostics for every violated rule, not just the first one.
#[derive(Debug)]
#[must_use]
pub struct CheckOutcome {
    diagnostics: Diagnostics,
}

impl CheckOutcome {
    pub(crate) fn new(diagnostics: Diagnostics) -> Self {
        CheckOutcome { diagnostics }
    }

    /// Did every check pass?
    pub fn passed(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Did any check fail?
    pub fn is_failure(&self) -> bool {
        !self.passed()
    }

    /// The diagnostics for every failed expectation.
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Simplify the outcome to a yes-no answer.
    ///
    /// `Err()` contains all [Diagnostics].
    pub fn into_result(self) -> Result<(), Diagnostics> {
        if self.passed() {
            Ok(())
        } else {
            Err(self.diagnostics)
        }
    }

    /// One consolidated message listing every failed expectation.
    pub fn describe_failure(&self) -> String {
        format!("GraphQL response failed validation:\n{}", self.diagnostics)
    }
}
