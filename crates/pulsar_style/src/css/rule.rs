//! A selector paired with its declarations

use super::ToCss;
use super::declarations::Declarations;

/// A css rule
///
/// The selector is used verbatim, callers are responsible for sanitizing anything interpolated
/// into it.
#[derive(Default, Clone, Debug, PartialEq, Eq)]
#[must_use]
pub struct Rule {
    /// The selector
    selector: String,
    /// The declarations owned by this rule
    declarations: Declarations,
}

impl Rule {
    /// Create a rule from a selector and anything that converts into declarations.
    pub fn new(selector: impl Into<String>, declarations: impl Into<Declarations>) -> Self {
        Self {
            selector: selector.into(),
            declarations: declarations.into(),
        }
    }

    /// The selector
    #[must_use]
    pub fn selector(&self) -> &str {
        &self.selector
    }

    /// Replace the selector
    pub fn set_selector(&mut self, selector: impl Into<String>) -> &mut Self {
        self.selector = selector.into();
        self
    }

    /// The declarations
    pub fn declarations(&self) -> &Declarations {
        &self.declarations
    }

    /// Mutable access to the declarations
    pub fn declarations_mut(&mut self) -> &mut Declarations {
        &mut self.declarations
    }
}

impl ToCss for Rule {
    fn to_css(&self) -> String {
        let declarations = self.declarations.to_css();
        if self.selector.is_empty() || declarations.is_empty() {
            return String::new();
        }

        format!("{} {{ {declarations} }}", self.selector)
    }
}
