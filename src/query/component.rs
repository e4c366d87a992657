//! Query-string tokenizer producing a flat sequence of typed components.
//!
//! A query string like `-author:"jane doe" +status:open bug` is scanned
//! character by character into [`QueryComponent`] values. Each component
//! records its operator, optional field prefix, raw value, and the inclusive
//! span of source characters it was parsed from. Spans are part of the
//! observable contract: callers use them for highlighting and diagnostics,
//! so their exact boundaries are stable.
//!
//! The tokenizer has no reject state. Every input, including unterminated
//! quotes, produces some component sequence.

use std::mem;

use serde::{Deserialize, Serialize};

/// How a component participates in the compiled query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentOperator {
    /// No operator was given; the component is an ordinary term.
    #[default]
    None,
    /// The component must match (`+` prefix).
    Required,
    /// The component must not match (`-` prefix).
    Excluded,
}

/// One parsed unit of a query string.
///
/// Immutable value type: constructed once, never modified. Two components are
/// equal iff operator, prefix, value, and both span indices are all equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueryComponent {
    /// The operator parsed from a leading `+` or `-`.
    operator: ComponentOperator,
    /// The field qualifier before a `:`, or empty when none was given.
    prefix: String,
    /// The raw value text, with quotes and operator characters stripped.
    value: String,
    /// Inclusive 0-based character offset of the first spanned character.
    start_index: usize,
    /// Inclusive 0-based character offset of the last spanned character.
    last_index: usize,
}

impl QueryComponent {
    /// Create a component directly.
    ///
    /// Exposed so callers and tests can build expected values; the tokenizer
    /// is the normal source of components.
    pub fn new<P, V>(
        operator: ComponentOperator,
        prefix: P,
        value: V,
        start_index: usize,
        last_index: usize,
    ) -> Self
    where
        P: Into<String>,
        V: Into<String>,
    {
        QueryComponent {
            operator,
            prefix: prefix.into(),
            value: value.into(),
            start_index,
            last_index,
        }
    }

    /// Tokenize a query string into its component sequence.
    ///
    /// Empty and whitespace-only input yields an empty vector. The span of
    /// each component covers its operator, prefix, and quote characters;
    /// offsets count characters, not bytes.
    pub fn parse(query: &str) -> Vec<QueryComponent> {
        if query.trim().is_empty() {
            return Vec::new();
        }
        Tokenizer::new().run(query)
    }

    /// The operator parsed from a leading `+` or `-`.
    pub fn operator(&self) -> ComponentOperator {
        self.operator
    }

    /// The field qualifier, or the empty string when none was given.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The raw value text.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Inclusive character offset where this component starts.
    pub fn start_index(&self) -> usize {
        self.start_index
    }

    /// Inclusive character offset where this component ends.
    pub fn last_index(&self) -> usize {
        self.last_index
    }

    /// Number of source characters spanned by this component.
    pub fn len(&self) -> usize {
        self.last_index - self.start_index + 1
    }

    /// Always false: a component spans at least one character.
    pub fn is_empty(&self) -> bool {
        false
    }
}

/// Per-parse scan state, reset after each emitted component.
struct Tokenizer {
    operator: ComponentOperator,
    prefix: Option<String>,
    buffer: String,
    /// True until a value terminator (`:` or `"`) has been seen.
    in_prefix: bool,
    quoted: bool,
    start_index: usize,
}

impl Tokenizer {
    fn new() -> Self {
        Tokenizer {
            operator: ComponentOperator::None,
            prefix: None,
            buffer: String::new(),
            in_prefix: true,
            quoted: false,
            start_index: 0,
        }
    }

    fn run(mut self, query: &str) -> Vec<QueryComponent> {
        let mut components = Vec::new();
        let mut position = 0;

        for (pos, c) in query.chars().enumerate() {
            position = pos;

            // A leading +/- is an operator only while nothing else has been
            // consumed for the current component.
            if self.is_pristine() {
                match c {
                    '+' => {
                        self.operator = ComponentOperator::Required;
                        continue;
                    }
                    '-' => {
                        self.operator = ComponentOperator::Excluded;
                        continue;
                    }
                    _ => {}
                }
            }

            if self.in_prefix {
                if c.is_whitespace() {
                    if !self.buffer.is_empty() {
                        components.push(self.component(pos - 1));
                    }
                    self.reset(pos + 1);
                } else if c == '"' {
                    self.prefix = None;
                    self.in_prefix = false;
                    self.quoted = self.buffer.is_empty();
                } else if c == ':' {
                    if self.buffer.is_empty() {
                        // A leading bare colon is literal content, not a
                        // prefix delimiter.
                        self.buffer.push(c);
                    } else {
                        self.prefix = Some(mem::take(&mut self.buffer));
                    }
                    self.in_prefix = false;
                    self.quoted = false;
                } else {
                    self.buffer.push(c);
                }
            } else if c.is_whitespace() {
                if self.quoted {
                    self.buffer.push(c);
                } else {
                    components.push(self.component(pos - 1));
                    self.reset(pos + 1);
                }
            } else if c == '"' {
                if self.quoted {
                    // A bare "" with no prefix is discarded.
                    if self.prefix.is_some() || !self.buffer.is_empty() {
                        components.push(self.component(pos));
                    }
                    self.reset(pos + 1);
                } else if self.buffer.is_empty() {
                    self.quoted = true;
                } else {
                    self.buffer.push(c);
                }
            } else {
                self.buffer.push(c);
            }
        }

        // An unterminated prefix with an empty buffer is nothing but a
        // dangling operator; everything else becomes a final component.
        if !self.in_prefix || !self.buffer.is_empty() {
            components.push(self.component(position));
        }

        components
    }

    /// True when no operator, prefix, or buffered text has been consumed.
    fn is_pristine(&self) -> bool {
        self.operator == ComponentOperator::None && self.in_prefix && self.buffer.is_empty()
    }

    fn reset(&mut self, start_index: usize) {
        self.operator = ComponentOperator::None;
        self.prefix = None;
        self.buffer.clear();
        self.in_prefix = true;
        self.quoted = false;
        self.start_index = start_index;
    }

    fn component(&self, last_index: usize) -> QueryComponent {
        QueryComponent::new(
            self.operator,
            self.prefix.clone().unwrap_or_default(),
            self.buffer.clone(),
            self.start_index,
            last_index,
        )
    }
}
