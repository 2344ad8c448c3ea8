//! Path expressions for locating elements.
//!
//! A deliberately small subset of XPath, enough to detect prior state in
//! deployment descriptors:
//!
//! - `/web-app/filter` absolute path from the document root
//! - `filter-mapping` relative path from an element's children
//! - `bean[@class='org.example.Resolver']` attribute value predicate
//! - `filter[filter-name = 'sitemeshFilter']` child text predicate
//! - `bean[@id]` / `filter[init-param]` existence predicates
//! - `*` matches any element name
//!
//! Names are compared against the qualified name as written in the
//! document, so `mvc:annotation-driven` must be queried with its prefix.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Result, SetupError};

use super::document::Element;

static PREDICATE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*(@?)([A-Za-z_][\w:.\-]*)\s*(?:=\s*(?:'([^']*)'|"([^"]*)")\s*)?$"#)
        .expect("predicate pattern is valid")
});

static NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\*|[A-Za-z_][\w:.\-]*)$").expect("name pattern is valid"));

/// A condition attached to a step in square brackets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// `[@name='value']`
    AttributeEquals { name: String, value: String },
    /// `[@name]`
    AttributeExists { name: String },
    /// `[child='text']`, compared against the trimmed text of the child.
    ChildTextEquals { name: String, value: String },
    /// `[child]`
    ChildExists { name: String },
}

impl Predicate {
    fn matches(&self, element: &Element) -> bool {
        match self {
            Self::AttributeEquals { name, value } => element.attribute(name) == Some(value.as_str()),
            Self::AttributeExists { name } => element.attribute(name).is_some(),
            Self::ChildTextEquals { name, value } => element
                .child_elements()
                .filter(|c| c.name() == name)
                .any(|c| c.text().trim() == value),
            Self::ChildExists { name } => element.child_elements().any(|c| c.name() == name),
        }
    }
}

/// One `/`-separated component of a path expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    name: String,
    predicates: Vec<Predicate>,
}

impl Step {
    /// Element name this step selects (`*` for any).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Predicates that must all hold.
    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// Check whether an element satisfies this step.
    pub fn matches(&self, element: &Element) -> bool {
        (self.name == "*" || self.name == element.name())
            && self.predicates.iter().all(|p| p.matches(element))
    }
}

/// A parsed path expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathExpr {
    absolute: bool,
    steps: Vec<Step>,
}

impl PathExpr {
    /// Parse a path expression.
    ///
    /// # Errors
    ///
    /// Returns `XmlQuery` for empty steps, unbalanced brackets or quotes,
    /// and predicates outside the supported forms.
    pub fn parse(expression: &str) -> Result<Self> {
        let invalid = |message: &str| SetupError::XmlQuery {
            expression: expression.to_string(),
            message: message.to_string(),
        };

        let trimmed = expression.trim();
        let (absolute, body) = match trimmed.strip_prefix('/') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        if body.is_empty() {
            return Err(invalid("expression selects nothing"));
        }

        let mut steps = Vec::new();
        for raw in split_steps(body).map_err(|m| invalid(&m))? {
            steps.push(parse_step(&raw).map_err(|m| invalid(&m))?);
        }

        Ok(Self { absolute, steps })
    }

    /// Relative expression from already-parsed steps.
    pub(crate) fn from_steps(steps: Vec<Step>) -> Self {
        Self {
            absolute: false,
            steps,
        }
    }

    /// Whether the expression starts at the document root.
    pub fn is_absolute(&self) -> bool {
        self.absolute
    }

    /// The parsed steps.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Whether there are no steps left to match.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Collect all elements under `context` that the steps select.
    ///
    /// `context` is the element whose children the first step is matched
    /// against.
    pub(crate) fn select_from<'a>(&self, context: &'a Element) -> Vec<&'a Element> {
        let mut out = Vec::new();
        collect(context, &self.steps, &mut out);
        out
    }

    /// Child-index path to the first selected element below `context`.
    pub(crate) fn locate_from(&self, context: &Element) -> Option<Vec<usize>> {
        locate(context, &self.steps)
    }
}

fn collect<'a>(context: &'a Element, steps: &[Step], out: &mut Vec<&'a Element>) {
    let Some((step, rest)) = steps.split_first() else {
        return;
    };
    for child in context.child_elements().filter(|c| step.matches(c)) {
        if rest.is_empty() {
            out.push(child);
        } else {
            collect(child, rest, out);
        }
    }
}

fn locate(context: &Element, steps: &[Step]) -> Option<Vec<usize>> {
    let (step, rest) = steps.split_first()?;
    for (index, node) in context.children().iter().enumerate() {
        let Some(child) = node.as_element() else {
            continue;
        };
        if !step.matches(child) {
            continue;
        }
        if rest.is_empty() {
            return Some(vec![index]);
        }
        if let Some(mut tail) = locate(child, rest) {
            tail.insert(0, index);
            return Some(tail);
        }
    }
    None
}

/// Split on `/` outside of brackets and quotes.
fn split_steps(body: &str) -> std::result::Result<Vec<String>, String> {
    let mut steps = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;

    for c in body.chars() {
        match (quote, c) {
            (Some(q), c) if c == q => {
                quote = None;
                current.push(c);
            }
            (Some(_), c) => current.push(c),
            (None, '\'' | '"') => {
                quote = Some(c);
                current.push(c);
            }
            (None, '[') => {
                depth += 1;
                current.push(c);
            }
            (None, ']') => {
                depth = depth.checked_sub(1).ok_or("unbalanced ']'")?;
                current.push(c);
            }
            (None, '/') if depth == 0 => {
                if current.trim().is_empty() {
                    return Err("empty step".to_string());
                }
                steps.push(std::mem::take(&mut current));
            }
            (None, c) => current.push(c),
        }
    }

    if quote.is_some() {
        return Err("unterminated string literal".to_string());
    }
    if depth != 0 {
        return Err("unterminated predicate".to_string());
    }
    if current.trim().is_empty() {
        return Err("empty step".to_string());
    }
    steps.push(current);
    Ok(steps)
}

fn parse_step(raw: &str) -> std::result::Result<Step, String> {
    let raw = raw.trim();
    let name_end = raw.find('[').unwrap_or(raw.len());
    let name = raw[..name_end].trim();
    if !NAME_REGEX.is_match(name) {
        return Err(format!("invalid element name '{}'", name));
    }

    let mut predicates = Vec::new();
    let mut rest = &raw[name_end..];
    while !rest.is_empty() {
        let inner_end = closing_bracket(rest).ok_or("unterminated predicate")?;
        predicates.push(parse_predicate(&rest[1..inner_end])?);
        rest = rest[inner_end + 1..].trim_start();
        if !rest.is_empty() && !rest.starts_with('[') {
            return Err(format!("unexpected '{}' after predicate", rest));
        }
    }

    Ok(Step {
        name: name.to_string(),
        predicates,
    })
}

/// Index of the `]` closing the predicate that starts at `s[0]`.
fn closing_bracket(s: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (i, c) in s.char_indices().skip(1) {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') => quote = Some(c),
            (None, ']') => return Some(i),
            _ => {}
        }
    }
    None
}

fn parse_predicate(inner: &str) -> std::result::Result<Predicate, String> {
    let caps = PREDICATE_REGEX
        .captures(inner)
        .ok_or_else(|| format!("unsupported predicate '[{}]'", inner))?;

    let is_attribute = !caps[1].is_empty();
    let name = caps[2].to_string();
    let value = caps
        .get(3)
        .or_else(|| caps.get(4))
        .map(|m| m.as_str().to_string());

    Ok(match (is_attribute, value) {
        (true, Some(value)) => Predicate::AttributeEquals { name, value },
        (true, None) => Predicate::AttributeExists { name },
        (false, Some(value)) => Predicate::ChildTextEquals { name, value },
        (false, None) => Predicate::ChildExists { name },
    })
}
