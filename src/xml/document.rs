//! In-memory XML document tree.
//!
//! Documents are parsed with `quick-xml` into a small DOM that keeps enough
//! of the source to write untouched content back unchanged: start tags keep
//! their raw text (attribute order, prefixes, line breaks), text keeps its
//! escaped form, and comments, CDATA, processing instructions and the
//! doctype are kept verbatim. Only elements created or changed through this
//! API are re-rendered.

use std::borrow::Cow;
use std::path::Path;

use quick_xml::escape::{escape, unescape};
use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::{Result, SetupError};

use super::path::PathExpr;

/// Indentation used for new elements when the document gives no hint.
pub const DEFAULT_INDENT: &str = "    ";

/// A node in the document tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// An element.
    Element(Element),
    /// Character data, stored escaped as it appears in the document.
    Text(String),
    /// Comment body (without `<!--` / `-->`).
    Comment(String),
    /// CDATA section body.
    CData(String),
    /// Processing instruction body (without `<?` / `?>`).
    ProcessingInstruction(String),
    /// XML declaration body (`xml version="1.0" ...`).
    Declaration(String),
    /// Doctype body (after `<!DOCTYPE`).
    DocType(String),
}

impl Node {
    /// Text node from unescaped content.
    pub fn text(content: &str) -> Self {
        Self::Text(escape(content).into_owned())
    }

    /// Comment node. `--` is not allowed in comments and is replaced.
    pub fn comment(content: &str) -> Self {
        Self::Comment(format!(" {} ", content.replace("--", "- -")))
    }

    /// The element, if this node is one.
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Mutable access to the element, if this node is one.
    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Self::Element(e) => Some(e),
            _ => None,
        }
    }

    fn is_whitespace(&self) -> bool {
        matches!(self, Self::Text(t) if t.chars().all(char::is_whitespace))
    }

    fn write_to(&self, out: &mut String) {
        match self {
            Self::Element(e) => e.write_to(out),
            Self::Text(t) => out.push_str(t),
            Self::Comment(c) => {
                out.push_str("<!--");
                out.push_str(c);
                out.push_str("-->");
            }
            Self::CData(c) => {
                out.push_str("<![CDATA[");
                out.push_str(c);
                out.push_str("]]>");
            }
            Self::ProcessingInstruction(p) | Self::Declaration(p) => {
                out.push_str("<?");
                out.push_str(p);
                out.push_str("?>");
            }
            Self::DocType(d) => {
                out.push_str("<!DOCTYPE ");
                out.push_str(d.trim_start());
                out.push('>');
            }
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}

/// An XML element.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
    /// Source text of the start tag, dropped once attributes change.
    raw_tag: Option<String>,
}

impl Element {
    /// Create an empty element.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            attributes: Vec::new(),
            children: Vec::new(),
            raw_tag: None,
        }
    }

    /// Add an attribute (builder style).
    pub fn with_attribute(mut self, name: &str, value: &str) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Add a child element (builder style).
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    /// Add a text child (builder style).
    pub fn with_text(mut self, text: &str) -> Self {
        self.children.push(Node::text(text));
        self
    }

    /// Qualified name as written in the document.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attribute value by qualified name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// All attributes in document order.
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// Set or replace an attribute.
    pub fn set_attribute(&mut self, name: &str, value: &str) {
        self.raw_tag = None;
        match self.attributes.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value.to_string(),
            None => self
                .attributes
                .push((name.to_string(), value.to_string())),
        }
    }

    /// All child nodes.
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Child elements, skipping text and comments.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// Concatenated, unescaped text content of direct text and CDATA children.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for node in &self.children {
            match node {
                Node::Text(t) => out.push_str(&unescape(t).unwrap_or(Cow::Borrowed(t.as_str()))),
                Node::CData(c) => out.push_str(c),
                _ => {}
            }
        }
        out
    }

    /// Text of the first child element with the given name.
    pub fn child_text(&self, name: &str) -> Option<String> {
        self.child_elements()
            .find(|c| c.name() == name)
            .map(|c| c.text().trim().to_string())
    }

    /// First element selected by a relative path expression.
    pub fn find_first(&self, expression: &str) -> Result<Option<&Element>> {
        let expr = relative(expression)?;
        Ok(expr.select_from(self).into_iter().next())
    }

    /// All elements selected by a relative path expression.
    pub fn find_all(&self, expression: &str) -> Result<Vec<&Element>> {
        Ok(relative(expression)?.select_from(self))
    }

    /// Mutable access to the first element selected by a relative path.
    pub fn find_first_mut(&mut self, expression: &str) -> Result<Option<&mut Element>> {
        let expr = relative(expression)?;
        Ok(match expr.locate_from(self) {
            Some(indices) => self.descend_mut(&indices),
            None => None,
        })
    }

    /// Node index of the first direct child matching a single-step expression.
    pub fn position(&self, expression: &str) -> Result<Option<usize>> {
        let step = single_step(expression)?;
        Ok(self
            .children
            .iter()
            .position(|n| n.as_element().is_some_and(|e| step.matches(e))))
    }

    /// Node index of the last direct child matching a single-step expression.
    pub fn last_position(&self, expression: &str) -> Result<Option<usize>> {
        let step = single_step(expression)?;
        Ok(self
            .children
            .iter()
            .rposition(|n| n.as_element().is_some_and(|e| step.matches(e))))
    }

    /// Remove every direct child matching a single-step expression.
    ///
    /// The whitespace that indented each removed element goes with it, as
    /// does a comment directly above it.
    pub fn remove_children(&mut self, expression: &str) -> Result<Vec<Element>> {
        let step = single_step(expression)?;
        let mut removed = Vec::new();
        let mut index = 0;
        while index < self.children.len() {
            let hit = self.children[index]
                .as_element()
                .is_some_and(|e| step.matches(e));
            if !hit {
                index += 1;
                continue;
            }
            if let Node::Element(e) = self.children.remove(index) {
                removed.push(e);
            }
            index = self.remove_whitespace_before(index);
            if index > 0 && matches!(self.children[index - 1], Node::Comment(_)) {
                self.children.remove(index - 1);
                index = self.remove_whitespace_before(index - 1);
            }
        }
        Ok(removed)
    }

    /// Drop a whitespace node just before `index`; returns the shifted index.
    fn remove_whitespace_before(&mut self, index: usize) -> usize {
        if index > 0 && self.children[index - 1].is_whitespace() {
            self.children.remove(index - 1);
            return index - 1;
        }
        index
    }

    /// Insert a node directly after the child at `index`, on its own line.
    pub fn insert_after(&mut self, index: usize, node: impl Into<Node>, unit: &str) {
        let indent = self.child_indent(unit);
        let node = laid_out(node.into(), &indent, unit);
        let at = (index + 1).min(self.children.len());
        self.children.insert(at, node);
        self.children.insert(at, Node::Text(format!("\n{}", indent)));
    }

    /// Insert a node directly before the child at `index`, on its own line.
    pub fn insert_before(&mut self, index: usize, node: impl Into<Node>, unit: &str) {
        let indent = self.child_indent(unit);
        let node = laid_out(node.into(), &indent, unit);
        let at = index.min(self.children.len());
        self.children.insert(at, Node::Text(format!("\n{}", indent)));
        self.children.insert(at, node);
    }

    /// Append a node after the last child, before the closing tag.
    pub fn append(&mut self, node: impl Into<Node>, unit: &str) {
        if self.children.is_empty() {
            let node = laid_out(node.into(), unit, unit);
            self.children.push(Node::Text(format!("\n{}", unit)));
            self.children.push(node);
            self.children.push(Node::Text("\n".to_string()));
            return;
        }

        let indent = self.child_indent(unit);
        let node = laid_out(node.into(), &indent, unit);
        let at = match self.children.last() {
            Some(last) if last.is_whitespace() => self.children.len() - 1,
            _ => self.children.len(),
        };
        self.children.insert(at, node);
        self.children.insert(at, Node::Text(format!("\n{}", indent)));
    }

    /// Indentation of existing child elements, or a best guess.
    fn child_indent(&self, unit: &str) -> String {
        for pair in self.children.windows(2) {
            if let [Node::Text(ws), Node::Element(_)] = pair {
                if let Some(indent) = trailing_line_indent(ws) {
                    return indent.to_string();
                }
            }
        }
        match self.children.last() {
            Some(Node::Text(ws)) => trailing_line_indent(ws)
                .map(|closing| format!("{}{}", closing, unit))
                .unwrap_or_else(|| unit.to_string()),
            _ => unit.to_string(),
        }
    }

    fn descend_mut(&mut self, indices: &[usize]) -> Option<&mut Element> {
        let mut current = self;
        for &i in indices {
            current = current.children.get_mut(i)?.as_element_mut()?;
        }
        Some(current)
    }

    fn write_to(&self, out: &mut String) {
        out.push('<');
        match &self.raw_tag {
            Some(raw) => out.push_str(raw),
            None => {
                out.push_str(&self.name);
                for (k, v) in &self.attributes {
                    out.push(' ');
                    out.push_str(k);
                    out.push_str("=\"");
                    out.push_str(&escape(v.as_str()));
                    out.push('"');
                }
            }
        }

        if self.children.is_empty() {
            out.push_str("/>");
            return;
        }

        out.push('>');
        for child in &self.children {
            child.write_to(out);
        }
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }
}

/// A parsed XML document.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlDocument {
    prolog: Vec<Node>,
    root: Element,
    epilog: Vec<Node>,
}

impl XmlDocument {
    /// Create a document around a root element.
    pub fn new(root: Element) -> Self {
        Self {
            prolog: vec![
                Node::Declaration(r#"xml version="1.0" encoding="UTF-8""#.to_string()),
                Node::Text("\n".to_string()),
            ],
            root,
            epilog: vec![Node::Text("\n".to_string())],
        }
    }

    /// Parse a document. `path` is only used in error messages.
    ///
    /// # Errors
    ///
    /// Returns `XmlParse` for malformed markup, mismatched or unclosed tags,
    /// invalid UTF-8 and documents without a root element.
    pub fn parse(path: &Path, source: &str) -> Result<Self> {
        let fail = |message: String| SetupError::XmlParse {
            path: path.to_path_buf(),
            message,
        };

        let mut reader = Reader::from_str(source);
        let mut stack: Vec<Element> = Vec::new();
        let mut prolog = Vec::new();
        let mut epilog = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            let event = match reader.read_event() {
                Ok(event) => event,
                Err(e) => {
                    let at = reader.buffer_position();
                    return Err(fail(format!("{} (at byte {})", e, at)));
                }
            };

            let node = match event {
                Event::Start(e) => {
                    stack.push(element_from_tag(&e, &fail)?);
                    continue;
                }
                Event::End(_) => {
                    let Some(done) = stack.pop() else {
                        return Err(fail("unexpected closing tag".to_string()));
                    };
                    Node::Element(done)
                }
                Event::Empty(e) => Node::Element(element_from_tag(&e, &fail)?),
                Event::Text(e) => Node::Text(utf8(&e, &fail)?),
                Event::CData(e) => Node::CData(utf8(&e, &fail)?),
                Event::Comment(e) => Node::Comment(utf8(&e, &fail)?),
                Event::Decl(e) => Node::Declaration(utf8(&e, &fail)?),
                Event::PI(e) => Node::ProcessingInstruction(utf8(&e, &fail)?),
                Event::DocType(e) => Node::DocType(utf8(&e, &fail)?),
                Event::Eof => break,
            };

            if let Some(parent) = stack.last_mut() {
                parent.children.push(node);
                continue;
            }

            match node {
                Node::Element(element) => {
                    if root.is_some() {
                        return Err(fail("multiple root elements".to_string()));
                    }
                    root = Some(element);
                }
                other if root.is_none() => prolog.push(other),
                Node::Text(t) if !t.trim().is_empty() => {
                    return Err(fail("text after the root element".to_string()));
                }
                other => epilog.push(other),
            }
        }

        if let Some(open) = stack.last() {
            return Err(fail(format!("unclosed element <{}>", open.name)));
        }
        let root = root.ok_or_else(|| fail("no root element".to_string()))?;

        Ok(Self {
            prolog,
            root,
            epilog,
        })
    }

    /// The document element.
    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Mutable access to the document element.
    pub fn root_mut(&mut self) -> &mut Element {
        &mut self.root
    }

    /// Indentation step used by the document, from the root's first child.
    pub fn indent_unit(&self) -> String {
        for pair in self.root.children.windows(2) {
            if let [Node::Text(ws), Node::Element(_)] = pair {
                if let Some(indent) = trailing_line_indent(ws) {
                    if !indent.is_empty() {
                        return indent.to_string();
                    }
                }
            }
        }
        DEFAULT_INDENT.to_string()
    }

    /// First element selected by an absolute path expression.
    pub fn find_first(&self, expression: &str) -> Result<Option<&Element>> {
        Ok(self.find_all(expression)?.into_iter().next())
    }

    /// All elements selected by an absolute path expression.
    pub fn find_all(&self, expression: &str) -> Result<Vec<&Element>> {
        let expr = absolute(expression)?;
        let Some((first, rest)) = split_root(&expr) else {
            return Ok(Vec::new());
        };
        if !first.matches(&self.root) {
            return Ok(Vec::new());
        }
        if rest.is_empty() {
            return Ok(vec![&self.root]);
        }
        Ok(rest.select_from(&self.root))
    }

    /// Mutable access to the first element selected by an absolute path.
    pub fn find_first_mut(&mut self, expression: &str) -> Result<Option<&mut Element>> {
        let expr = absolute(expression)?;
        let Some((first, rest)) = split_root(&expr) else {
            return Ok(None);
        };
        if !first.matches(&self.root) {
            return Ok(None);
        }
        if rest.is_empty() {
            return Ok(Some(&mut self.root));
        }
        Ok(match rest.locate_from(&self.root) {
            Some(indices) => self.root.descend_mut(&indices),
            None => None,
        })
    }

    /// Serialize the document.
    pub fn to_xml_string(&self) -> String {
        let mut out = String::new();
        for node in &self.prolog {
            node.write_to(&mut out);
        }
        self.root.write_to(&mut out);
        for node in &self.epilog {
            node.write_to(&mut out);
        }
        out
    }
}

fn absolute(expression: &str) -> Result<PathExpr> {
    let expr = PathExpr::parse(expression)?;
    if !expr.is_absolute() {
        return Err(SetupError::XmlQuery {
            expression: expression.to_string(),
            message: "document queries must start with '/'".to_string(),
        });
    }
    Ok(expr)
}

fn relative(expression: &str) -> Result<PathExpr> {
    let expr = PathExpr::parse(expression)?;
    if expr.is_absolute() {
        return Err(SetupError::XmlQuery {
            expression: expression.to_string(),
            message: "element queries are relative; drop the leading '/'".to_string(),
        });
    }
    Ok(expr)
}

fn single_step(expression: &str) -> Result<super::path::Step> {
    let expr = relative(expression)?;
    match expr.steps() {
        [step] => Ok(step.clone()),
        _ => Err(SetupError::XmlQuery {
            expression: expression.to_string(),
            message: "expected a single step".to_string(),
        }),
    }
}

/// Split an absolute expression into the root step and the remainder.
fn split_root(expr: &PathExpr) -> Option<(&super::path::Step, PathExpr)> {
    let (first, rest) = expr.steps().split_first()?;
    Some((first, PathExpr::from_steps(rest.to_vec())))
}

fn element_from_tag(
    tag: &quick_xml::events::BytesStart<'_>,
    fail: &impl Fn(String) -> SetupError,
) -> Result<Element> {
    let name = std::str::from_utf8(tag.name().as_ref())
        .map_err(|e| fail(e.to_string()))?
        .to_string();

    let mut attributes = Vec::new();
    for attr in tag.attributes() {
        let attr = attr.map_err(|e| fail(format!("bad attribute on <{}>: {}", name, e)))?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|e| fail(e.to_string()))?
            .to_string();
        let value = attr
            .unescape_value()
            .map_err(|e| fail(format!("bad attribute '{}' on <{}>: {}", key, name, e)))?
            .into_owned();
        attributes.push((key, value));
    }

    Ok(Element {
        name,
        attributes,
        children: Vec::new(),
        raw_tag: Some(utf8(tag, fail)?),
    })
}

fn utf8(bytes: &[u8], fail: &impl Fn(String) -> SetupError) -> Result<String> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|e| fail(format!("invalid UTF-8: {}", e)))
}

/// Whitespace after the last line break, if `ws` is pure whitespace with one.
fn trailing_line_indent(ws: &str) -> Option<&str> {
    if !ws.chars().all(char::is_whitespace) {
        return None;
    }
    ws.rfind('\n').map(|i| &ws[i + 1..])
}

/// Indent a freshly built element whose children are all markup.
fn laid_out(node: Node, indent: &str, unit: &str) -> Node {
    match node {
        Node::Element(mut element) => {
            lay_out(&mut element, indent, unit);
            Node::Element(element)
        }
        other => other,
    }
}

fn lay_out(element: &mut Element, indent: &str, unit: &str) {
    let markup_only = !element.children.is_empty()
        && element
            .children
            .iter()
            .all(|n| matches!(n, Node::Element(_) | Node::Comment(_)));
    if !markup_only {
        return;
    }

    let inner = format!("{}{}", indent, unit);
    let mut children = Vec::with_capacity(element.children.len() * 2 + 1);
    for mut child in std::mem::take(&mut element.children) {
        if let Node::Element(e) = &mut child {
            lay_out(e, &inner, unit);
        }
        children.push(Node::Text(format!("\n{}", inner)));
        children.push(child);
    }
    children.push(Node::Text(format!("\n{}", indent)));
    element.children = children;
}
