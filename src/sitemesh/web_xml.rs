//! Filter-chain edits for the web dispatch descriptor (`web.xml`).
//!
//! Filters are declared by a `<filter>` element and ordered by their
//! `<filter-mapping>` elements, so the two are placed independently: the
//! declaration joins the other declarations, the mapping goes where the
//! requested [`FilterPosition`] puts it in the chain.

use std::fmt;

use crate::error::Result;
use crate::xml::{Element, Node};

/// Elements that follow `<filter>` declarations in a deployment descriptor,
/// in schema order.
const AFTER_FILTERS: &[&str] = &[
    "filter-mapping",
    "listener",
    "servlet",
    "servlet-mapping",
    "session-config",
    "mime-mapping",
    "welcome-file-list",
    "error-page",
];

/// Request dispatch types a filter mapping can apply to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatcher {
    Request,
    Error,
}

impl Dispatcher {
    /// Value as written in `<dispatcher>`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Request => "REQUEST",
            Self::Error => "ERROR",
        }
    }
}

impl fmt::Display for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a filter mapping goes in the chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterPosition {
    /// Before every other mapping.
    First,
    /// After every other mapping.
    Last,
    /// Directly before the mapping of the named filter.
    Before(String),
    /// Directly after the mapping of the named filter.
    After(String),
}

/// A servlet filter to declare and map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterDescriptor {
    pub name: String,
    pub class: String,
    pub url_pattern: String,
    pub init_params: Vec<(String, String)>,
    pub dispatchers: Vec<Dispatcher>,
    /// Comment written directly above the `<filter>` declaration.
    pub comment: Option<String>,
}

impl FilterDescriptor {
    pub fn new(name: &str, class: &str, url_pattern: &str) -> Self {
        Self {
            name: name.to_string(),
            class: class.to_string(),
            url_pattern: url_pattern.to_string(),
            init_params: Vec::new(),
            dispatchers: Vec::new(),
            comment: None,
        }
    }

    pub fn with_init_param(mut self, name: &str, value: &str) -> Self {
        self.init_params.push((name.to_string(), value.to_string()));
        self
    }

    pub fn with_dispatcher(mut self, dispatcher: Dispatcher) -> Self {
        self.dispatchers.push(dispatcher);
        self
    }

    pub fn with_comment(mut self, comment: &str) -> Self {
        self.comment = Some(comment.to_string());
        self
    }

    /// The `<filter>` declaration.
    pub fn filter_element(&self) -> Element {
        let mut filter = Element::new("filter")
            .with_child(Element::new("filter-name").with_text(&self.name))
            .with_child(Element::new("filter-class").with_text(&self.class));
        for (name, value) in &self.init_params {
            filter = filter.with_child(
                Element::new("init-param")
                    .with_child(Element::new("param-name").with_text(name))
                    .with_child(Element::new("param-value").with_text(value)),
            );
        }
        filter
    }

    /// The `<filter-mapping>` element.
    pub fn mapping_element(&self) -> Element {
        let mut mapping = Element::new("filter-mapping")
            .with_child(Element::new("filter-name").with_text(&self.name))
            .with_child(Element::new("url-pattern").with_text(&self.url_pattern));
        for dispatcher in &self.dispatchers {
            mapping = mapping.with_child(Element::new("dispatcher").with_text(dispatcher.as_str()));
        }
        mapping
    }
}

/// Outcome of [`add_filter_at_position`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterInsertion {
    /// The filter was declared and mapped. `anchored` is false when the
    /// requested neighbour was missing and the mapping went to the end.
    Inserted { anchored: bool },
    /// Only one of the declaration and the mapping existed; the other was
    /// added. `anchored` is as for `Inserted` and true when only the
    /// declaration was missing.
    Completed { anchored: bool },
    /// The filter was already declared and mapped; nothing changed.
    AlreadyPresent,
}

#[derive(Debug, Clone, Copy)]
enum Placement {
    Before(usize),
    After(usize),
    Append,
}

/// Declare and map a filter inside a `<web-app>` element.
///
/// The declaration and the mapping are checked separately and each is added
/// only when missing, so the filter appears at most once in either list
/// however often this runs, including after a partial manual edit.
pub fn add_filter_at_position(
    web_app: &mut Element,
    unit: &str,
    position: &FilterPosition,
    filter: &FilterDescriptor,
) -> Result<FilterInsertion> {
    let declared = has_filter(web_app, &filter.name)?;
    let mapped = has_mapping(web_app, &filter.name)?;
    if declared && mapped {
        tracing::debug!("Filter '{}' already declared and mapped", filter.name);
        return Ok(FilterInsertion::AlreadyPresent);
    }

    if !declared {
        let mut declaration = Vec::new();
        if let Some(comment) = &filter.comment {
            declaration.push(Node::comment(comment));
        }
        declaration.push(Node::from(filter.filter_element()));
        let at = declaration_placement(web_app)?;
        place(web_app, at, declaration, unit);
    }

    let mut anchored = true;
    if !mapped {
        let at = match mapping_placement(web_app, position)? {
            Some(at) => at,
            None => {
                tracing::warn!(
                    "No mapping for filter '{}' found; mapping '{}' at the end of the chain",
                    neighbour(position).unwrap_or_default(),
                    filter.name
                );
                anchored = false;
                fallback_mapping_placement(web_app)?
            }
        };
        place(web_app, at, vec![Node::from(filter.mapping_element())], unit);
    }

    if declared || mapped {
        tracing::info!("Completed partial configuration of filter '{}'", filter.name);
        Ok(FilterInsertion::Completed { anchored })
    } else {
        tracing::info!("Added filter '{}'", filter.name);
        Ok(FilterInsertion::Inserted { anchored })
    }
}

/// Check whether a filter with this name is declared.
pub fn has_filter(web_app: &Element, name: &str) -> Result<bool> {
    Ok(web_app
        .find_first(&format!("filter[filter-name={}]", quoted(name)))?
        .is_some())
}

/// Check whether a filter with this name is mapped.
pub fn has_mapping(web_app: &Element, name: &str) -> Result<bool> {
    Ok(web_app
        .find_first(&format!("filter-mapping[filter-name={}]", quoted(name)))?
        .is_some())
}

/// Names of mapped filters, in chain order.
pub fn filter_chain(web_app: &Element) -> Result<Vec<String>> {
    Ok(web_app
        .find_all("filter-mapping")?
        .into_iter()
        .filter_map(|m| m.child_text("filter-name"))
        .collect())
}

fn declaration_placement(web_app: &Element) -> Result<Placement> {
    if let Some(last) = web_app.last_position("filter")? {
        return Ok(Placement::After(last));
    }
    let mut first_following: Option<usize> = None;
    for name in AFTER_FILTERS {
        if let Some(at) = web_app.position(name)? {
            first_following = Some(first_following.map_or(at, |f| f.min(at)));
        }
    }
    Ok(first_following.map_or(Placement::Append, Placement::Before))
}

/// Placement requested by `position`, or `None` if its neighbour is missing.
fn mapping_placement(web_app: &Element, position: &FilterPosition) -> Result<Option<Placement>> {
    Ok(match position {
        FilterPosition::First => Some(match web_app.position("filter-mapping")? {
            Some(first) => Placement::Before(first),
            None => fallback_mapping_placement(web_app)?,
        }),
        FilterPosition::Last => Some(fallback_mapping_placement(web_app)?),
        FilterPosition::Before(name) => mapping_of(web_app, name)?.map(Placement::Before),
        FilterPosition::After(name) => mapping_of(web_app, name)?.map(Placement::After),
    })
}

fn fallback_mapping_placement(web_app: &Element) -> Result<Placement> {
    if let Some(last) = web_app.last_position("filter-mapping")? {
        return Ok(Placement::After(last));
    }
    if let Some(last) = web_app.last_position("filter")? {
        return Ok(Placement::After(last));
    }
    Ok(Placement::Append)
}

fn mapping_of(web_app: &Element, name: &str) -> Result<Option<usize>> {
    web_app.position(&format!("filter-mapping[filter-name={}]", quoted(name)))
}

fn neighbour(position: &FilterPosition) -> Option<&str> {
    match position {
        FilterPosition::Before(name) | FilterPosition::After(name) => Some(name),
        FilterPosition::First | FilterPosition::Last => None,
    }
}

fn place(web_app: &mut Element, at: Placement, nodes: Vec<Node>, unit: &str) {
    match at {
        Placement::After(mut index) => {
            for node in nodes {
                web_app.insert_after(index, node, unit);
                index += 2;
            }
        }
        Placement::Before(mut index) => {
            for node in nodes {
                web_app.insert_before(index, node, unit);
                index += 2;
            }
        }
        Placement::Append => {
            for node in nodes {
                web_app.append(node, unit);
            }
        }
    }
}

/// Quote a literal for a path predicate.
fn quoted(value: &str) -> String {
    if value.contains('\'') {
        format!("\"{}\"", value)
    } else {
        format!("'{}'", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::XmlDocument;
    use std::path::Path;

    const WEB_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>
<web-app xmlns="http://java.sun.com/xml/ns/javaee" version="2.5">
    <display-name>shop</display-name>
    <filter>
        <filter-name>CharacterEncodingFilter</filter-name>
        <filter-class>org.springframework.web.filter.CharacterEncodingFilter</filter-class>
    </filter>
    <filter>
        <filter-name>HttpMethodFilter</filter-name>
        <filter-class>org.springframework.web.filter.HiddenHttpMethodFilter</filter-class>
    </filter>
    <filter-mapping>
        <filter-name>CharacterEncodingFilter</filter-name>
        <url-pattern>/*</url-pattern>
    </filter-mapping>
    <filter-mapping>
        <filter-name>HttpMethodFilter</filter-name>
        <url-pattern>/*</url-pattern>
    </filter-mapping>
    <servlet>
        <servlet-name>shop</servlet-name>
    </servlet>
</web-app>
"#;

    fn parse(src: &str) -> XmlDocument {
        XmlDocument::parse(Path::new("web.xml"), src).unwrap()
    }

    fn sitemesh() -> FilterDescriptor {
        FilterDescriptor::new(
            "sitemeshFilter",
            "com.opensymphony.module.sitemesh.filter.PageFilter",
            "/*",
        )
        .with_dispatcher(Dispatcher::Request)
        .with_dispatcher(Dispatcher::Error)
    }

    fn add(doc: &mut XmlDocument, position: FilterPosition, filter: &FilterDescriptor) -> FilterInsertion {
        let unit = doc.indent_unit();
        add_filter_at_position(doc.root_mut(), &unit, &position, filter).unwrap()
    }

    #[test]
    fn inserts_mapping_after_anchor() {
        let mut doc = parse(WEB_XML);
        let outcome = add(&mut doc, FilterPosition::After("CharacterEncodingFilter".into()), &sitemesh());

        assert_eq!(outcome, FilterInsertion::Inserted { anchored: true });
        assert_eq!(
            filter_chain(doc.root()).unwrap(),
            ["CharacterEncodingFilter", "sitemeshFilter", "HttpMethodFilter"]
        );
    }

    #[test]
    fn declaration_follows_last_filter() {
        let mut doc = parse(WEB_XML);
        add(&mut doc, FilterPosition::Last, &sitemesh());

        let xml = doc.to_xml_string();
        assert!(xml.contains(
            "    </filter>\n    <filter>\n        <filter-name>sitemeshFilter</filter-name>\n        <filter-class>com.opensymphony.module.sitemesh.filter.PageFilter</filter-class>\n    </filter>\n    <filter-mapping>"
        ));
        assert!(xml.contains(
            "    <filter-mapping>\n        <filter-name>sitemeshFilter</filter-name>\n        <url-pattern>/*</url-pattern>\n        <dispatcher>REQUEST</dispatcher>\n        <dispatcher>ERROR</dispatcher>\n    </filter-mapping>\n    <servlet>"
        ));
    }

    #[test]
    fn second_insert_is_a_no_op() {
        let mut doc = parse(WEB_XML);
        let position = FilterPosition::After("HttpMethodFilter".into());
        add(&mut doc, position.clone(), &sitemesh());
        let once = doc.to_xml_string();

        assert_eq!(add(&mut doc, position, &sitemesh()), FilterInsertion::AlreadyPresent);
        assert_eq!(doc.to_xml_string(), once);
        assert_eq!(doc.find_all("/web-app/filter[filter-name='sitemeshFilter']").unwrap().len(), 1);
    }

    #[test]
    fn existing_mapping_is_not_duplicated() {
        let src = WEB_XML.replace(
            "    <servlet>",
            "    <filter-mapping>\n        <filter-name>sitemeshFilter</filter-name>\n        <url-pattern>/*</url-pattern>\n    </filter-mapping>\n    <servlet>",
        );
        let mut doc = parse(&src);

        let outcome = add(&mut doc, FilterPosition::After("HttpMethodFilter".into()), &sitemesh());

        assert_eq!(outcome, FilterInsertion::Completed { anchored: true });
        assert_eq!(
            doc.find_all("/web-app/filter-mapping[filter-name='sitemeshFilter']").unwrap().len(),
            1
        );
        assert_eq!(doc.find_all("/web-app/filter[filter-name='sitemeshFilter']").unwrap().len(), 1);
        let root = doc.root();
        assert!(
            root.last_position("filter").unwrap().unwrap()
                < root.position("filter-mapping").unwrap().unwrap()
        );
    }

    #[test]
    fn declared_but_unmapped_filter_gets_mapped() {
        let src = WEB_XML.replace(
            "    <filter-mapping>\n        <filter-name>CharacterEncodingFilter</filter-name>",
            "    <filter>\n        <filter-name>sitemeshFilter</filter-name>\n        <filter-class>com.opensymphony.module.sitemesh.filter.PageFilter</filter-class>\n    </filter>\n    <filter-mapping>\n        <filter-name>CharacterEncodingFilter</filter-name>",
        );
        let mut doc = parse(&src);

        let outcome = add(&mut doc, FilterPosition::After("HttpMethodFilter".into()), &sitemesh());

        assert_eq!(outcome, FilterInsertion::Completed { anchored: true });
        assert_eq!(
            filter_chain(doc.root()).unwrap(),
            ["CharacterEncodingFilter", "HttpMethodFilter", "sitemeshFilter"]
        );
        assert_eq!(doc.find_all("/web-app/filter[filter-name='sitemeshFilter']").unwrap().len(), 1);

        let again = doc.to_xml_string();
        assert_eq!(
            add(&mut doc, FilterPosition::After("HttpMethodFilter".into()), &sitemesh()),
            FilterInsertion::AlreadyPresent
        );
        assert_eq!(doc.to_xml_string(), again);
    }

    #[test]
    fn comment_and_init_params_are_written() {
        let mut doc = parse(WEB_XML);
        let filter = FilterDescriptor::new("clear", "a.Clear", "/*")
            .with_init_param("decorator-attribute", "public")
            .with_dispatcher(Dispatcher::Error)
            .with_comment("Needed for error pages.");
        add(&mut doc, FilterPosition::After("HttpMethodFilter".into()), &filter);

        let xml = doc.to_xml_string();
        assert!(xml.contains(
            "    <!-- Needed for error pages. -->\n    <filter>\n        <filter-name>clear</filter-name>\n        <filter-class>a.Clear</filter-class>\n        <init-param>\n            <param-name>decorator-attribute</param-name>\n            <param-value>public</param-value>\n        </init-param>\n    </filter>"
        ));
    }

    #[test]
    fn missing_anchor_maps_at_end_of_chain() {
        let mut doc = parse(WEB_XML);
        let outcome = add(&mut doc, FilterPosition::After("Missing".into()), &sitemesh());

        assert_eq!(outcome, FilterInsertion::Inserted { anchored: false });
        assert_eq!(
            filter_chain(doc.root()).unwrap(),
            ["CharacterEncodingFilter", "HttpMethodFilter", "sitemeshFilter"]
        );
    }

    #[test]
    fn first_and_before_positions() {
        let mut doc = parse(WEB_XML);
        add(&mut doc, FilterPosition::First, &FilterDescriptor::new("a", "x.A", "/*"));
        add(
            &mut doc,
            FilterPosition::Before("HttpMethodFilter".into()),
            &FilterDescriptor::new("b", "x.B", "/*"),
        );
        assert_eq!(
            filter_chain(doc.root()).unwrap(),
            ["a", "CharacterEncodingFilter", "b", "HttpMethodFilter"]
        );
    }

    #[test]
    fn descriptor_without_filters() {
        let mut doc = parse("<web-app>\n  <display-name>x</display-name>\n  <servlet>\n    <servlet-name>s</servlet-name>\n  </servlet>\n</web-app>\n");
        let outcome = add(&mut doc, FilterPosition::After("HttpMethodFilter".into()), &sitemesh());
        assert_eq!(outcome, FilterInsertion::Inserted { anchored: false });

        let root = doc.root();
        let filter = root.position("filter").unwrap().unwrap();
        let mapping = root.position("filter-mapping").unwrap().unwrap();
        let servlet = root.position("servlet").unwrap().unwrap();
        assert!(filter < mapping && mapping < servlet);
    }

    #[test]
    fn untouched_content_survives() {
        let mut doc = parse(WEB_XML);
        add(&mut doc, FilterPosition::After("HttpMethodFilter".into()), &sitemesh());
        let xml = doc.to_xml_string();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\"?>\n<web-app xmlns=\"http://java.sun.com/xml/ns/javaee\" version=\"2.5\">"));
        assert!(xml.contains("<display-name>shop</display-name>"));
    }

    #[test]
    fn dispatcher_values() {
        assert_eq!(Dispatcher::Request.to_string(), "REQUEST");
        assert_eq!(Dispatcher::Error.as_str(), "ERROR");
    }
}
