//! Structured document support for XML configuration files.
//!
//! - [`XmlDocument`] / [`Element`] / [`Node`] - a loss-minimising DOM
//! - [`PathExpr`] - the path expressions used to query it
//!
//! # Example
//!
//! ```
//! use std::path::Path;
//! use sitemesh_setup::xml::{Element, XmlDocument};
//!
//! let src = "<beans>\n    <bean class=\"a.B\"/>\n</beans>\n";
//! let mut doc = XmlDocument::parse(Path::new("beans.xml"), src).unwrap();
//!
//! let removed = doc.root_mut().remove_children("bean[@class='a.B']").unwrap();
//! assert_eq!(removed.len(), 1);
//!
//! let unit = doc.indent_unit();
//! doc.root_mut().append(Element::new("bean").with_attribute("class", "c.D"), &unit);
//! assert_eq!(doc.to_xml_string(), "<beans>\n    <bean class=\"c.D\"/>\n</beans>\n");
//! ```

pub mod document;
pub mod path;

pub use document::{Element, Node, XmlDocument, DEFAULT_INDENT};
pub use path::{PathExpr, Predicate, Step};
