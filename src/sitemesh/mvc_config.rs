//! View-resolver edits for the Spring MVC context (`webmvc-config.xml`).

use crate::error::Result;
use crate::xml::Element;

/// A bean definition with ordered `<property>` values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewResolverSpec {
    pub class: String,
    pub properties: Vec<(String, String)>,
}

impl ViewResolverSpec {
    pub fn new(class: &str) -> Self {
        Self {
            class: class.to_string(),
            properties: Vec::new(),
        }
    }

    pub fn with_property(mut self, name: &str, value: &str) -> Self {
        self.properties.push((name.to_string(), value.to_string()));
        self
    }

    /// The `<bean>` element.
    pub fn to_element(&self) -> Element {
        self.properties.iter().fold(
            Element::new("bean").with_attribute("class", &self.class),
            |bean, (name, value)| {
                bean.with_child(
                    Element::new("property")
                        .with_attribute("name", name)
                        .with_attribute("value", value),
                )
            },
        )
    }
}

/// Remove every top-level bean of the given classes. Returns how many went.
pub fn remove_beans(beans: &mut Element, classes: &[&str]) -> Result<usize> {
    let mut removed = 0;
    for class in classes {
        let gone = beans.remove_children(&format!("bean[@class='{}']", class))?;
        if !gone.is_empty() {
            tracing::info!("Removed {} bean(s) of class {}", gone.len(), class);
        }
        removed += gone.len();
    }
    Ok(removed)
}

/// Replace all conflicting resolvers with a single `resolver` bean.
///
/// Beans of any class in `conflicting` are removed, as are existing beans of
/// the resolver's own class, before the new bean is appended. Returns the
/// number of beans removed.
pub fn replace_view_resolver(
    beans: &mut Element,
    unit: &str,
    conflicting: &[&str],
    resolver: &ViewResolverSpec,
) -> Result<usize> {
    let mut classes: Vec<&str> = conflicting.to_vec();
    if !classes.contains(&resolver.class.as_str()) {
        classes.push(&resolver.class);
    }
    let removed = remove_beans(beans, &classes)?;
    beans.append(resolver.to_element(), unit);
    tracing::info!("Added view resolver {}", resolver.class);
    Ok(removed)
}
