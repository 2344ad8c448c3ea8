//! SiteMesh installation.
//!
//! - [`Checker`] decides whether installation is possible
//! - [`Installer`] applies it
//! - [`SitemeshOperations`] bundles both behind one handle
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use sitemesh_setup::project::{
//!     PomDependencyManager, PomMetadataReader, ProjectFileStore, ProjectLayout,
//! };
//! use sitemesh_setup::sitemesh::SitemeshOperations;
//!
//! let root = Path::new("/work/shop");
//! let files = ProjectFileStore::new(root);
//! let layout = ProjectLayout::maven(root);
//! let metadata = PomMetadataReader::new(&files, &layout, "pom.xml");
//! let dependencies = PomDependencyManager::new(&files, &layout, "pom.xml");
//!
//! let ops = SitemeshOperations::new(&files, &layout, &metadata, &dependencies);
//! if ops.is_install_sitemesh_available() {
//!     let report = ops.install_sitemesh().unwrap();
//!     println!("{} dependencies added", report.dependencies_added.len());
//! }
//! ```

pub mod checker;
pub mod installer;
pub mod mvc_config;
pub mod templates;
pub mod web_xml;

pub use checker::{Availability, Checker};
pub use installer::{FilterOutcome, InstallReport, InstallStep, Installer};
pub use mvc_config::ViewResolverSpec;
pub use web_xml::{Dispatcher, FilterDescriptor, FilterInsertion, FilterPosition};

use crate::error::Result;
use crate::project::{Dependency, DependencyManager, FileStore, MetadataReader, PathResolver};
use crate::ui::UserInterface;

/// Name of the decoration filter.
pub const SITEMESH_FILTER_NAME: &str = "sitemeshFilter";
/// Name of the filter that resets decoration for error pages.
pub const CLEAR_APPLIED_ONCE_FILTER_NAME: &str = "clearSiteMeshAppliedOnce";
/// Filter whose mapping the SiteMesh mappings follow.
pub const HTTP_METHOD_FILTER_NAME: &str = "HttpMethodFilter";

// Paths below the web application root.
pub const WEB_XML: &str = "WEB-INF/web.xml";
pub const DECORATORS_XML: &str = "WEB-INF/decorators.xml";
pub const SITEMESH_XML: &str = "WEB-INF/sitemesh.xml";
pub const DECORATORS_DIR: &str = "WEB-INF/decorators";
pub const DEFAULT_DECORATOR: &str = "WEB-INF/decorators/default.jspx";
pub const PUBLIC_DECORATOR: &str = "WEB-INF/decorators/public.jspx";
pub const WEBMVC_CONFIG: &str = "WEB-INF/spring/webmvc-config.xml";

/// View beans that conflict with JSP decoration.
pub const CONFLICTING_VIEW_BEANS: &[&str] = &[
    "org.springframework.web.servlet.view.UrlBasedViewResolver",
    "org.springframework.web.servlet.view.tiles2.TilesConfigurer",
    "org.springframework.web.servlet.view.InternalResourceViewResolver",
];

/// The dependency whose presence, in any version, means SiteMesh is installed.
pub fn sitemesh_dependency() -> Dependency {
    Dependency::new("opensymphony", "sitemesh", "2.4.2")
}

pub fn sitemesh_filter() -> FilterDescriptor {
    FilterDescriptor::new(
        SITEMESH_FILTER_NAME,
        "com.opensymphony.module.sitemesh.filter.PageFilter",
        "/*",
    )
    .with_dispatcher(Dispatcher::Request)
    .with_dispatcher(Dispatcher::Error)
}

pub fn clear_applied_once_filter() -> FilterDescriptor {
    FilterDescriptor::new(
        CLEAR_APPLIED_ONCE_FILTER_NAME,
        "org.codeconsole.sitemesh.filter.ClearSitemeshAppliedOnceFilter",
        "/*",
    )
    .with_init_param("decorator-attribute", "public")
    .with_dispatcher(Dispatcher::Error)
    .with_comment(
        "Needed for Error pages. Sets decorator for all error pages by setting request attribute decorator to public.",
    )
}

pub fn jstl_view_resolver() -> ViewResolverSpec {
    ViewResolverSpec::new("org.springframework.web.servlet.view.InternalResourceViewResolver")
        .with_property("viewClass", "org.springframework.web.servlet.view.JstlView")
        .with_property("prefix", "/WEB-INF/views/")
        .with_property("suffix", ".jspx")
}

/// Entry point for callers that want both the check and the install.
pub struct SitemeshOperations<'a> {
    files: &'a dyn FileStore,
    paths: &'a dyn PathResolver,
    metadata: &'a dyn MetadataReader,
    dependencies: &'a dyn DependencyManager,
}

impl<'a> SitemeshOperations<'a> {
    pub fn new(
        files: &'a dyn FileStore,
        paths: &'a dyn PathResolver,
        metadata: &'a dyn MetadataReader,
        dependencies: &'a dyn DependencyManager,
    ) -> Self {
        Self {
            files,
            paths,
            metadata,
            dependencies,
        }
    }

    pub fn checker(&self) -> Checker<'a> {
        Checker::new(self.metadata, self.files, self.paths)
    }

    pub fn installer(&self) -> Installer<'a> {
        Installer::new(self.files, self.paths, self.dependencies)
    }

    pub fn availability(&self) -> Availability {
        self.checker().availability()
    }

    pub fn is_install_sitemesh_available(&self) -> bool {
        self.checker().is_available()
    }

    pub fn is_install_sitemesh_available_verbose(&self, ui: &mut dyn UserInterface) -> bool {
        self.checker().is_available_verbose(ui)
    }

    /// Install without consulting the checker; see [`Installer::install`].
    pub fn install_sitemesh(&self) -> Result<InstallReport> {
        self.installer().install()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_descriptors_carry_fixed_vocabulary() {
        let sitemesh = sitemesh_filter();
        assert_eq!(sitemesh.dispatchers, [Dispatcher::Request, Dispatcher::Error]);
        assert!(sitemesh.init_params.is_empty());

        let clear = clear_applied_once_filter();
        assert_eq!(clear.dispatchers, [Dispatcher::Error]);
        assert_eq!(
            clear.init_params,
            [("decorator-attribute".to_string(), "public".to_string())]
        );
        assert!(clear.comment.is_some());
    }

    #[test]
    fn resolver_replaces_every_conflicting_class() {
        let resolver = jstl_view_resolver();
        assert!(CONFLICTING_VIEW_BEANS.contains(&resolver.class.as_str()));
        assert_eq!(resolver.properties.len(), 3);
    }
}
