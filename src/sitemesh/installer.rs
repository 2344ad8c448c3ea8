//! The install pipeline.
//!
//! Four steps run in order, each reading the files it edits fresh:
//! dependency merge, template materialization, filter insertion into
//! `web.xml`, and view-resolver replacement in `webmvc-config.xml`. A step
//! that fails aborts the rest; steps already finished stay written.

use std::path::{Path, PathBuf};

use crate::error::{Result, SetupError};
use crate::project::{Dependency, DependencyManager, FileStore, LogicalPath, PathResolver};
use crate::xml::XmlDocument;

use super::mvc_config::replace_view_resolver;
use super::templates::{required_dependencies, template};
use super::web_xml::{add_filter_at_position, FilterInsertion, FilterPosition};
use super::{
    clear_applied_once_filter, jstl_view_resolver, sitemesh_filter, CONFLICTING_VIEW_BEANS,
    DECORATORS_DIR, DECORATORS_XML, DEFAULT_DECORATOR, HTTP_METHOD_FILTER_NAME, PUBLIC_DECORATOR,
    SITEMESH_XML, WEBMVC_CONFIG, WEB_XML,
};

/// One stage of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallStep {
    Dependencies,
    Templates,
    WebXml,
    MvcConfig,
}

impl InstallStep {
    /// Every step, in the order [`Installer::install`] runs them.
    pub const ALL: [InstallStep; 4] = [
        Self::Dependencies,
        Self::Templates,
        Self::WebXml,
        Self::MvcConfig,
    ];

    /// Short progress label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Dependencies => "Merging dependencies",
            Self::Templates => "Copying decorator templates",
            Self::WebXml => "Adding filters to web.xml",
            Self::MvcConfig => "Replacing view resolvers",
        }
    }
}

/// What a filter insertion did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOutcome {
    pub name: String,
    pub insertion: FilterInsertion,
}

/// Record of what an install changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallReport {
    /// Dependencies added to the manifest.
    pub dependencies_added: Vec<Dependency>,
    /// Dependencies already present in some version.
    pub dependencies_present: Vec<Dependency>,
    /// Template assets written, in write order.
    pub assets_created: Vec<PathBuf>,
    /// True when the decoration descriptor existed and templates were left alone.
    pub assets_skipped: bool,
    /// One entry per filter, in insertion order.
    pub filters: Vec<FilterOutcome>,
    /// Resolver beans removed from the MVC context.
    pub resolver_beans_removed: usize,
}

impl InstallReport {
    /// Whether a filter was newly inserted.
    pub fn filter_inserted(&self, name: &str) -> bool {
        self.filters
            .iter()
            .any(|f| f.name == name && matches!(f.insertion, FilterInsertion::Inserted { .. }))
    }
}

/// Applies SiteMesh to a project.
pub struct Installer<'a> {
    files: &'a dyn FileStore,
    paths: &'a dyn PathResolver,
    dependencies: &'a dyn DependencyManager,
}

impl<'a> Installer<'a> {
    pub fn new(
        files: &'a dyn FileStore,
        paths: &'a dyn PathResolver,
        dependencies: &'a dyn DependencyManager,
    ) -> Self {
        Self {
            files,
            paths,
            dependencies,
        }
    }

    /// Run every step.
    ///
    /// # Errors
    ///
    /// Fails with `MissingFile` if `web.xml` or `webmvc-config.xml` is
    /// absent, `XmlParse` if either is malformed, and propagates any
    /// dependency manager or file store failure.
    pub fn install(&self) -> Result<InstallReport> {
        let mut report = InstallReport::default();
        for step in InstallStep::ALL {
            self.run_step(step, &mut report)?;
        }
        Ok(report)
    }

    /// Run a single step, recording its outcome in `report`.
    pub fn run_step(&self, step: InstallStep, report: &mut InstallReport) -> Result<()> {
        tracing::debug!("{}", step.label());
        match step {
            InstallStep::Dependencies => self.merge_dependencies(report),
            InstallStep::Templates => self.materialize_templates(report),
            InstallStep::WebXml => self.insert_filters(report),
            InstallStep::MvcConfig => self.replace_view_resolvers(report),
        }
    }

    /// Add the bundled dependencies that are not already present.
    pub fn merge_dependencies(&self, report: &mut InstallReport) -> Result<()> {
        for dependency in required_dependencies()? {
            if self.dependencies.add_dependency(&dependency)? {
                report.dependencies_added.push(dependency);
            } else {
                report.dependencies_present.push(dependency);
            }
        }
        Ok(())
    }

    /// Copy the decorator templates unless the decoration descriptor exists.
    ///
    /// The descriptor is written last, so an interrupted run leaves the
    /// guard open and the next run writes the whole set again.
    pub fn materialize_templates(&self, report: &mut InstallReport) -> Result<()> {
        let guard = self.webapp(DECORATORS_XML);
        if self.files.exists(&guard) {
            tracing::debug!(
                "{} exists; leaving decorator templates alone",
                self.paths.friendly_name(&guard)
            );
            report.assets_skipped = true;
            return Ok(());
        }

        self.copy_template("sitemesh.xml", SITEMESH_XML, report)?;
        self.files.create_directory(&self.webapp(DECORATORS_DIR))?;
        self.copy_template("decorators/default.jspx", DEFAULT_DECORATOR, report)?;
        self.copy_template("decorators/public.jspx", PUBLIC_DECORATOR, report)?;
        self.copy_template("decorators.xml", DECORATORS_XML, report)?;
        Ok(())
    }

    /// Declare and map the SiteMesh filters after the HTTP method filter.
    pub fn insert_filters(&self, report: &mut InstallReport) -> Result<()> {
        let path = self.webapp(WEB_XML);
        if !self.files.exists(&path) {
            return Err(SetupError::MissingFile {
                path,
                message: "Could not acquire web.xml".to_string(),
            });
        }

        let file = self.files.update_file(&path)?;
        let mut doc = XmlDocument::parse(&path, file.contents())?;
        expect_root(&doc, &path, "web-app")?;

        let unit = doc.indent_unit();
        let position = FilterPosition::After(HTTP_METHOD_FILTER_NAME.to_string());
        for filter in [clear_applied_once_filter(), sitemesh_filter()] {
            let insertion = add_filter_at_position(doc.root_mut(), &unit, &position, &filter)?;
            report.filters.push(FilterOutcome {
                name: filter.name,
                insertion,
            });
        }

        file.commit(&doc.to_xml_string())?;
        Ok(())
    }

    /// Swap Tiles view resolution for a JSTL resolver.
    pub fn replace_view_resolvers(&self, report: &mut InstallReport) -> Result<()> {
        let path = self.webapp(WEBMVC_CONFIG);
        if !self.files.exists(&path) {
            return Err(SetupError::MissingFile {
                path,
                message: "webmvc-config.xml not found; cannot continue".to_string(),
            });
        }

        let file = self.files.update_file(&path)?;
        let mut doc = XmlDocument::parse(&path, file.contents())?;
        expect_root(&doc, &path, "beans")?;

        let unit = doc.indent_unit();
        report.resolver_beans_removed = replace_view_resolver(
            doc.root_mut(),
            &unit,
            CONFLICTING_VIEW_BEANS,
            &jstl_view_resolver(),
        )?;

        file.commit(&doc.to_xml_string())?;
        Ok(())
    }

    fn copy_template(&self, name: &str, destination: &str, report: &mut InstallReport) -> Result<()> {
        let path = self.webapp(destination);
        self.files.create_file(&path, template(name)?)?;
        report.assets_created.push(path);
        Ok(())
    }

    fn webapp(&self, relative: &str) -> PathBuf {
        self.paths.identifier(LogicalPath::SrcMainWebapp, relative)
    }
}

fn expect_root(doc: &XmlDocument, path: &Path, name: &str) -> Result<()> {
    if doc.root().name() == name {
        return Ok(());
    }
    Err(SetupError::XmlParse {
        path: path.to_path_buf(),
        message: format!(
            "expected <{}> as the root element, found <{}>",
            name,
            doc.root().name()
        ),
    })
}
