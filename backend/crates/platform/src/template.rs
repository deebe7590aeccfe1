//! HTML Template Rendering
//!
//! Templates are loaded from disk at startup through a minijinja path
//! loader into an [`Environment`] shared read-only for the life of the process.
//!
//! Layout of the template directory:
//!
//! ```text
//! html/
//! ├── base.html          layout every page extends
//! ├── partials/*.html    fragments pulled in with {% include %}
//! └── pages/*.html       one file per page, rendered by file name
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Datelike, Utc};
use minijinja::Environment;
use serde::Serialize;
use thiserror::Error;

/// Template loading/rendering errors
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Template directory could not be listed
    #[error("Failed to read template directory {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Template source failed to compile
    #[error("Failed to compile template {name}: {source}")]
    Compile {
        name: String,
        #[source]
        source: minijinja::Error,
    },

    /// No page with this name was loaded
    #[error("Template not found: {0}")]
    NotFound(String),

    /// Rendering failed (undefined value, bad filter input, ...)
    #[error("Failed to render template {name}: {source}")]
    Render {
        name: String,
        #[source]
        source: minijinja::Error,
    },
}

/// Compiled template set
pub struct Templates {
    env: Environment<'static>,
}

impl std::fmt::Debug for Templates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.env.templates().map(|(name, _)| name).collect();
        f.debug_struct("Templates").field("templates", &names).finish()
    }
}

impl Templates {
    /// Load `base.html`, `partials/*.html` and `pages/*.html` from `dir`.
    ///
    /// Templates come from a path loader, but every file is fetched here so
    /// a missing layout or a syntax error fails startup rather than the first
    /// request that hits it.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, TemplateError> {
        let dir = dir.as_ref();
        let mut env = Environment::new();
        env.set_loader(minijinja::path_loader(dir.to_path_buf()));
        env.add_filter("human_date", human_date);

        let mut names = vec!["base.html".to_string()];
        for sub in ["partials", "pages"] {
            for name in html_files(&dir.join(sub))? {
                names.push(format!("{sub}/{name}"));
            }
        }
        for name in &names {
            compile(&env, name)?;
        }

        let pages = names.iter().filter(|name| name.starts_with("pages/")).count();
        tracing::info!(dir = %dir.display(), pages, "Templates loaded");

        Ok(Self { env })
    }

    /// Render `pages/{page}` with `ctx`
    pub fn render<S: Serialize>(&self, page: &str, ctx: &S) -> Result<String, TemplateError> {
        let name = format!("pages/{page}");
        let template = self
            .env
            .get_template(&name)
            .map_err(|_| TemplateError::NotFound(page.to_string()))?;

        template
            .render(ctx)
            .map_err(|source| TemplateError::Render { name, source })
    }
}

fn compile(env: &Environment<'static>, name: &str) -> Result<(), TemplateError> {
    match env.get_template(name) {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == minijinja::ErrorKind::TemplateNotFound => {
            Err(TemplateError::NotFound(name.to_string()))
        }
        Err(source) => Err(TemplateError::Compile {
            name: name.to_string(),
            source,
        }),
    }
}

/// `*.html` file names in `dir`, sorted. A missing directory is empty.
fn html_files(dir: &Path) -> Result<Vec<String>, TemplateError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(TemplateError::Io {
                path: dir.to_path_buf(),
                source,
            });
        }
    };

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| TemplateError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.ends_with(".html") {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}

/// `2024-03-09T17:05:00Z` -> `09 Mar 2024 at 17:05` (UTC). Empty input renders empty.
fn human_date(value: String) -> Result<String, minijinja::Error> {
    if value.is_empty() {
        return Ok(String::new());
    }

    let parsed = DateTime::parse_from_rfc3339(&value).map_err(|e| {
        minijinja::Error::new(
            minijinja::ErrorKind::InvalidOperation,
            format!("human_date expects an RFC 3339 timestamp: {e}"),
        )
    })?;

    Ok(parsed
        .with_timezone(&Utc)
        .format("%d %b %Y at %H:%M")
        .to_string())
}

// ============================================================================
// Page Data
// ============================================================================

/// Data every page receives, plus the page's own fields flattened in
#[derive(Debug, Clone, Serialize)]
pub struct PageData<T: Serialize> {
    pub flash: Option<String>,
    pub is_authenticated: bool,
    pub current_year: i32,
    #[serde(flatten)]
    pub page: T,
}

impl<T: Serialize> PageData<T> {
    pub fn new(flash: Option<String>, is_authenticated: bool, page: T) -> Self {
        Self {
            flash,
            is_authenticated,
            current_year: Utc::now().year(),
            page,
        }
    }
}
