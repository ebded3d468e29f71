use crate::pydantic::PydanticExtractor;
use crate::routes::RouteExtractor;
use crate::utils::{keyword, last_segment, string_constant};
use ace_core::models::ApiDefinition;
use ace_core::{ParseError, RouteDiscovery};
use anyhow::{Context, Result};
use rustpython_parser::{ast, parse, Mode};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Files that hold routes regardless of their content
const ROUTE_FILE_NAMES: [&str; 4] = ["main.py", "routes.py", "app.py", "api.py"];

/// Files scanned for Pydantic models
const SCHEMA_FILE_NAMES: [&str; 2] = ["schemas.py", "models.py"];

/// Directories never descended into
const SKIPPED_DIRS: [&str; 4] = ["__pycache__", "venv", "node_modules", "site-packages"];

/// Python source file parsed once and shared by both passes
struct SourceFile {
    path: PathBuf,
    content: String,
    body: Vec<ast::Stmt>,
}

/// Static route and model discovery for FastAPI services
///
/// Never imports or runs the service. Files are visited in sorted path
/// order so repeated runs produce the same definition.
pub struct FastApiInspector {
    pydantic: PydanticExtractor,
    routes: RouteExtractor,
}

impl FastApiInspector {
    pub fn new() -> Self {
        Self {
            pydantic: PydanticExtractor::new(),
            routes: RouteExtractor::new(),
        }
    }

    /// Recursively collects `*.py` files, skipping `_`-prefixed names
    pub fn find_python_files(dir: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        Self::collect_python_files(dir, &mut files)?;
        files.sort();
        Ok(files)
    }

    fn collect_python_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
        let entries = std::fs::read_dir(dir)
            .with_context(|| format!("Failed to read directory: {}", dir.display()))?;

        for entry in entries {
            let path = entry?.path();
            let name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default();

            if path.is_dir() {
                if !name.starts_with('.') && !SKIPPED_DIRS.contains(&name) {
                    Self::collect_python_files(&path, files)?;
                }
            } else if path.extension().is_some_and(|ext| ext == "py") && !name.starts_with('_') {
                files.push(path);
            }
        }

        Ok(())
    }

    fn file_name(path: &Path) -> &str {
        path.file_name().and_then(|n| n.to_str()).unwrap_or_default()
    }

    fn is_schema_file(path: &Path) -> bool {
        SCHEMA_FILE_NAMES.contains(&Self::file_name(path))
    }

    fn is_route_file(file: &SourceFile) -> bool {
        ROUTE_FILE_NAMES.contains(&Self::file_name(&file.path))
            || file.content.contains("@app.")
            || file.content.contains("@router.")
    }

    fn load(path: &Path) -> Option<SourceFile> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                warn!(file = %path.display(), error = %err, "Skipping unreadable Python file");
                return None;
            }
        };

        match parse(&content, Mode::Module, &path.to_string_lossy()) {
            Ok(ast::Mod::Module(module)) => Some(SourceFile {
                path: path.to_path_buf(),
                content,
                body: module.body,
            }),
            Ok(_) => None,
            Err(err) => {
                let err = ParseError::Python {
                    file: path.display().to_string(),
                    message: err.to_string(),
                };
                warn!(error = %err, "Skipping unparsable Python file");
                None
            }
        }
    }

    /// Title, version and description from `FastAPI(...)`, when declared literally
    fn app_metadata(files: &[SourceFile]) -> Option<(Option<String>, Option<String>, Option<String>)> {
        files.iter().flat_map(|file| &file.body).find_map(|stmt| {
            let ast::Stmt::Assign(assign) = stmt else {
                return None;
            };
            let ast::Expr::Call(call) = assign.value.as_ref() else {
                return None;
            };
            if last_segment(&call.func).as_deref() != Some("FastAPI") {
                return None;
            }
            let text = |name: &str| {
                keyword(call, name)
                    .and_then(string_constant)
                    .map(str::to_string)
            };
            Some((text("title"), text("version"), text("description")))
        })
    }
}

impl Default for FastApiInspector {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteDiscovery for FastApiInspector {
    fn framework(&self) -> &str {
        "fastapi"
    }

    fn discover(&self, source: &Path) -> Result<ApiDefinition> {
        if !source.is_dir() {
            anyhow::bail!("Service path is not a directory: {}", source.display());
        }

        let files: Vec<SourceFile> = Self::find_python_files(source)?
            .iter()
            .filter_map(|path| Self::load(path))
            .collect();
        debug!(files = files.len(), service = %source.display(), "Parsed Python sources");

        let service_name = source
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "service".to_string());
        let (title, version, description) = Self::app_metadata(&files).unwrap_or_default();
        let mut definition = ApiDefinition::new(
            title.unwrap_or(service_name),
            version.unwrap_or_else(|| "0.0.0".to_string()),
        )
        .with_description(description.unwrap_or_default());

        let schema_modules = files
            .iter()
            .filter(|f| Self::is_schema_file(&f.path))
            .map(|f| (f.path.as_path(), f.body.as_slice()));
        self.pydantic.extract_modules(schema_modules, &mut definition);

        let mut endpoints = Vec::new();
        for file in files.iter().filter(|f| Self::is_route_file(f)) {
            endpoints.extend(self.routes.extract(&file.body, &file.path, &definition));
        }
        for endpoint in endpoints {
            definition.add_endpoint(endpoint);
        }

        info!(
            framework = self.framework(),
            endpoints = definition.endpoints().len(),
            schemas = definition.schemas().len(),
            "Service discovery finished"
        );

        Ok(definition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_find_python_files_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        for file in [
            "routes.py",
            "app/main.py",
            "app/__init__.py",
            "_private.py",
            ".venv/lib.py",
            "__pycache__/cached.py",
            "README.md",
        ] {
            let path = dir.path().join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, "").unwrap();
        }

        let files = FastApiInspector::find_python_files(dir.path()).unwrap();
        let relative: Vec<PathBuf> = files
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            relative,
            vec![PathBuf::from("app/main.py"), PathBuf::from("routes.py")]
        );
    }

    #[test]
    fn test_discover_rejects_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(FastApiInspector::new().discover(&missing).is_err());
    }
}
