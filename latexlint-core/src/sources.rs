use crate::error::{LintError, LintResult};
use crate::types::SourceDocument;
use std::fs;
use std::path::{Path, PathBuf};

/// Finder metadata file that never holds rules or sources.
const IGNORED_FILE_NAMES: [&str; 1] = [".DS_Store"];

/// Marker an input argument must contain to be treated as a LaTeX source.
pub const TEX_MARKER: &str = ".tex";

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> LintError + '_ {
    move |source| LintError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Regular files directly inside `dir`, sorted by name.
pub fn list_files(dir: &Path) -> LintResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_error(dir))? {
        let entry = entry.map_err(io_error(dir))?;
        let path = entry.path();
        let ignored = IGNORED_FILE_NAMES
            .iter()
            .any(|name| entry.file_name() == *name);
        if path.is_file() && !ignored {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Every line of every rule-set file in `dirs`, trimmed, in directory order.
pub fn read_rule_lines<P: AsRef<Path>>(dirs: &[P]) -> LintResult<Vec<String>> {
    let mut lines = Vec::new();
    for dir in dirs {
        for file in list_files(dir.as_ref())? {
            tracing::debug!("Reading rules from {}", file.display());
            let content = fs::read_to_string(&file).map_err(io_error(&file))?;
            lines.extend(content.lines().map(|line| line.trim().to_string()));
        }
    }
    Ok(lines)
}

/// Default rule-set directory: `dir_name` under the user's home directory.
pub fn default_rules_dir(home: &Path, dir_name: &str) -> PathBuf {
    home.join(dir_name)
}

/// Input paths resolved from command-line arguments.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct DiscoveredInputs {
    /// Files to lint, in argument order (directory contents sorted)
    pub files: Vec<String>,
    /// `.tex` arguments that are neither a file nor a directory
    pub invalid: Vec<String>,
}

/// Resolve arguments to source files. Arguments without `.tex` in them are
/// ignored; directories contribute their top-level files.
pub fn discover_inputs<S: AsRef<str>>(args: &[S]) -> LintResult<DiscoveredInputs> {
    let mut inputs = DiscoveredInputs::default();
    for arg in args {
        let arg: &str = arg.as_ref();
        if !arg.contains(TEX_MARKER) {
            continue;
        }
        let path = Path::new(arg);
        if path.is_file() {
            inputs.files.push(arg.to_string());
        } else if path.is_dir() {
            for file in list_files(path)? {
                inputs.files.push(file.display().to_string());
            }
        } else {
            inputs.invalid.push(arg.to_string());
        }
    }
    Ok(inputs)
}

/// Read a source file into a document named after `path`.
pub fn read_document(path: &str) -> LintResult<SourceDocument> {
    let content = fs::read_to_string(path).map_err(io_error(Path::new(path)))?;
    Ok(SourceDocument::from_text(path, &content))
}
