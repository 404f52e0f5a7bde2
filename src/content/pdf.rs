use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::OnceLock;

use log::{debug, warn};

use crate::error::SiftError;
use crate::query::PdfTool;

/// Name of the external PDF-to-text converter.
pub const PDF_UTILITY: &str = "pdftotext";

/// Runs the PDF text-extraction utility.
///
/// Lives on the [`Query`](crate::Query), so the program is located at most
/// once per query, and only when the first PDF actually needs converting.
/// A failed lookup is remembered too, so a missing utility costs one search,
/// not one per file.
#[derive(Debug, Clone)]
pub(crate) struct PdfConverter {
    tool:     PdfTool,
    resolved: OnceLock<Option<PathBuf>>,
}

impl PdfConverter {
    pub fn new(tool: PdfTool) -> Self {
        Self { tool, resolved: OnceLock::new() }
    }

    /// The resolved program, if there is one.
    pub fn program(&self) -> Option<&Path> {
        self.resolved.get_or_init(|| self.resolve()).as_deref()
    }

    fn resolve(&self) -> Option<PathBuf> {
        let found = match &self.tool {
            PdfTool::Disabled => None,
            PdfTool::At(path) => Some(path.clone()),
            PdfTool::Auto => locate(PDF_UTILITY),
        };
        match &found {
            Some(p) => debug!("using {} at {}", PDF_UTILITY, p.display()),
            None => warn!("could not find {PDF_UTILITY}; PDF text will not be searched"),
        }
        found
    }

    /// Convert `input` to text by running `<program> <input> -`.
    pub fn to_text(&self, input: &Path) -> Result<String, SiftError> {
        let program = self
            .program()
            .ok_or_else(|| SiftError::UtilityNotFound(PDF_UTILITY.to_string()))?;

        let failed = |reason: String| SiftError::ExtractionFailed {
            archive: input.to_path_buf(),
            entry:   PDF_UTILITY.to_string(),
            reason,
        };

        let output = Command::new(program)
            .arg(input)
            .arg("-")
            .stdin(Stdio::null())
            .output()
            .map_err(|e| failed(e.to_string()))?;

        if !output.stderr.is_empty() {
            debug!(
                "{} on {}: {}",
                PDF_UTILITY,
                input.display(),
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        if !output.status.success() {
            return Err(failed(format!("exited with {}", output.status)));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Next to the running executable first, then the command search path.
fn locate(cmd: &str) -> Option<PathBuf> {
    let beside = std::env::current_exe().ok().and_then(|exe| {
        let candidate = exe
            .parent()?
            .join(format!("{cmd}{}", std::env::consts::EXE_SUFFIX));
        candidate.is_file().then_some(candidate)
    });
    beside.or_else(|| which::which(cmd).ok())
}
