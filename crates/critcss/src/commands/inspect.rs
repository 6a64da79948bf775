use crate::output_utils;
use crate::Cli;
use crate::CommandResult;
use crate::RunnableCommand;
use libcritcss::StyleAst;
use std::collections::HashSet;
use std::error::Error;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::task::JoinSet;
use walkdir::WalkDir;

#[derive(Debug, clap::Args)]
pub(crate) struct InspectCmd {
    #[arg(
        default_values_t=["css".to_string()],
        help="Set of file extensions to filter to when searching for files \
             within a directory.",
        long,
        value_delimiter = ',',
    )]
    css_file_exts: Vec<String>,

    #[arg(
        help="Paths to one or more CSS files or directories containing CSS \
             files which need to be inspected.",
        name="FILE_OR_DIR_PATHS",
        required=true,
    )]
    file_or_dir_paths: Vec<PathBuf>,
}

/// What `inspect` reports about one stylesheet.
#[derive(Debug)]
struct StylesheetReport {
    path: PathBuf,
    rule_count: usize,
    selectors: Vec<String>,
    used_variables: Vec<String>,
    used_fonts: Vec<String>,
    declared_fonts: Vec<String>,
    diagnostics: Vec<String>,
}

impl StylesheetReport {
    fn from_file(path: PathBuf) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let css = std::fs::read(&path)?;
        let css = std::str::from_utf8(&css)?;
        let ast = StyleAst::parse_with_file_path(css, &path)?;

        let mut selectors = vec![];
        ast.for_each_selector(|selector| selectors.push(selector.to_string()));
        Ok(Self {
            rule_count: ast.rule_count(),
            selectors,
            used_variables: ast.get_used_variables().into_iter().collect(),
            used_fonts: ast.get_used_font_families().into_iter().collect(),
            declared_fonts: ast.get_declared_font_families().into_iter().collect(),
            diagnostics: ast.errors().iter().map(|e| e.format_oneline()).collect(),
            path,
        })
    }

    fn render(&self) -> String {
        let marker = if self.diagnostics.is_empty() {
            output_utils::GREEN_CHECK
        } else {
            output_utils::WARNING_SIGN
        };
        let mut out = format!(
            concat!(
                "{} {}\n",
                "  * {} rules, {} selectors.\n",
                "  * Selectors: {}\n",
                "  * Used variables: {}\n",
                "  * Used fonts: {}\n",
                "  * Declared fonts: {}",
            ),
            marker,
            self.path.display(),
            self.rule_count,
            self.selectors.len(),
            output_utils::join_or_none(&self.selectors),
            output_utils::join_or_none(&self.used_variables),
            output_utils::join_or_none(&self.used_fonts),
            output_utils::join_or_none(&self.declared_fonts),
        );
        for diagnostic in &self.diagnostics {
            out.push_str("\n    ");
            out.push_str(diagnostic);
        }
        out
    }
}

impl InspectCmd {
    /// Finds every CSS file at or under the paths given as args.
    fn collect_file_paths(
        &self,
        errors: &mut Vec<Box<dyn Error + Send + Sync>>,
    ) -> Vec<PathBuf> {
        // Normalize the set of file extensions to filter with
        let css_file_exts: HashSet<String> =
            self.css_file_exts.iter()
                .map(|ext| ext.trim_start_matches('.').to_ascii_lowercase())
                .collect();

        log::debug!(
            "Scanning {} input paths...",
            self.file_or_dir_paths.len(),
        );
        let mut file_paths = vec![];
        for path in &self.file_or_dir_paths {
            for entry in WalkDir::new(path.as_path()).follow_links(true).sort_by_file_name() {
                match entry {
                    Ok(entry) => {
                        let path = entry.path();
                        if entry.file_type().is_file() {
                            log::trace!("Found file at {path:#?}.");
                            if has_css_ext(path, &css_file_exts) {
                                file_paths.push(path.to_path_buf());
                            }
                        } else {
                            log::trace!("Skipping non-file: {path:#?}.");
                        }
                    },

                    Err(e) => {
                        log::trace!(
                            "Encountered an error while iterating recursive \
                            filesystem entities at/under {path:#?}."
                        );
                        errors.push(Box::new(e));
                    },
                }
            }
        }

        // A single file named explicitly is inspected whatever its
        // extension.
        if file_paths.is_empty()
            && errors.is_empty()
            && let [only_path] = self.file_or_dir_paths.as_slice()
            && only_path.is_file() {
            log::warn!(
                "Proceeding to inspect {only_path:#?} even though it doesn't \
                match any of the --css-file-exts ({}).",
                css_file_exts.iter()
                    .map(|ext| format!("`.{ext}`"))
                    .collect::<Vec<_>>()
                    .join(", "),
            );
            file_paths.push(only_path.to_owned());
        }

        file_paths
    }
}

fn has_css_ext(path: &Path, css_file_exts: &HashSet<String>) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .is_some_and(|ext| css_file_exts.contains(&ext))
}

#[inherent::inherent]
impl RunnableCommand for InspectCmd {
    pub async fn run(self, _cli: Cli) -> CommandResult {
        let mut errors: Vec<Box<dyn Error + Send + Sync>> = vec![];
        let file_paths = self.collect_file_paths(&mut errors);
        log::debug!("Found {} CSS files to inspect.", file_paths.len());

        let mut tasks = JoinSet::new();
        for (index, path) in file_paths.into_iter().enumerate() {
            tasks.spawn_blocking(move || (index, StylesheetReport::from_file(path.clone()), path));
        }

        let mut reports = vec![];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, Ok(report), _)) => reports.push((index, report)),
                Ok((_, Err(e), path)) => {
                    errors.push(format!("{}: {e}", path.display()).into());
                },
                Err(e) => errors.push(Box::new(e)),
            }
        }
        reports.sort_by_key(|(index, _)| *index);

        let mut out = reports
            .iter()
            .map(|(_, report)| report.render())
            .collect::<Vec<_>>()
            .join("\n");
        let diagnostic_count: usize =
            reports.iter().map(|(_, report)| report.diagnostics.len()).sum();
        out.push_str(&format!(
            "\n\nInspected {} stylesheets ({diagnostic_count} diagnostics).",
            reports.len(),
        ));

        if errors.is_empty() {
            return CommandResult::stdout(format_args!("{}", out.trim_start()));
        }

        let error_lines = errors
            .iter()
            .map(|e| format!("  * {e}"))
            .collect::<Vec<_>>()
            .join("\n");
        let mut result = CommandResult::stdout(format_args!("{}", out.trim_start()))
            .with_exit_code(ExitCode::FAILURE);
        result.stderr = Some(format!(
            "{} Failed to inspect some inputs:\n{error_lines}",
            output_utils::RED_X,
        ));
        result
    }
}
