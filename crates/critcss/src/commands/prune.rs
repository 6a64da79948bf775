use crate::output_utils;
use crate::Cli;
use crate::CommandResult;
use crate::RunnableCommand;
use anyhow::Context;
use indexmap::IndexSet;
use libcritcss::policy::normalize_font_family;
use libcritcss::policy::PropertyPatternFilter;
use libcritcss::policy::MAX_BASE64_LENGTH;
use libcritcss::FilterSpec;
use libcritcss::PruneOptions;
use libcritcss::StaticSelectorSource;
use libcritcss::StyleAst;
use std::path::PathBuf;
use url::Url;

#[derive(Debug, clap::Args)]
pub(crate) struct PruneCmd {
    #[arg(
        help="Url the stylesheet is served from. Relative urls in the \
             output are resolved against it.",
        long,
    )]
    base_url: Option<Url>,

    #[arg(
        help="At-rule name (without `@`) to remove wherever it appears. \
             May be repeated.",
        long="exclude-at-rule",
        value_name="NAME",
    )]
    excluded_at_rules: Vec<String>,

    #[arg(
        help="Regular expression matched against property names; matching \
             declarations are removed. May be repeated.",
        long="exclude-property",
        value_name="REGEX",
    )]
    excluded_properties: Vec<String>,

    #[arg(
        help="Font family whose `@font-face` rules are kept. When given, \
             all other `@font-face` rules are removed. May be repeated.",
        long="font",
        value_name="NAME",
    )]
    fonts: Vec<String>,

    #[arg(
        default_value_t=MAX_BASE64_LENGTH,
        help="Longest base64 `data:` url kept inline, in bytes.",
        long,
    )]
    max_base64_length: usize,

    #[arg(
        help="Write the pruned stylesheet here instead of to stdout.",
        long,
        short='o',
    )]
    output: Option<PathBuf>,

    #[arg(
        help="Also remove custom properties that nothing references.",
        long,
    )]
    prune_variables: bool,

    #[arg(
        help="File listing one critical selector per line.",
        long,
        required=true,
    )]
    selectors: PathBuf,

    #[arg(
        help="Path to the stylesheet to prune.",
        name="CSS_PATH",
    )]
    css_path: PathBuf,
}

impl PruneCmd {
    fn prune_options(&self) -> anyhow::Result<PruneOptions> {
        let mut filters = FilterSpec::new();
        if !self.excluded_properties.is_empty() {
            let filter = PropertyPatternFilter::excluding(&self.excluded_properties)
                .context("Invalid --exclude-property pattern")?;
            filters = filters.with_properties(filter);
        }

        let font_whitelist = if self.fonts.is_empty() {
            None
        } else {
            Some(
                self.fonts
                    .iter()
                    .map(|font| normalize_font_family(font))
                    .collect::<IndexSet<String>>(),
            )
        };

        Ok(PruneOptions {
            filters,
            excluded_at_rules: self.excluded_at_rules.clone(),
            font_whitelist,
            max_base64_length: self.max_base64_length,
        })
    }

    fn prune(&self) -> anyhow::Result<String> {
        let selectors_text = std::fs::read_to_string(&self.selectors)
            .with_context(|| format!("Failed to read selectors from {:#?}", self.selectors))?;
        let source = StaticSelectorSource::from_lines(&selectors_text);
        log::debug!(
            "Loaded {} critical selectors from {:#?}.",
            source.selectors().len(),
            self.selectors,
        );

        let css = std::fs::read_to_string(&self.css_path)
            .with_context(|| format!("Failed to read stylesheet {:#?}", self.css_path))?;
        let ast = StyleAst::parse_with_file_path(&css, &self.css_path)?;
        for error in ast.errors() {
            log::warn!("{}", error.format_oneline());
        }

        let options = self.prune_options()?;
        let mut pruned = ast.pruned_with(source.selectors(), &options);
        if self.prune_variables {
            let removed = pruned.prune_unused_variables_fully();
            log::debug!("Removed {removed} unused custom properties.");
        }
        if let Some(base_url) = &self.base_url {
            let rewritten = pruned.absolutify_urls(base_url);
            log::debug!("Resolved {rewritten} relative urls against `{base_url}`.");
        }

        log::info!(
            "Kept {} of {} rules ({} of {} bytes).",
            pruned.rule_count(),
            ast.rule_count(),
            pruned.to_css().len(),
            css.len(),
        );
        Ok(pruned.to_css())
    }
}

#[inherent::inherent]
impl RunnableCommand for PruneCmd {
    pub async fn run(self, _cli: Cli) -> CommandResult {
        let pruned_css = match self.prune() {
            Ok(pruned_css) => pruned_css,
            Err(e) => return CommandResult::stderr(format_args!(
                "{} Failed to prune {:#?}: {e:#}",
                output_utils::RED_X,
                self.css_path,
            )),
        };

        match &self.output {
            Some(output_path) => match std::fs::write(output_path, &pruned_css) {
                Ok(()) => {
                    log::info!("Wrote critical CSS to {output_path:#?}.");
                    CommandResult::silent()
                },
                Err(e) => CommandResult::stderr(format_args!(
                    "{} Failed to write {output_path:#?}: {e}",
                    output_utils::RED_X,
                )),
            },
            None => CommandResult::stdout(format_args!("{pruned_css}")),
        }
    }
}
