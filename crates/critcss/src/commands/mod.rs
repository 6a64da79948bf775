mod inspect;
mod prune;

use crate::Cli;
use crate::CommandResult;
use inspect::InspectCmd;
use prune::PruneCmd;

#[derive(Debug, clap::Parser)]
#[command(name = "critcss")]
pub(crate) enum CommandEnum {
    /// Summarize the selectors, variables and fonts of stylesheets.
    Inspect(Box<InspectCmd>),

    /// Prune a stylesheet down to a set of critical selectors.
    Prune(Box<PruneCmd>),
}
impl CommandEnum {
    pub(crate) async fn run(self, cli: Cli) -> CommandResult {
        match self {
            Self::Inspect(cmd) => cmd.run(cli).await,
            Self::Prune(cmd) => cmd.run(cli).await,
        }
    }
}
