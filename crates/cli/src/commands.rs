use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum Commands {
    /// Mask every record of the configured dataset
    Run {
        #[arg(long, help = "Settings file path")]
        config: PathBuf,

        #[arg(long, help = "Address that receives the job report")]
        initiator: Option<String>,

        #[arg(
            long,
            help = "Mask even when the environment is classified as production"
        )]
        test_invocation: bool,

        #[arg(
            long,
            help = "If specified, writes the JSON report to this file instead of stdout"
        )]
        output: Option<PathBuf>,
    },
    /// Print the resolved field mask catalog
    Catalog {
        #[arg(long, help = "Settings file path")]
        config: PathBuf,
    },
    /// Print the query of the first chunk
    Plan {
        #[arg(long, help = "Settings file path")]
        config: PathBuf,
    },
}
