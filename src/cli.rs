use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "zipls")]
#[command(version)]
#[command(about = "List and extract ZIP archives", long_about = None)]
#[command(after_help = "Examples:\n  \
  zipls -l data.zip               list member names in data.zip\n  \
  zipls -v data.zip               list members with sizes and dates\n  \
  zipls data.zip a.txt -d out     extract a.txt into out/")]
pub struct Cli {
    /// ZIP file path
    #[arg(value_name = "FILE")]
    pub file: String,

    /// Members to extract (default: all)
    #[arg(value_name = "MEMBERS")]
    pub members: Vec<String>,

    /// List member names
    #[arg(short = 'l')]
    pub list: bool,

    /// List members verbosely
    #[arg(short = 'v')]
    pub verbose: bool,

    /// Extract members to stdout, no messages
    #[arg(short = 'p')]
    pub pipe: bool,

    /// Extract members into DIR
    #[arg(short = 'd', value_name = "DIR")]
    pub extract_dir: Option<String>,

    /// Exclude members that follow
    #[arg(short = 'x', value_name = "MEMBER", num_args = 1..)]
    pub exclude: Vec<String>,

    /// Never overwrite existing files
    #[arg(short = 'n')]
    pub never_overwrite: bool,

    /// Overwrite files WITHOUT prompting
    #[arg(short = 'o')]
    pub overwrite: bool,

    /// Quiet mode
    #[arg(short = 'q', action = clap::ArgAction::Count)]
    pub quiet: u8,
}

impl Cli {
    pub fn is_quiet(&self) -> bool {
        self.quiet > 0 || self.pipe
    }
}
