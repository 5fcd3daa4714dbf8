use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use datadiff_scan::ChangeKind;
use datadiff_session::ContentType;

#[derive(Parser)]
#[command(
    name = "datadiff",
    about = "datadiff - compare game-data folders and inspect file differences",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Settings file (default: ./datadiff.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// List files the mod folder adds or replaces
    Scan(ScanArgs),
    /// Compare two files line by line, or by their content type
    Diff(DiffArgs),
    /// Compare two tab-delimited files row by row
    Table(TableArgs),
    /// Get or set configuration
    Config(ConfigArgs),
}

#[derive(Args)]
pub struct ScanArgs {
    /// Original folder (default: the last one used)
    pub base: Option<PathBuf>,
    /// Mod folder (default: the last one used)
    #[arg(value_name = "MOD")]
    pub mod_dir: Option<PathBuf>,
    #[arg(long)]
    pub kind: Option<KindArg>,
    /// Only paths ending in this extension
    #[arg(long)]
    pub ext: Option<String>,
    /// Case-insensitive text to look for in path or detail
    #[arg(long)]
    pub search: Option<String>,
    #[arg(long, default_value = "1")]
    pub page: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum KindArg {
    New,
    Changed,
    Error,
}

impl From<KindArg> for ChangeKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::New => ChangeKind::New,
            KindArg::Changed => ChangeKind::Changed,
            KindArg::Error => ChangeKind::ComparisonError,
        }
    }
}

#[derive(Args)]
pub struct DiffArgs {
    pub left: PathBuf,
    pub right: PathBuf,
    #[arg(long)]
    pub only_diff: bool,
    /// Compare as this content type instead of the one the extension implies
    #[arg(long = "as", value_name = "TYPE")]
    pub as_type: Option<TypeArg>,
    /// Compare top-level JSON entries by key or index
    #[arg(long, conflicts_with = "as_type")]
    pub keyed: bool,
}

impl DiffArgs {
    /// Content type forced by `--as` or `--keyed`, if any.
    pub fn forced_type(&self) -> Option<ContentType> {
        if self.keyed {
            Some(ContentType::JsonEntries)
        } else {
            self.as_type.map(Into::into)
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum TypeArg {
    Text,
    Json,
    Table,
    Sprite,
    Binary,
}

impl From<TypeArg> for ContentType {
    fn from(t: TypeArg) -> Self {
        match t {
            TypeArg::Text => ContentType::Text,
            TypeArg::Json => ContentType::Json,
            TypeArg::Table => ContentType::Table,
            TypeArg::Sprite => ContentType::Sprite,
            TypeArg::Binary => ContentType::Binary,
        }
    }
}

#[derive(Args)]
pub struct TableArgs {
    pub left: PathBuf,
    pub right: PathBuf,
    #[arg(long)]
    pub only_diff: bool,
    #[arg(long, default_value = "")]
    pub search: String,
    #[arg(long)]
    pub whole_word: bool,
    /// Show one merged table instead of both sides
    #[arg(long)]
    pub merged: bool,
}

#[derive(Args)]
pub struct ConfigArgs {
    /// Setting to show or change; all settings when omitted
    pub key: Option<String>,
    /// New value; an empty string resets the setting
    pub value: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_scan() {
        let cli = Cli::try_parse_from(["datadiff", "scan", "orig", "mod"]).unwrap();
        if let Command::Scan(args) = cli.command {
            assert_eq!(args.base, Some(PathBuf::from("orig")));
            assert_eq!(args.mod_dir, Some(PathBuf::from("mod")));
            assert_eq!(args.page, 1);
            assert!(args.kind.is_none());
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_scan_filters() {
        let cli = Cli::try_parse_from([
            "datadiff", "scan", "--kind", "error", "--ext", ".json", "--search", "armor", "--page", "3",
        ])
        .unwrap();
        if let Command::Scan(args) = cli.command {
            assert!(args.base.is_none());
            assert_eq!(args.kind, Some(KindArg::Error));
            assert_eq!(ChangeKind::from(KindArg::Error), ChangeKind::ComparisonError);
            assert_eq!(args.ext.as_deref(), Some(".json"));
            assert_eq!(args.search.as_deref(), Some("armor"));
            assert_eq!(args.page, 3);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_diff_as() {
        let cli = Cli::try_parse_from(["datadiff", "diff", "a.txt", "b.txt", "--as", "table", "--only-diff"]).unwrap();
        if let Command::Diff(args) = cli.command {
            assert_eq!(args.as_type, Some(TypeArg::Table));
            assert!(args.only_diff);
            assert_eq!(ContentType::from(TypeArg::Table), ContentType::Table);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_diff_keyed() {
        let cli = Cli::try_parse_from(["datadiff", "diff", "a.json", "b.json", "--keyed"]).unwrap();
        if let Command::Diff(args) = cli.command {
            assert!(args.keyed);
            assert_eq!(args.forced_type(), Some(ContentType::JsonEntries));
        } else { panic!("wrong command"); }

        let cli = Cli::try_parse_from(["datadiff", "diff", "a.json", "b.json"]).unwrap();
        if let Command::Diff(args) = cli.command {
            assert_eq!(args.forced_type(), None);
        } else { panic!("wrong command"); }

        assert!(Cli::try_parse_from(["datadiff", "diff", "a", "b", "--keyed", "--as", "text"]).is_err());
    }

    #[test]
    fn parse_diff_needs_two_paths() {
        assert!(Cli::try_parse_from(["datadiff", "diff", "a.txt"]).is_err());
    }

    #[test]
    fn parse_table() {
        let cli = Cli::try_parse_from([
            "datadiff", "table", "a.tsv", "b.tsv", "--search", "cat", "--whole-word", "--merged",
        ])
        .unwrap();
        if let Command::Table(args) = cli.command {
            assert_eq!(args.search, "cat");
            assert!(args.whole_word);
            assert!(args.merged);
            assert!(!args.only_diff);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_config_set() {
        let cli = Cli::try_parse_from(["datadiff", "config", "page_size", "50"]).unwrap();
        if let Command::Config(args) = cli.command {
            assert_eq!(args.key.as_deref(), Some("page_size"));
            assert_eq!(args.value.as_deref(), Some("50"));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::try_parse_from([
            "datadiff", "--verbose", "--format", "json", "--config", "my.toml", "config",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.format, OutputFormat::Json));
        assert_eq!(cli.config, Some(PathBuf::from("my.toml")));
    }
}
