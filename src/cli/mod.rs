// FILE: src/cli/mod.rs

mod config;
mod handlers;

use crate::error::Result;
use crate::exporters::ExportFormat;
use crate::ExportOptions;
use clap::{Arg, ArgAction, Command, ValueEnum};
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Css,
    Scss,
    Json,
    Ts,
    All,
}

impl FormatArg {
    pub fn formats(&self) -> Vec<ExportFormat> {
        match self {
            FormatArg::Css => vec![ExportFormat::Css],
            FormatArg::Scss => vec![ExportFormat::Scss],
            FormatArg::Json => vec![ExportFormat::Json],
            FormatArg::Ts => vec![ExportFormat::Typescript],
            FormatArg::All => ExportFormat::ALL.to_vec(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AnalysisFormat {
    Json,
    Debug,
}

pub struct EnhancedCli {
    config: config::ConfigFile,
    start_time: Instant,
}

impl Default for EnhancedCli {
    fn default() -> Self {
        Self::new()
    }
}

impl EnhancedCli {
    pub fn new() -> Self {
        Self {
            config: config::ConfigFile::default(),
            start_time: Instant::now(),
        }
    }

    pub fn run(&mut self) -> Result<()> {
        self.start_time = Instant::now();
        let matches = self.build_cli().get_matches();

        if let Some(config_path) = matches.get_one::<String>("config") {
            self.config = config::load(config_path)?;
        }

        setup_logging(matches.get_count("verbose"))?;

        let result = match matches.subcommand() {
            Some(("export", sub_matches)) => handlers::handle_export_command(self, sub_matches),
            Some(("check", sub_matches)) => handlers::handle_check_command(sub_matches),
            Some(("analyze", sub_matches)) => handlers::handle_analyze_command(self, sub_matches),
            _ => {
                println!("No subcommand specified. Use --help for usage information.");
                Ok(())
            }
        };

        log::debug!("Finished in {:?}", self.start_time.elapsed());
        result
    }

    fn build_cli(&self) -> Command {
        Command::new(crate::NAME)
            .version(crate::VERSION)
            .about(crate::DESCRIPTION)
            .author("Tokenc Development Team")
            .arg(
                Arg::new("config")
                    .short('c')
                    .long("config")
                    .value_name("FILE")
                    .help("Configuration file path (.json or .toml)")
                    .action(ArgAction::Set),
            )
            .arg(
                Arg::new("verbose")
                    .short('v')
                    .long("verbose")
                    .help("Increase verbosity (can be used multiple times)")
                    .action(ArgAction::Count),
            )
            .subcommand(
                Command::new("export")
                    .about("Export a variable snapshot to CSS, SCSS, JSON or TypeScript")
                    .arg(Arg::new("input").help("Input snapshot JSON file").required(true).index(1))
                    .arg(Arg::new("format").short('f').long("format").value_parser(clap::value_parser!(FormatArg)).help("Output format [default: css]"))
                    .arg(Arg::new("output").short('o').long("output").value_name("PATH").help("Output file, or directory when exporting several formats"))
                    .arg(Arg::new("selector").long("selector").value_name("SELECTOR").help("Selector of the CSS block (default :root)"))
                    .arg(Arg::new("prefix").long("prefix").value_name("PREFIX").help("Prefix prepended to every token name"))
                    .arg(Arg::new("modes-as-selectors").long("modes-as-selectors").help("Emit one CSS block per collection mode").action(ArgAction::SetTrue))
                    .arg(Arg::new("no-collection-comments").long("no-collection-comments").help("Omit collection name comments").action(ArgAction::SetTrue))
                    .arg(Arg::new("no-mode-comments").long("no-mode-comments").help("Omit mode name comments").action(ArgAction::SetTrue))
                    .arg(Arg::new("collection").short('C').long("collection").value_name("ID").help("Export only this collection (repeatable)").action(ArgAction::Append))
                    .arg(Arg::new("stats").long("stats").help("Show detailed export statistics").action(ArgAction::SetTrue))
                    .arg(Arg::new("watch").short('w').long("watch").help("Watch the input file and re-export on change").action(ArgAction::SetTrue)),
            )
            .subcommand(
                Command::new("check")
                    .about("Validate snapshot files for broken aliases and structural problems")
                    .arg(Arg::new("input").help("Input snapshot file or directory").required(true).index(1))
                    .arg(Arg::new("recursive").short('r').long("recursive").help("Check all JSON files in directory recursively").action(ArgAction::SetTrue)),
            )
            .subcommand(
                Command::new("analyze")
                    .about("Show statistics about a snapshot and its export")
                    .arg(Arg::new("input").help("Input snapshot JSON file").required(true).index(1))
                    .arg(Arg::new("output").short('o').long("output").value_name("FILE").help("Output analysis to file"))
                    .arg(Arg::new("format").short('f').long("format").value_parser(clap::value_parser!(AnalysisFormat)).default_value("debug").help("Analysis output format")),
            )
    }

    /// Config file options overridden by command-line flags
    pub fn build_export_options(&self, matches: &clap::ArgMatches) -> ExportOptions {
        let mut options = self.config.export_options();

        if let Some(selector) = matches.get_one::<String>("selector") {
            options.selector = selector.clone();
        }
        if let Some(prefix) = matches.get_one::<String>("prefix") {
            options.prefix = Some(prefix.clone()).filter(|prefix| !prefix.trim().is_empty());
        }
        if matches.get_flag("modes-as-selectors") {
            options.use_modes_as_selectors = true;
        }
        if matches.get_flag("no-collection-comments") {
            options.include_collection_comments = false;
        }
        if matches.get_flag("no-mode-comments") {
            options.include_mode_comments = false;
        }
        if let Some(collections) = matches.get_many::<String>("collection") {
            options
                .selected_collections
                .get_or_insert_with(Default::default)
                .extend(collections.cloned());
        }

        options
    }

    /// Formats from `-f`, then the config file, then CSS
    pub fn export_formats(&self, matches: &clap::ArgMatches) -> Result<Vec<ExportFormat>> {
        if let Some(format) = matches.get_one::<FormatArg>("format") {
            return Ok(format.formats());
        }
        Ok(self
            .config
            .export_formats()?
            .unwrap_or_else(|| vec![ExportFormat::Css]))
    }

    /// Export options from the config file alone
    pub fn config_export_options(&self) -> ExportOptions {
        self.config.export_options()
    }

    pub fn output_directory(&self) -> Option<&str> {
        self.config.output_directory.as_deref()
    }
}

pub fn setup_logging(verbose_count: u8) -> Result<()> {
    let log_level = match verbose_count {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .format_timestamp_secs()
        .init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn export_matches(cli: &EnhancedCli, args: &[&str]) -> clap::ArgMatches {
        let mut argv = vec!["tokenc", "export", "variables.json"];
        argv.extend_from_slice(args);
        let matches = cli.build_cli().try_get_matches_from(argv).unwrap();
        let (_, sub_matches) = matches.subcommand().unwrap();
        sub_matches.clone()
    }

    #[test]
    fn test_flags_override_defaults() {
        let cli = EnhancedCli::new();
        let matches = export_matches(
            &cli,
            &[
                "--selector", ":host",
                "--prefix", "ds",
                "--modes-as-selectors",
                "--no-mode-comments",
                "-C", "c1",
                "-C", "c2",
            ],
        );
        let options = cli.build_export_options(&matches);
        assert_eq!(options.selector, ":host");
        assert_eq!(options.prefix.as_deref(), Some("ds"));
        assert!(options.use_modes_as_selectors);
        assert!(options.include_collection_comments);
        assert!(!options.include_mode_comments);
        assert_eq!(options.selected_collections.unwrap().len(), 2);
    }

    #[test]
    fn test_format_selection() {
        let cli = EnhancedCli::new();
        let matches = export_matches(&cli, &[]);
        assert_eq!(cli.export_formats(&matches).unwrap(), vec![ExportFormat::Css]);

        let matches = export_matches(&cli, &["-f", "all"]);
        assert_eq!(cli.export_formats(&matches).unwrap(), ExportFormat::ALL.to_vec());

        let matches = export_matches(&cli, &["-f", "ts"]);
        assert_eq!(cli.export_formats(&matches).unwrap(), vec![ExportFormat::Typescript]);
    }

    #[test]
    fn test_rejects_unknown_format() {
        let cli = EnhancedCli::new();
        let result = cli
            .build_cli()
            .try_get_matches_from(["tokenc", "export", "in.json", "-f", "xml"]);
        assert!(result.is_err());
    }
}
