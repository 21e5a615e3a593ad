//! CLI module - Command-line interface definitions and handlers

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

use crate::backends::session::Session;
use crate::core::model::IncludeKind;
use crate::core::render::{OutputFormat, RenderConfig};
use crate::search::{SearchFlags, SearchPathConfig};

/// hsearch - resolve include names against an ordered header search path.
#[derive(Parser, Debug)]
#[command(name = "hsearch")]
#[command(
    author,
    version,
    about,
    long_about = r#"hsearch answers the question a C-family preprocessor asks for every
#include directive: which file does this name refer to?

The search path is built once from flags (-I, --iquote, --isystem, -F,
--iframework, --hmap) and/or a JSON config file, then every query is resolved
against it in order. The first location that has the file wins.

Output formats:
- jsonl: one JSON object per line (best for piping into tools)
- json: a single JSON array
- md: human-friendly Markdown
- raw: resolved paths only

Examples:
    hsearch -I include resolve stdio.h "<sys/types.h>"
    hsearch --iquote src --isystem /usr/include resolve --quoted --from src/main.c util.h
    hsearch --config search.json list
    hsearch -I include deps src/main.c --stats
"#
)]
pub struct Cli {
    /// Output format (jsonl/json/md/raw).
    #[arg(
        long,
        global = true,
        default_value = "jsonl",
        value_name = "FORMAT",
        long_help = "Select the output format for ResultSet.\n\n\
Supported values:\n\
- jsonl (default)\n\
- json\n\
- md (markdown)\n\
- raw\n\n\
Tip: Prefer jsonl when you want stable, line-oriented output for piping."
    )]
    pub format: String,

    /// Disable colored output (when applicable).
    #[arg(
        long,
        global = true,
        long_help = "Disable colored output. This is useful when piping to files or when your\n\
terminal does not support ANSI colors. Only the --stats summary is colored."
    )]
    pub no_color: bool,

    /// Quiet mode (errors only on stderr).
    #[arg(
        short,
        long,
        global = true,
        long_help = "Only log errors to stderr. Results are still printed to stdout.\n\
RUST_LOG overrides this."
    )]
    pub quiet: bool,

    /// Verbose mode (debug logging).
    #[arg(
        short,
        long,
        global = true,
        long_help = "Log debug diagnostics to stderr, including which entry answered each\n\
lookup. RUST_LOG overrides this."
    )]
    pub verbose: bool,

    /// Pretty-print JSON/JSONL output with indentation.
    #[arg(
        long,
        global = true,
        long_help = "Pretty-print JSON and JSONL output with indentation for human readability.\n\n\
Has no effect on md/raw formats."
    )]
    pub pretty: bool,

    /// Print lookup statistics to stderr.
    #[arg(
        long,
        global = true,
        long_help = "After the command, print lookup statistics (lookups, cache hits,\n\
entries probed, misses) and file-system query counts to stderr."
    )]
    pub stats: bool,

    /// JSON search-path configuration file.
    #[arg(
        long,
        global = true,
        value_name = "FILE",
        long_help = "Read the search path from a JSON file. Entries given as flags are appended\n\
after the file's entries.\n\n\
Example:\n\
  {\n\
    \"entries\": [\n\
      {\"directory\": \"src\", \"quote_only\": true},\n\
      {\"header-map\": \"build/app.hmap\"},\n\
      {\"directory\": \"/usr/include\", \"characteristic\": \"system\"}\n\
    ],\n\
    \"system_frameworks\": [\"Widgets\"]\n\
  }"
    )]
    pub config: Option<PathBuf>,

    /// Add a directory to the search path (-I).
    #[arg(short = 'I', long = "include", global = true, value_name = "DIR")]
    pub include_dirs: Vec<PathBuf>,

    /// Add a directory searched by quoted includes only.
    #[arg(long = "iquote", global = true, value_name = "DIR")]
    pub quote_dirs: Vec<PathBuf>,

    /// Add a system directory.
    #[arg(long = "isystem", global = true, value_name = "DIR")]
    pub system_dirs: Vec<PathBuf>,

    /// Add a directory of framework bundles (-F).
    #[arg(short = 'F', long = "framework-dir", global = true, value_name = "DIR")]
    pub framework_dirs: Vec<PathBuf>,

    /// Add a system directory of framework bundles.
    #[arg(long = "iframework", global = true, value_name = "DIR")]
    pub system_framework_dirs: Vec<PathBuf>,

    /// Add a JSON header map.
    #[arg(long = "hmap", global = true, value_name = "FILE")]
    pub header_maps: Vec<PathBuf>,

    /// Add a JSON header map that also answers `Framework/Header.h` by its
    /// `Header.h` key.
    #[arg(long = "index-hmap", global = true, value_name = "FILE")]
    pub index_header_maps: Vec<PathBuf>,

    /// Declare a framework name as a system framework.
    #[arg(long = "system-framework", global = true, value_name = "NAME")]
    pub system_frameworks: Vec<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve include names against the search path.
    #[command(
        long_about = "Resolve each NAME and emit one header or not-found item per name.\n\n\
A name may carry its own delimiters (\"<a.h>\" or '\"a.h\"'); otherwise --quoted\n\
selects quoted lookup and the default is angled.\n\n\
Quoted lookups first try the includer's directory (--from), then the whole list.\n\
Angled lookups start at the first non-quote-only entry.\n\n\
Examples:\n\
  hsearch -I include resolve stdio.h\n\
  hsearch --iquote src resolve --quoted --from src/main.c util.h\n"
    )]
    Resolve {
        /// Include names to resolve.
        #[arg(required = true, value_name = "NAME")]
        names: Vec<String>,

        /// Resolve as `#include "NAME"`.
        #[arg(long)]
        quoted: bool,

        /// File (or directory) issuing the include.
        #[arg(
            long,
            value_name = "PATH",
            long_help = "The file issuing the include. Quoted includes look in its directory\n\
before any search-path entry. A directory may be given instead of a file."
        )]
        from: Option<PathBuf>,

        /// Treat the includer as living in a system directory.
        #[arg(long)]
        includer_system: bool,
    },

    /// Show the effective search list in order.
    #[command(
        long_about = "Emit one entry item per search-path entry, in search order, followed by a\n\
summary item with the angled start index and the list fingerprint.\n\n\
Nonexistent directories are dropped (with a warning) before listing.\n\n\
Example:\n\
  hsearch --iquote src -I include --isystem /usr/include list --format md\n"
    )]
    List,

    /// Resolve every #include / #import directive in a source file.
    #[command(long_about = "Scan FILE for #include and #import lines and resolve each one, with FILE's\n\
directory as the includer of quoted includes. Items carry the directive's line.\n\n\
Example:\n\
  hsearch -I include deps src/main.c --stats\n")]
    Deps {
        /// Source file to scan.
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

impl Cli {
    fn search_flags(&self) -> SearchFlags {
        SearchFlags {
            quote_dirs: self.quote_dirs.clone(),
            include_dirs: self.include_dirs.clone(),
            framework_dirs: self.framework_dirs.clone(),
            system_dirs: self.system_dirs.clone(),
            system_framework_dirs: self.system_framework_dirs.clone(),
            header_maps: self.header_maps.clone(),
            index_header_maps: self.index_header_maps.clone(),
            system_frameworks: self.system_frameworks.clone(),
        }
    }

    /// Config file entries first, then flags
    pub fn search_config(&self) -> Result<SearchPathConfig> {
        let from_flags = SearchPathConfig::from_flags(&self.search_flags());
        let config = match &self.config {
            Some(path) => {
                let mut config = SearchPathConfig::from_json_file(path)?;
                config.merge(from_flags);
                config
            }
            None => from_flags,
        };
        debug!(entries = config.entries.len(), "search path configured");
        Ok(config)
    }
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    if cli.no_color {
        colored::control::set_override(false);
    }

    // Parse output format
    let format: OutputFormat = cli.format.parse().unwrap_or_default();
    let render_config = RenderConfig::with_pretty(format, cli.pretty);

    let config = cli.search_config()?;
    let session = Session::new(&config)?;

    match &cli.command {
        Commands::Resolve {
            names,
            quoted,
            from,
            includer_system,
        } => {
            let kind = if *quoted {
                IncludeKind::Quoted
            } else {
                IncludeKind::Angled
            };
            session.run(cli.stats, |list| {
                crate::backends::resolve::run_resolve(
                    list,
                    names,
                    kind,
                    from.as_deref(),
                    *includer_system,
                    render_config,
                )
            })
        }

        Commands::List => session.run(cli.stats, |list| crate::backends::list::run_list(list, render_config)),

        Commands::Deps { file } => session.run(cli.stats, |list| {
            crate::backends::deps::run_deps(list, file, render_config)
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::Location;

    #[test]
    fn test_parse_search_flags() {
        let cli = Cli::try_parse_from([
            "hsearch",
            "--iquote",
            "src",
            "-I",
            "include",
            "--isystem",
            "/usr/include",
            "resolve",
            "stdio.h",
        ])
        .unwrap();

        let config = cli.search_config().unwrap();
        assert_eq!(config.entries.len(), 3);
        assert_eq!(config.entries[0].location, Location::Directory("src".into()));
        assert!(config.entries[0].quote_only);
        assert_eq!(config.angled_start, Some(1));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["hsearch", "list", "-I", "include", "--format", "md"]).unwrap();
        assert_eq!(cli.include_dirs, vec![PathBuf::from("include")]);
        assert_eq!(cli.format, "md");
        assert!(matches!(cli.command, Commands::List));
    }

    #[test]
    fn test_resolve_requires_names() {
        assert!(Cli::try_parse_from(["hsearch", "resolve"]).is_err());
    }
}
