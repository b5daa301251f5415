use clap::Parser;
use std::path::PathBuf;

/// Load a presentation document, replay actions against it and report the result
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Asset list JSON (array of {id, name, description, previewUrl, duration})
    #[arg(short = 'a', long = "assets", value_name = "FILE")]
    pub assets: PathBuf,

    /// Layout JSON ({devices, regions})
    #[arg(short = 'L', long = "layout", value_name = "FILE")]
    pub layout: PathBuf,

    /// Chapter tree JSON ({id, name, tracks, chapters})
    #[arg(short = 'C', long = "chapters", value_name = "FILE")]
    pub chapters: PathBuf,

    /// JSON array of actions to replay after loading
    #[arg(short = 'x', long = "actions", value_name = "FILE")]
    pub actions: Option<PathBuf>,

    /// Write the final snapshot as JSON
    #[arg(short = 'd', long = "dump", value_name = "OUT")]
    pub dump: Option<PathBuf>,

    /// Enable debug logging to file (default: stagecraft.log)
    #[arg(short = 'l', long = "log", value_name = "LOG_FILE")]
    pub log_file: Option<Option<PathBuf>>,

    /// Increase logging verbosity (default: warn, -v: info, -vv: debug, -vvv+: trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbosity: u8,

    /// Custom configuration directory (overrides default platform paths)
    #[arg(short = 'c', long = "config-dir", value_name = "DIR")]
    pub config_dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal() {
        let args = Args::try_parse_from(["stagecraft", "-a", "a.json", "-L", "l.json", "-C", "c.json"]).unwrap();
        assert_eq!(args.assets, PathBuf::from("a.json"));
        assert!(args.actions.is_none());
        assert!(args.log_file.is_none());
        assert_eq!(args.verbosity, 0);
    }

    #[test]
    fn test_log_without_path_and_verbosity() {
        let args = Args::try_parse_from([
            "stagecraft", "--assets", "a.json", "--layout", "l.json", "--chapters", "c.json", "--log", "-vv",
        ])
        .unwrap();
        assert_eq!(args.log_file, Some(None));
        assert_eq!(args.verbosity, 2);
    }

    #[test]
    fn test_inputs_are_required() {
        assert!(Args::try_parse_from(["stagecraft", "-a", "a.json"]).is_err());
    }
}
