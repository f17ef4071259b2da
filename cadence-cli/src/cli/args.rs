//! CLI argument definitions for `cadence`.

use clap::{value_parser, Arg, ArgAction, Command};

/// Build the CLI argument parser.
pub fn build_cli() -> Command {
    Command::new("cadence")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Replay a JSON-lines message log at recorded pace")
        .arg_required_else_help(true)
        .arg(
            Arg::new("INPUT")
                .help("JSON-lines corpus with one channel/log_time/data record per line")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .value_name("PATH")
                .help("Path to a JSON file with pacer settings"),
        )
        .arg(
            Arg::new("speed")
                .long("speed")
                .value_name("FACTOR")
                .value_parser(value_parser!(f32))
                .help("Initial playback speed multiplier (overrides the config file)"),
        )
        .arg(
            Arg::new("seek")
                .long("seek")
                .short('s')
                .value_name("SECONDS")
                .value_parser(value_parser!(f64))
                .help("Start at this many seconds past the first record"),
        )
        .arg(
            Arg::new("paused")
                .long("paused")
                .action(ArgAction::SetTrue)
                .help("Start paused and wait for a play command on stdin"),
        )
        .arg(
            Arg::new("no-time")
                .long("no-time")
                .action(ArgAction::SetTrue)
                .help("Do not emit time broadcasts"),
        )
        .arg(
            Arg::new("exit-on-end")
                .long("exit-on-end")
                .action(ArgAction::SetTrue)
                .help("Exit once every record has been delivered"),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_playback_flags() {
        let argv = ["cadence", "log.jsonl", "--speed", "2.5", "--seek", "1.5", "--paused"];
        let matches = build_cli().try_get_matches_from(argv).unwrap();
        assert_eq!(matches.get_one::<String>("INPUT").unwrap(), "log.jsonl");
        assert_eq!(*matches.get_one::<f32>("speed").unwrap(), 2.5);
        assert_eq!(*matches.get_one::<f64>("seek").unwrap(), 1.5);
        assert!(matches.get_flag("paused"));
        assert!(!matches.get_flag("exit-on-end"));
    }

    #[test]
    fn rejects_non_numeric_speed() {
        let result = build_cli().try_get_matches_from(["cadence", "log.jsonl", "--speed", "fast"]);
        assert!(result.is_err());
    }
}
