//! # CLI Interface
//!
//! Defines the command-line argument structure for `slip39` using `clap`
//! derive. Supports five subcommands: `generate`, `recover`, `inspect`,
//! `words`, and `version`.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use slip39::GroupSpec;

use crate::logging::LogFormat;

/// SLIP-39 Shamir backup tool.
///
/// Splits a wallet master secret into mnemonic shares organised in groups,
/// and recovers it from a sufficient subset of them.
#[derive(Parser, Debug)]
#[command(
    name = "slip39",
    about = "SLIP-39 Shamir backup tool",
    version,
    propagate_version = true
)]
pub struct Slip39Cli {
    /// Log output format. Logs go to stderr.
    #[arg(
        long,
        global = true,
        value_enum,
        env = "SLIP39_LOG_FORMAT",
        default_value_t = LogFormat::Pretty,
        ignore_case = true
    )]
    pub log_format: LogFormat,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Split a master secret into mnemonic shares.
    Generate(GenerateArgs),
    /// Recover a master secret from mnemonic shares, one per line.
    Recover(RecoverArgs),
    /// Decode a single mnemonic and print its metadata.
    Inspect(InspectArgs),
    /// List wordlist entries starting with a prefix.
    Words(WordsArgs),
    /// Print version information and exit.
    Version,
}

/// Arguments for the `generate` subcommand.
#[derive(Parser, Debug)]
pub struct GenerateArgs {
    /// Number of groups required to recover.
    #[arg(long, short = 't', default_value_t = 1)]
    pub group_threshold: u8,

    /// A group as `T/N` (or `TofN`): N member shares, any T of which
    /// recover the group. Repeat once per group.
    #[arg(long = "group", short = 'g', value_parser = parse_group, required = true)]
    pub groups: Vec<GroupSpec>,

    /// Hex-encoded master secret. A random one is drawn when omitted.
    #[arg(long, conflicts_with = "strength")]
    pub secret: Option<String>,

    /// Strength in bits of a randomly drawn master secret.
    #[arg(long, default_value_t = 128)]
    pub strength: usize,

    /// Iteration exponent: each Feistel round runs `2500 << E` PBKDF2
    /// iterations.
    #[arg(long, short = 'e', env = "SLIP39_ITERATION_EXPONENT", default_value_t = 1)]
    pub iteration_exponent: u8,

    /// Backup identifier (0..32768). Random when omitted.
    #[arg(long)]
    pub identifier: Option<u16>,

    /// Passphrase protecting the master secret. Printable ASCII only.
    #[arg(long, env = "SLIP39_PASSPHRASE", default_value = "", hide_env_values = true)]
    pub passphrase: String,

    /// Print the mnemonics as a JSON array of groups.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `recover` subcommand.
#[derive(Parser, Debug)]
pub struct RecoverArgs {
    /// File with one mnemonic per line. Reads stdin when omitted.
    ///
    /// Blank lines and lines starting with `#` are skipped. Words may be
    /// abbreviated to their first four letters.
    #[arg(long, short = 'f')]
    pub file: Option<PathBuf>,

    /// Passphrase used when the backup was generated.
    #[arg(long, env = "SLIP39_PASSPHRASE", default_value = "", hide_env_values = true)]
    pub passphrase: String,
}

/// Arguments for the `inspect` subcommand.
#[derive(Parser, Debug)]
pub struct InspectArgs {
    /// The mnemonic to decode.
    pub mnemonic: String,

    /// Print the metadata as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `words` subcommand.
#[derive(Parser, Debug)]
pub struct WordsArgs {
    /// Prefix to complete. Lists the whole wordlist when empty.
    #[arg(default_value = "")]
    pub prefix: String,
}

/// Parse `T/N` or `TofN` into a validated [`GroupSpec`].
pub fn parse_group(s: &str) -> Result<GroupSpec, String> {
    let lower = s.to_ascii_lowercase();
    let (t, n) = lower
        .split_once('/')
        .or_else(|| lower.split_once("of"))
        .ok_or_else(|| format!("expected T/N, got `{s}`"))?;
    let threshold: u8 = t
        .trim()
        .parse()
        .map_err(|_| format!("invalid member threshold `{t}`"))?;
    let count: u8 = n
        .trim()
        .parse()
        .map_err(|_| format!("invalid member count `{n}`"))?;
    GroupSpec::new(threshold, count).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli_structure() {
        // Ensures the derive macros produce a valid CLI definition.
        Slip39Cli::command().debug_assert();
    }

    #[test]
    fn group_syntax() {
        assert_eq!(parse_group("3/5").unwrap(), GroupSpec::new(3, 5).unwrap());
        assert_eq!(parse_group("2of3").unwrap(), GroupSpec::new(2, 3).unwrap());
        assert_eq!(parse_group(" 1 / 1 ").unwrap(), GroupSpec::new(1, 1).unwrap());
        assert!(parse_group("3").is_err());
        assert!(parse_group("x/5").is_err());
        assert!(parse_group("6/5").is_err());
        assert!(parse_group("1/4").unwrap_err().contains("threshold 1"));
    }

    #[test]
    fn generate_arguments() {
        let cli = Slip39Cli::try_parse_from([
            "slip39", "generate", "-t", "2", "-g", "1/1", "-g", "2/3", "--secret",
            "000102030405060708090a0b0c0d0e0f", "--identifier", "42", "-e", "0",
        ])
        .unwrap();
        let Commands::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(args.group_threshold, 2);
        assert_eq!(args.groups.len(), 2);
        assert_eq!(args.identifier, Some(42));
        assert_eq!(args.iteration_exponent, 0);
    }

    #[test]
    fn identifier_works_with_random_secret() {
        let cli = Slip39Cli::try_parse_from([
            "slip39", "generate", "-g", "2/3", "--strength", "256", "--identifier", "42",
        ])
        .unwrap();
        let Commands::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(args.identifier, Some(42));
        assert_eq!(args.secret, None);
        assert_eq!(args.strength, 256);
    }
}
