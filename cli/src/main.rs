// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # SLIP-39 Command Line Tool
//!
//! Entry point for the `slip39` binary. Parses CLI arguments, initializes
//! logging, and runs one of:
//!
//! - `generate`: split a master secret into mnemonic shares
//! - `recover`: recover the master secret from shares on stdin or a file
//! - `inspect`: decode one share and print its metadata
//! - `words`: complete a prefix against the wordlist
//! - `version`: print build version information

mod cli;
mod logging;

use std::fs;
use std::io::{self, Read};

use anyhow::{bail, Context, Result};
use clap::Parser;
use rand::rngs::OsRng;
use zeroize::Zeroizing;

use slip39::encoding::{expand_prefix, word_index, words_with_prefix};
use slip39::{
    check_single_share, generate_mnemonics, generate_mnemonics_random, RecoverySession, ShareInfo,
};

use cli::{Commands, Slip39Cli};
use logging::LOG_TARGET;

/// Progress from the binary at `info`. Library events are only interesting
/// when asked for via `RUST_LOG`.
const DEFAULT_LOG_FILTER: &str = "slip39_cli=info,slip39=warn";

fn main() -> Result<()> {
    let cli = Slip39Cli::parse();

    if let Commands::Version = cli.command {
        print_version();
        return Ok(());
    }
    logging::init_logging(DEFAULT_LOG_FILTER, cli.log_format);

    match cli.command {
        Commands::Generate(args) => generate(args),
        Commands::Recover(args) => recover(args),
        Commands::Inspect(args) => inspect(args),
        Commands::Words(args) => {
            for word in words_with_prefix(&args.prefix.to_lowercase()) {
                println!("{word}");
            }
            Ok(())
        }
        Commands::Version => Ok(()),
    }
}

/// Split a given or freshly drawn master secret and print the mnemonics.
fn generate(args: cli::GenerateArgs) -> Result<()> {
    let passphrase = Zeroizing::new(args.passphrase);

    let mnemonics = match &args.secret {
        Some(secret_hex) => {
            let secret = Zeroizing::new(
                hex::decode(secret_hex.trim()).context("master secret must be hex-encoded")?,
            );
            generate_mnemonics(
                &mut OsRng,
                &secret,
                args.iteration_exponent,
                args.identifier,
                passphrase.as_bytes(),
                args.group_threshold,
                &args.groups,
            )
        }
        None => generate_mnemonics_random(
            &mut OsRng,
            args.strength,
            args.iteration_exponent,
            args.identifier,
            passphrase.as_bytes(),
            args.group_threshold,
            &args.groups,
        ),
    }
    .context("failed to generate mnemonics")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&mnemonics)?);
        return Ok(());
    }

    println!(
        "{} of {} groups required to recover:",
        args.group_threshold,
        mnemonics.len()
    );
    for (i, (group, spec)) in mnemonics.iter().zip(&args.groups).enumerate() {
        println!();
        println!(
            "Group {} of {} - {} of {} shares required:",
            i + 1,
            mnemonics.len(),
            spec.member_threshold,
            spec.member_count
        );
        for mnemonic in group {
            println!("{mnemonic}");
        }
    }
    Ok(())
}

/// Feed shares into a recovery session one line at a time and print the
/// master secret as hex.
fn recover(args: cli::RecoverArgs) -> Result<()> {
    let passphrase = Zeroizing::new(args.passphrase);

    let input = Zeroizing::new(match &args.file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read shares from {}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read shares from stdin")?;
            buf
        }
    });

    let mut session = RecoverySession::new();
    for (line_no, line) in input.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mnemonic = Zeroizing::new(expand_words(line));
        let progress = session
            .add_mnemonic(&mnemonic)
            .with_context(|| format!("share on line {} rejected", line_no + 1))?;
        tracing::info!(
            target: LOG_TARGET,
            groups_complete = progress.groups_complete,
            group_threshold = progress.group_threshold,
            "share accepted"
        );
    }

    let progress = session.progress();
    if progress.groups.is_empty() {
        bail!("no shares provided");
    }
    if !progress.is_complete() {
        for group in &progress.groups {
            tracing::warn!(
                target: LOG_TARGET,
                group = group.group_index,
                remaining = group.remaining(),
                "group incomplete"
            );
        }
    }

    let secret = session
        .recover(passphrase.as_bytes())
        .context("failed to recover master secret")?;
    println!("{}", Zeroizing::new(hex::encode(secret.as_slice())).as_str());
    Ok(())
}

/// Expand unique four-letter prefixes to full words. Tokens that are neither
/// words nor unique prefixes are passed through for the decoder to reject.
fn expand_words(line: &str) -> String {
    line.split_whitespace()
        .map(|token| {
            let lower = token.to_lowercase();
            if word_index(&lower).is_some() {
                lower
            } else {
                expand_prefix(&lower).map(str::to_owned).unwrap_or(lower)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn inspect(args: cli::InspectArgs) -> Result<()> {
    let info = check_single_share(&expand_words(&args.mnemonic)).context("invalid share")?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        print_share_info(&info);
    }
    Ok(())
}

fn print_share_info(info: &ShareInfo) {
    println!("identifier          {}", info.identifier);
    println!("iteration exponent  {}", info.iteration_exponent);
    println!(
        "group               {} ({} of {} required)",
        info.group_index + 1,
        info.group_threshold,
        info.group_count
    );
    println!(
        "member              {} ({} required)",
        info.member_index + 1,
        info.member_threshold
    );
    println!("secret length       {} bits", info.value_length * 8);
}

fn print_version() {
    println!("slip39 {}", env!("CARGO_PKG_VERSION"));
    println!("rustc  {}", rustc_version());
}

/// Returns the Rust compiler version used to build this binary.
fn rustc_version() -> &'static str {
    option_env!("RUSTC_VERSION").unwrap_or("unknown")
}
