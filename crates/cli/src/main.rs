//! Round Curve Command Line Interface
//!
//! Quotes mints and burns against a distributed-amount snapshot and inspects
//! round state for a configured curve.

mod config;

use crate::config::{init_logging, AppConfig};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use round_curve::prelude::*;
use serde_json::json;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "round-curve-cli")]
#[command(about = "Round Curve bonding-curve quoting tool", long_about = None)]
#[command(version)]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Distributed-token units issued so far (overrides config)
    #[arg(long, global = true, value_name = "AMOUNT", allow_hyphen_values = true)]
    distributed: Option<Amount>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the current round, or the state of a given round
    Round {
        #[arg(long)]
        round: Option<RoundIndex>,
    },
    /// Quote tokens received for an exact gross stable amount
    MintForStable {
        /// Gross stable units paid, fee included
        #[arg(allow_hyphen_values = true)]
        gross: Amount,
    },
    /// Quote the gross stable amount needed to mint exact tokens
    MintForTokens {
        #[arg(allow_hyphen_values = true)]
        tokens: Amount,
    },
    /// Quote net stable received for burning exact tokens
    BurnTokens {
        #[arg(allow_hyphen_values = true)]
        tokens: Amount,
    },
    /// Quote tokens to burn for an exact net stable amount
    BurnForStable {
        /// Net stable units received, fee excluded
        #[arg(allow_hyphen_values = true)]
        net: Amount,
    },
    /// Print the effective configuration
    Params,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref())?;
    init_logging(&config)?;

    let distributed = cli
        .distributed
        .clone()
        .or_else(|| config.distributed.clone())
        .unwrap_or_default();
    info!(%distributed, "Using distributed snapshot");

    let output = run(&cli.command, &config, distributed)?;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&output.json)?);
    } else {
        println!("{}", output.text);
    }
    Ok(())
}

/// A rendered command result in both output formats.
struct Output {
    text: String,
    json: serde_json::Value,
}

fn run(command: &Commands, config: &AppConfig, distributed: Amount) -> Result<Output> {
    let params = &config.params;

    match command {
        Commands::Params => Ok(Output {
            text: format_params(config),
            json: serde_json::to_value(config)?,
        }),
        Commands::Round { round } => {
            let oracle = RoundOracle::new(params, distributed)
                .context("failed to derive round state")?;
            let state = match round {
                Some(round) => oracle.round_state(*round)?,
                None => oracle.current_state()?,
            };
            let current = oracle.current_round()?;
            Ok(Output {
                text: format_round(&state, current, params),
                json: json!({
                    "current_round": current,
                    "distributed": oracle.distributed(),
                    "state": state,
                }),
            })
        }
        Commands::MintForStable { gross } => {
            quote(params, distributed, QuoteKind::MintTokensForExactStable, gross)
        }
        Commands::MintForTokens { tokens } => {
            quote(params, distributed, QuoteKind::MintStableForExactTokens, tokens)
        }
        Commands::BurnTokens { tokens } => {
            quote(params, distributed, QuoteKind::BurnExactTokensForStable, tokens)
        }
        Commands::BurnForStable { net } => {
            quote(params, distributed, QuoteKind::BurnTokensForExactStable, net)
        }
    }
}

fn quote(
    params: &CurveParams,
    distributed: Amount,
    kind: QuoteKind,
    request: &Amount,
) -> Result<Output> {
    let engine = ConversionEngine::new(params, distributed)?;
    let quote = engine
        .quote(kind, request)
        .with_context(|| format!("{kind:?} quote failed"))?;
    Ok(Output {
        text: format_quote(&quote, params),
        json: serde_json::to_value(&quote)?,
    })
}

fn format_round(state: &RoundState, current: RoundIndex, params: &CurveParams) -> String {
    let marker = if state.round == current { " (current)" } else { "" };
    format!(
        "Round {}{}\n  price:     {} stable per token\n  remaining: {} tokens\n  minted:    {} tokens",
        state.round,
        marker,
        state.price,
        state.remaining.to_scaled_string(params.dst_decimals),
        state.minted.to_scaled_string(params.dst_decimals),
    )
}

fn format_quote(quote: &Quote, params: &CurveParams) -> String {
    let decimals = params.dst_decimals;
    let tokens = quote.tokens.to_scaled_string(decimals);
    let headline = match quote.kind {
        QuoteKind::MintTokensForExactStable => {
            format!("Pay {} stable, receive {} tokens", quote.gross_stable, tokens)
        }
        QuoteKind::MintStableForExactTokens => {
            format!("Receive {} tokens for {} stable", tokens, quote.gross_stable)
        }
        QuoteKind::BurnExactTokensForStable => {
            format!("Burn {} tokens, receive {} stable", tokens, quote.net_stable)
        }
        QuoteKind::BurnTokensForExactStable => {
            format!("Receive {} stable for burning {} tokens", quote.net_stable, tokens)
        }
    };
    format!(
        "{headline}\n  amount: {}\n  fee:    {}\n  rounds: {} -> {}",
        quote.amount, quote.fee, quote.start_round, quote.end_round
    )
}

fn format_params(config: &AppConfig) -> String {
    let p = &config.params;
    let (numerator, base) = p.fee_fraction();
    format!(
        "round_volume:   {}\nprice_step:     {}\nstart_round:    {}\nbase_price:     {}\nfee_rate:       {}/{}\ndst_decimals:   {}\nlog_level:      {}\nlog_format:     {}",
        p.round_volume,
        p.price_step,
        p.start_round,
        p.base_price,
        numerator,
        base,
        p.dst_decimals,
        config.log_level,
        config.log_format,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_amount_arguments_parse() {
        let cli = Cli::try_parse_from([
            "round-curve-cli",
            "--distributed",
            "15000000000000",
            "mint-for-stable",
            "1000000",
        ])
        .unwrap();
        assert_eq!(cli.distributed, Some(Amount::from(15_000_000_000_000u64)));
        assert!(matches!(cli.command, Commands::MintForStable { ref gross } if *gross == Amount::from(1_000_000u64)));
    }

    #[test]
    fn test_negative_amount_rejected() {
        let err = Cli::try_parse_from(["round-curve-cli", "burn-tokens", "-5"])
            .err()
            .unwrap();
        assert!(err.to_string().contains("invalid input amount"));
    }

    #[test]
    fn test_mint_quote_output() {
        let config = AppConfig::default();
        let out = run(
            &Commands::MintForStable {
                gross: Amount::from(1_000_000u64),
            },
            &config,
            Amount::zero(),
        )
        .unwrap();
        assert_eq!(out.json["amount"], "9523800000000");
        assert_eq!(out.json["fee"], "47620");
        assert!(out.text.contains("receive 952380 tokens"));
    }

    #[test]
    fn test_round_output() {
        let config = AppConfig::default();
        let out = run(
            &Commands::Round { round: None },
            &config,
            Amount::from(15_000_000_000_000u64),
        )
        .unwrap();
        assert_eq!(out.json["current_round"], 2);
        assert_eq!(out.json["state"]["price"], "2");
        assert_eq!(out.json["state"]["minted"], "5000000000000");
        assert!(out.text.starts_with("Round 2 (current)"));
    }

    #[test]
    fn test_burn_beyond_supply_fails() {
        let config = AppConfig::default();
        let err = run(
            &Commands::BurnTokens {
                tokens: Amount::from(2u64),
            },
            &config,
            Amount::from(1u64),
        )
        .err()
        .unwrap();
        assert!(format!("{err:#}").contains("insufficient circulating supply"));
    }
}
