use alloy_primitives::Address;
use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

use dexpath::application::{LiquidityService, QuoteRequest, QuoteService, TradeDirection};
use dexpath::domain::chain::{ChainConfig, ChainResolver};
use dexpath::domain::execution::approve_calldata;
use dexpath::infrastructure::blockchain::EvmRpcReader;
use dexpath::shared::config::{ConfigLoader, Settings};
use dexpath::shared::errors::ConfigError;
use dexpath::shared::types::{build_native_token, Token, TokenList};
use dexpath::shared::utils::{format_route, format_units, parse_units};

#[derive(Parser, Debug)]
#[command(version, about = "Multi-hop swap quotes for constant-product AMM pools")]
struct Args {
    /// Chain configuration document (JSON)
    #[arg(long)]
    chain_config: PathBuf,

    /// Token list document (JSON)
    #[arg(long)]
    token_list: PathBuf,

    /// Network to quote on (defaults to the document's defaultNetworkId)
    #[arg(long)]
    chain_id: Option<u64>,

    /// Source token symbol or address
    #[arg(long, required_unless_present = "list_pools")]
    from: Option<String>,

    /// Destination token symbol or address
    #[arg(long, required_unless_present = "list_pools")]
    to: Option<String>,

    /// Decimal amount; input amount, or output amount with --exact-out
    #[arg(long, required_unless_present = "list_pools")]
    amount: Option<String>,

    /// Quote buying exactly --amount of the destination token
    #[arg(long)]
    exact_out: bool,

    /// Slippage tolerance in percent (overrides settings)
    #[arg(long)]
    slippage_pct: Option<f64>,

    /// Settings file (TOML)
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Print router calldata for a swap paying out to this address
    #[arg(long)]
    recipient: Option<Address>,

    /// List the factory's pools with LP statistics instead of quoting
    #[arg(long)]
    list_pools: bool,

    /// Account whose LP share --list-pools reports
    #[arg(long)]
    account: Option<Address>,
}

/// Token by symbol or address; the chain's currency symbol selects the native coin
fn lookup_token(tokens: &TokenList, chain: &ChainConfig, needle: &str) -> Result<Token> {
    if let Some(token) = tokens.find(chain.chain_id, needle) {
        return Ok(token.clone());
    }
    if needle.trim().eq_ignore_ascii_case(&chain.currency.symbol) {
        return Ok(build_native_token(chain.chain_id, &chain.currency));
    }
    Err(anyhow!("Unknown token {} on chain {}", needle, chain.chain_id))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let args = Args::parse();

    let mut settings = match &args.settings {
        Some(path) => ConfigLoader::load_settings(path)?,
        None => Settings::default(),
    };
    if let Some(pct) = args.slippage_pct {
        settings.slippage_pct = pct;
    }

    let chains = ChainResolver::from_file(&args.chain_config)?;
    let chain_id = chains.effective_network_id(args.chain_id);
    let chain = chains.resolve(chain_id).ok_or(ConfigError::UnknownChain(chain_id))?;
    if chain.factory().is_none() {
        return Err(ConfigError::MissingContract {
            chain_id,
            contract: "factory",
        }
        .into());
    }
    let tokens = ConfigLoader::load_token_list(&args.token_list)?;
    let reader = Arc::new(EvmRpcReader::with_timeout(
        chain.rpc_url.clone(),
        Duration::from_millis(settings.rpc_timeout_ms),
    )?);
    info!("Using {} (chain {}) via {}", chain.name, chain_id, chain.rpc_url);

    if args.list_pools {
        let service = LiquidityService::new(reader, Arc::new(chains), &settings);
        let chain_tokens = tokens.for_chain(chain_id);
        for row in service.overview(chain_id, args.account).await {
            let label = format!(
                "{} / {}",
                format_route(&[row.info.token0], &chain_tokens),
                format_route(&[row.info.token1], &chain_tokens)
            );
            match row.stats {
                Some(stats) => {
                    let user = stats.user_pct.map(|pct| format!("  yours {:.2}%", pct)).unwrap_or_default();
                    println!(
                        "{:#x}  {}  reserves {} / {}  burned {:.2}%{}",
                        row.info.pair, label, stats.reserve0, stats.reserve1, stats.burned_pct, user
                    );
                }
                None => println!("{:#x}  {}  unavailable", row.info.pair, label),
            }
        }
        return Ok(());
    }

    let from = lookup_token(&tokens, &chain, args.from.as_deref().unwrap_or_default())?;
    let to = lookup_token(&tokens, &chain, args.to.as_deref().unwrap_or_default())?;
    let direction = if args.exact_out {
        TradeDirection::ExactOut
    } else {
        TradeDirection::ExactIn
    };
    let amount_decimals = match direction {
        TradeDirection::ExactIn => from.decimals,
        TradeDirection::ExactOut => to.decimals,
    };
    let amount = parse_units(args.amount.as_deref().unwrap_or_default(), amount_decimals).context("invalid --amount")?;

    let service = QuoteService::new(reader, Arc::new(chains), tokens, &settings);

    let request = QuoteRequest {
        chain_id,
        from,
        to,
        amount,
        direction,
        slippage_pct: settings.slippage_pct_clamped(),
    };

    let Some(quote) = service.quote(&request).await else {
        println!("no route");
        return Ok(());
    };

    println!("route:      {}", quote.route_label);
    println!("amount in:  {} {}", format_units(quote.amount_in, quote.from.decimals), quote.from.symbol);
    println!("amount out: {} {}", format_units(quote.amount_out, quote.to.decimals), quote.to.symbol);
    println!(
        "tolerance:  {} bips ({} bips factory fee x {} hops)",
        quote.tolerance_bips,
        quote.fee_bips,
        quote.hops()
    );
    match direction {
        TradeDirection::ExactIn => println!(
            "min out:    {} {}",
            format_units(quote.bound, quote.to.decimals),
            quote.to.symbol
        ),
        TradeDirection::ExactOut => println!(
            "max in:     {} {}",
            format_units(quote.bound, quote.from.decimals),
            quote.from.symbol
        ),
    }
    if quote.high_tolerance {
        println!("warning:    effective slippage and fees exceed 50% for this route");
    }

    if let Some(recipient) = args.recipient {
        let swap = service.swap_request(&quote, recipient, settings.deadline_secs)?;
        println!("router:     {:#x}", swap.router);
        println!("deadline:   {}", swap.deadline.to_rfc3339());
        println!("calldata:   0x{}", hex::encode(swap.calldata()));
        if let Some(token_in) = swap.token_in() {
            let approval = service.allowance_helper().approval_amount(swap.spend_limit());
            println!("approval:   {} of {:#x} if allowance is short", approval, token_in);
            println!("approve:    0x{}", hex::encode(approve_calldata(swap.router, approval)));
        }
    }

    Ok(())
}
