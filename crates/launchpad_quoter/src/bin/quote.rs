use alloy::primitives::{Address, utils::format_units};
use anyhow::{Result, anyhow};
use clap::Parser;
use dotenv::dotenv;
use launchpad_quoter::{
    Chain, Config, PricingTier, QuoteEngine, QuoteRequest, RpcSupplyReader, SellRequest,
    TOKEN_DECIMALS,
};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "quote")]
#[command(about = "Quote bonding curve buys and sells for a launchpad token", long_about = None)]
struct Args {
    /// Path to the config file
    #[arg(short, long, default_value = "./quoter.toml")]
    config: String,

    /// Chain the token lives on
    #[arg(long, default_value = "lens")]
    chain: Chain,

    /// Token contract address
    #[arg(short, long)]
    token: Address,

    /// Amount of quote token to spend, e.g. "25.5"
    #[arg(short, long, conflicts_with = "sell")]
    spend: Option<String>,

    /// Amount of tokens to sell
    #[arg(long)]
    sell: Option<String>,

    /// Quote as a holder with a fee discount
    #[arg(long, default_value_t = false)]
    discount: bool,

    /// Price with a pricing tier instead of the chain's configured curve
    #[arg(long)]
    tier: Option<PricingTier>,

    /// Account the quote is for
    #[arg(short, long, default_value_t = Address::ZERO)]
    account: Address,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_env_filter("info,launchpad_quoter=debug,launchpad_primitives=debug")
        .init();

    dotenv().ok();

    let config = Config::from_config_file(&args.config)?;
    let reader = RpcSupplyReader::from_config(&config)?;
    let engine = QuoteEngine::new(config, reader);
    let curve_override = args.tier.map(PricingTier::params);

    match (args.spend, args.sell) {
        (Some(spend_amount), None) => {
            let quote = engine
                .quote_buy(&QuoteRequest {
                    account: args.account,
                    token: args.token,
                    spend_amount,
                    has_fee_discount: args.discount,
                    chain: args.chain,
                    curve_override,
                })
                .await?;
            info!("Buy quote ready for {} on {}", args.token, args.chain);
            println!(
                "buy amount:      {}",
                format_units(quote.buy_amount, TOKEN_DECIMALS)?
            );
            println!("effective spend: {}", quote.effective_spend);
            if let Some(supply) = quote.current_supply {
                println!("current supply:  {}", format_units(supply, TOKEN_DECIMALS)?);
            }
            if quote.clamped {
                println!("clamped to the remaining mintable supply");
            }
        }
        (None, Some(sell_amount)) => {
            let quote = engine
                .quote_sell(&SellRequest {
                    account: args.account,
                    token: args.token,
                    sell_amount,
                    has_fee_discount: args.discount,
                    chain: args.chain,
                    curve_override,
                })
                .await?;
            let decimals = engine
                .config()
                .chain(args.chain)
                .map(|c| c.quote_decimals)
                .ok_or_else(|| anyhow!("Chain {} is not configured", args.chain))?;
            info!("Sell quote ready for {} on {}", args.token, args.chain);
            println!("sell price:      {}", format_units(quote.sell_price, decimals)?);
            println!(
                "after fees:      {}",
                format_units(quote.sell_price_after_fees, decimals)?
            );
        }
        _ => return Err(anyhow!("Pass exactly one of --spend or --sell")),
    }

    Ok(())
}
