//! # Beautican Storefront CLI
//!
//! Drives the storefront cart layer from the command line: one command is
//! turned into one click on the page, then the page is printed.
//!
//! ## Usage
//! ```text
//! storefront [--config PATH] [--demo] <COMMAND>
//!
//!   show                    load the cart and print the drawer
//!   add VARIANT [QTY]       click an add-to-cart button
//!   inc KEY | dec KEY       click a line's +/- control
//!   remove KEY              click a line's remove control
//!   toggle-locale           click the language toggle
//!
//!   --demo                  use the in-memory backend (seeded with one line)
//! ```
//!
//! ## Startup Sequence
//! 1. Initialize tracing (logging, to stderr)
//! 2. Load configuration (defaults → storefront.toml → environment)
//! 3. Build the gateway (HTTP, or in-memory with `--demo`)
//! 4. Build the storefront over an in-memory page and start it
//! 5. Click, print

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use beautican_core::intent::{
    ATTR_ADD_TO_CART, ATTR_CART_DECREASE, ATTR_CART_INCREASE, ATTR_CART_REMOVE, ATTR_CONTROL_ID,
    ATTR_LANGUAGE_TOGGLE, ATTR_LINE_KEY, ATTR_QUANTITY, ATTR_VARIANT_ID,
};
use beautican_core::i18n::keys;
use beautican_core::VariantId;
use beautican_sync::{
    CartGateway, FileLocalePreferences, HttpCartGateway, LocalePreferences, MemoryCartGateway,
    MemoryLocalePreferences, MemoryPage, Storefront, StorefrontConfig,
};

const USAGE: &str = "\
Usage: storefront [--config PATH] [--demo] <COMMAND>

Commands:
  show                 load the cart and print the drawer
  add VARIANT [QTY]    add units of a variant
  inc KEY              increase a line by one
  dec KEY              decrease a line by one
  remove KEY           remove a line
  toggle-locale        switch between English and Arabic
";

/// A single command line action.
#[derive(Debug)]
enum Command {
    Show,
    Add { variant: String, quantity: Option<String> },
    Increase(String),
    Decrease(String),
    Remove(String),
    ToggleLocale,
}

impl Command {
    /// The attributes of the page element this command clicks.
    fn element(&self) -> Option<BTreeMap<String, String>> {
        let pairs: Vec<(&str, &str)> = match self {
            Command::Show => return None,
            Command::Add { variant, quantity } => {
                let mut pairs = vec![
                    (ATTR_ADD_TO_CART, ""),
                    (ATTR_VARIANT_ID, variant.as_str()),
                    (ATTR_CONTROL_ID, "cli-add"),
                ];
                if let Some(quantity) = quantity {
                    pairs.push((ATTR_QUANTITY, quantity.as_str()));
                }
                pairs
            }
            Command::Increase(key) => vec![(ATTR_CART_INCREASE, ""), (ATTR_LINE_KEY, key.as_str())],
            Command::Decrease(key) => vec![(ATTR_CART_DECREASE, ""), (ATTR_LINE_KEY, key.as_str())],
            Command::Remove(key) => vec![(ATTR_CART_REMOVE, ""), (ATTR_LINE_KEY, key.as_str())],
            Command::ToggleLocale => vec![(ATTR_LANGUAGE_TOGGLE, "")],
        };
        Some(
            pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}

struct Args {
    config: Option<PathBuf>,
    demo: bool,
    command: Command,
}

fn parse_args() -> Result<Args, pico_args::Error> {
    let mut args = pico_args::Arguments::from_env();

    let config = args.opt_value_from_str("--config")?;
    let demo = args.contains("--demo");

    let command = match args.subcommand()?.as_deref() {
        Some("show") | None => Command::Show,
        Some("add") => Command::Add {
            variant: args.free_from_str()?,
            quantity: args.opt_free_from_str()?,
        },
        Some("inc") => Command::Increase(args.free_from_str()?),
        Some("dec") => Command::Decrease(args.free_from_str()?),
        Some("remove") => Command::Remove(args.free_from_str()?),
        Some("toggle-locale") => Command::ToggleLocale,
        Some(other) => {
            return Err(pico_args::Error::ArgumentParsingFailed {
                cause: format!("unknown command '{}'", other),
            })
        }
    };

    Ok(Args {
        config,
        demo,
        command,
    })
}

/// Initializes the tracing subscriber. `RUST_LOG` overrides the default.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,beautican=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("error: {}\n\n{}", e, USAGE);
            std::process::exit(2);
        }
    };

    init_tracing();

    let config = StorefrontConfig::load(args.config)?;
    info!(backend = %config.backend.base_url, demo = args.demo, "Configuration loaded");

    let (gateway, badge_ids): (Arc<dyn CartGateway>, Vec<VariantId>) = if args.demo {
        let gateway = MemoryCartGateway::demo();
        let seed = VariantId::new(501).ok_or("demo catalog has no variant 501")?;
        gateway.add_line(seed, 1).await?;
        (Arc::new(gateway), [501, 502, 503].into_iter().filter_map(VariantId::new).collect())
    } else {
        (Arc::new(HttpCartGateway::new(&config.backend)?), Vec::new())
    };

    let prefs: Arc<dyn LocalePreferences> = match FileLocalePreferences::default_location() {
        Some(prefs) => Arc::new(prefs),
        None => Arc::new(MemoryLocalePreferences::default()),
    };

    let page = Arc::new(MemoryPage::new(badge_ids, &[keys::CART_TOTAL, keys::CART_CHECKOUT]));
    let storefront = Storefront::new(&config, gateway, page.clone(), prefs)?;
    storefront.start().await;

    if let Some(element) = args.command.element() {
        let outcome = storefront.click(&element).await;
        info!(command = ?args.command, ?outcome, "command handled");
    }

    let state = page.state();
    println!("{}", state.cart_html());
    println!();
    if let Some(badge) = state.count_badge {
        println!("items in cart: {}", badge.count);
    }
    for badge in state.variant_badges.values().filter(|b| b.visible) {
        println!("variant {}: {}", badge.variant_id, badge.quantity);
    }
    println!("drawer: {:?}", storefront.drawer().state());
    println!("locale: {}", storefront.locale().current());
    for toast in &state.notifications {
        println!("[{}] {}", toast.kind.as_str(), toast.message);
    }

    Ok(())
}
