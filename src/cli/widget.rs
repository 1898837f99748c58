//! Interactive converter widget driven by line commands

use super::terminal::TerminalView;
use super::ui;
use crate::core::config::AppConfig;
use crate::core::controller::{ControllerSettings, ConversionController};
use crate::core::rates::RateProvider;
use anyhow::{Context, Result, anyhow};
use std::str::FromStr;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

const HELP: &str = "\
Commands:
  <amount>        convert a new amount (also: amount <value>)
  from <CODE>     select the source currency
  to <CODE>       select the target currency
  swap            exchange source and target
  theme           toggle light/dark styling
  list            show supported currencies
  help            show this message
  quit            leave the widget";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetCommand {
    Amount(String),
    From(String),
    To(String),
    Swap,
    Theme,
    List,
    Help,
    Quit,
}

impl FromStr for WidgetCommand {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let head = parts.next().ok_or_else(|| anyhow!("Empty command"))?;
        let arg = parts.next();
        if parts.next().is_some() {
            return Err(anyhow!("Too many arguments: {}", s.trim()));
        }

        let needs_arg = |name: &str| {
            arg.map(str::to_string)
                .ok_or_else(|| anyhow!("'{}' needs a value", name))
        };

        match head.to_lowercase().as_str() {
            "amount" => Ok(WidgetCommand::Amount(needs_arg("amount")?)),
            "from" => Ok(WidgetCommand::From(needs_arg("from")?)),
            "to" => Ok(WidgetCommand::To(needs_arg("to")?)),
            "swap" => Ok(WidgetCommand::Swap),
            "theme" => Ok(WidgetCommand::Theme),
            "list" => Ok(WidgetCommand::List),
            "help" | "?" => Ok(WidgetCommand::Help),
            "quit" | "exit" | "q" => Ok(WidgetCommand::Quit),
            _ if arg.is_none() && looks_numeric(head) => Ok(WidgetCommand::Amount(head.to_string())),
            _ => Err(anyhow!("Unknown command: {}", s.trim())),
        }
    }
}

fn looks_numeric(s: &str) -> bool {
    s.starts_with(|c: char| c.is_ascii_digit() || c == '-' || c == '+' || c == '.')
}

fn currency_listing(codes: &[String]) -> String {
    if codes.is_empty() {
        "No currencies loaded.".to_string()
    } else {
        ui::currency_grid(codes, 10).to_string()
    }
}

/// Applies one command to the controller. Returns `false` when the widget should exit.
pub async fn apply(
    controller: &ConversionController,
    view: &TerminalView,
    command: WidgetCommand,
) -> bool {
    debug!(?command, "Widget command");
    match command {
        WidgetCommand::Amount(amount) => controller.set_amount(&amount).await,
        WidgetCommand::From(code) => {
            controller.select_from(&code).await;
        }
        WidgetCommand::To(code) => {
            controller.select_to(&code).await;
        }
        WidgetCommand::Swap => controller.swap().await,
        WidgetCommand::Theme => {
            controller.toggle_theme();
        }
        WidgetCommand::List => view.write_line(&currency_listing(&controller.currencies())),
        WidgetCommand::Help => view.write_line(HELP),
        WidgetCommand::Quit => return false,
    }
    true
}

pub async fn run(config: &AppConfig, rates: Arc<dyn RateProvider>) -> Result<()> {
    let view = Arc::new(TerminalView::stdout());
    let controller = ConversionController::new(rates, view.clone(), ControllerSettings::from(config));

    view.write_line(HELP);
    view.begin_loading("Loading currencies...");
    // Failures are already on screen; the widget stays usable for retries
    let _ = controller.load_currencies().await;
    view.present();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines
        .next_line()
        .await
        .context("Failed to read from stdin")?
    {
        if line.trim().is_empty() {
            continue;
        }
        match line.parse::<WidgetCommand>() {
            Ok(command) => {
                if !apply(&controller, &view, command).await {
                    break;
                }
            }
            Err(e) => view.write_line(&ui::style_text(
                &e.to_string(),
                ui::StyleType::Error,
                controller.theme(),
            )),
        }
        view.present();
    }
    Ok(())
}
