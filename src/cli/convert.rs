//! One-shot conversion from the command line

use super::terminal::TerminalView;
use crate::core::config::AppConfig;
use crate::core::controller::{ControllerSettings, ConversionController, WidgetView};
use crate::core::rates::RateProvider;
use anyhow::Result;
use std::sync::Arc;

pub async fn run(
    config: &AppConfig,
    rates: Arc<dyn RateProvider>,
    amount: &str,
    from: Option<&str>,
    to: Option<&str>,
) -> Result<()> {
    let mut settings = ControllerSettings::from(config);
    if let Some(from) = from {
        settings.default_from = from.trim().to_uppercase();
    }
    if let Some(to) = to {
        settings.default_to = to.trim().to_uppercase();
    }

    let view = Arc::new(TerminalView::stdout());
    let controller = ConversionController::new(rates, view.clone(), settings);
    let (from, to) = controller.selection();
    view.show_selection(&from, &to);

    controller.set_amount(amount).await;
    view.present();

    let error = view.error_text();
    if !error.is_empty() {
        anyhow::bail!("{error}");
    }
    Ok(())
}
