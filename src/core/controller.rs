//! Conversion controller: turns user input into rendered conversions

use super::animation::{self, DEFAULT_DURATION, DEFAULT_FRAME_INTERVAL, Tween};
use super::config::AppConfig;
use super::error::CurrencyListError;
use super::rates::RateProvider;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::{debug, instrument, warn};

pub const FETCH_FAILED_MESSAGE: &str = "Unable to fetch exchange rates.";
pub const CURRENCY_LIST_FAILED_MESSAGE: &str = "Failed to load currencies.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// Output sink for everything the widget displays.
pub trait WidgetView: Send + Sync {
    fn show_currencies(&self, codes: &[String]);
    fn show_selection(&self, from: &str, to: &str);
    fn show_result(&self, text: &str);
    fn show_rate_info(&self, text: &str);
    fn show_last_update(&self, text: &str);
    /// An empty message clears the error region.
    fn show_error(&self, text: &str);
    fn show_theme(&self, theme: Theme);
}

#[derive(Debug, Clone, PartialEq)]
pub struct ControllerSettings {
    pub default_from: String,
    pub default_to: String,
    pub default_amount: String,
    pub animation_duration: Duration,
    pub frame_interval: Duration,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            default_from: "USD".to_string(),
            default_to: "BDT".to_string(),
            default_amount: "1".to_string(),
            animation_duration: DEFAULT_DURATION,
            frame_interval: DEFAULT_FRAME_INTERVAL,
        }
    }
}

impl From<&AppConfig> for ControllerSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            default_from: normalize_code(&config.defaults.from),
            default_to: normalize_code(&config.defaults.to),
            default_amount: config.defaults.amount.clone(),
            animation_duration: config.animation.duration(),
            frame_interval: config.animation.frame_interval(),
        }
    }
}

#[derive(Debug, Default)]
struct WidgetState {
    amount: String,
    from: String,
    to: String,
    currencies: Vec<String>,
    theme: Theme,
    /// Numeric value currently shown in the result region.
    displayed: f64,
}

pub struct ConversionController {
    rates: Arc<dyn RateProvider>,
    view: Arc<dyn WidgetView>,
    settings: ControllerSettings,
    state: Mutex<WidgetState>,
    generation: AtomicU64,
}

/// Parses user input into a convertible amount. Non-numeric, non-finite and
/// non-positive inputs yield `None`.
pub fn parse_amount(input: &str) -> Option<f64> {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite() && *amount > 0.0)
}

pub fn format_amount(value: f64) -> String {
    format!("{value:.2}")
}

pub fn format_rate_info(from: &str, rate: f64, to: &str) -> String {
    format!("1 {from} = {rate:.4} {to}")
}

fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

impl ConversionController {
    pub fn new(
        rates: Arc<dyn RateProvider>,
        view: Arc<dyn WidgetView>,
        settings: ControllerSettings,
    ) -> Self {
        let state = WidgetState {
            amount: settings.default_amount.clone(),
            from: settings.default_from.clone(),
            to: settings.default_to.clone(),
            ..WidgetState::default()
        };
        Self {
            rates,
            view,
            settings,
            state: Mutex::new(state),
            generation: AtomicU64::new(0),
        }
    }

    fn state(&self) -> MutexGuard<'_, WidgetState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_current(&self, ticket: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket
    }

    pub fn amount(&self) -> String {
        self.state().amount.clone()
    }

    pub fn selection(&self) -> (String, String) {
        let state = self.state();
        (state.from.clone(), state.to.clone())
    }

    pub fn currencies(&self) -> Vec<String> {
        self.state().currencies.clone()
    }

    pub fn theme(&self) -> Theme {
        self.state().theme
    }

    /// Populates both currency lists from the default base's rate table, sets
    /// the default selections and runs the first conversion.
    ///
    /// Failures are shown in the error region and returned to the caller.
    #[instrument(skip(self))]
    pub async fn load_currencies(&self) -> Result<Vec<String>, CurrencyListError> {
        match self.populate_currencies().await {
            Ok(codes) => {
                self.convert().await;
                Ok(codes)
            }
            Err(e) => {
                warn!(error = %e, "Currency list unavailable");
                self.view.show_error(CURRENCY_LIST_FAILED_MESSAGE);
                Err(e)
            }
        }
    }

    async fn populate_currencies(&self) -> Result<Vec<String>, CurrencyListError> {
        let base = self.settings.default_from.clone();
        let table = self.rates.get_rates(&base).await?;
        let codes = table.currencies();
        if codes.is_empty() {
            return Err(CurrencyListError::Empty(base));
        }

        let to = if codes.contains(&self.settings.default_to) {
            self.settings.default_to.clone()
        } else {
            codes
                .iter()
                .find(|code| **code != base)
                .unwrap_or(&base)
                .clone()
        };
        debug!(count = codes.len(), from = %base, to = %to, "Loaded currencies");

        {
            let mut state = self.state();
            state.currencies = codes.clone();
            state.from = base.clone();
            state.to = to.clone();
        }
        self.view.show_currencies(&codes);
        self.view.show_selection(&base, &to);
        Ok(codes)
    }

    /// Recomputes the conversion for the current amount and selection.
    ///
    /// Each call supersedes any conversion still in flight: a response or
    /// animation frame that belongs to an older call is dropped.
    pub async fn convert(&self) {
        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.view.show_error("");

        let (amount_input, from, to) = {
            let state = self.state();
            (state.amount.clone(), state.from.clone(), state.to.clone())
        };

        let Some(amount) = parse_amount(&amount_input) else {
            self.state().displayed = 0.0;
            self.view.show_result(&format_amount(0.0));
            return;
        };

        let lookup = self
            .rates
            .get_rates(&from)
            .await
            .and_then(|table| table.rate_for(&to).map(|rate| (rate, table)));

        if !self.is_current(ticket) {
            debug!(ticket, "Discarding superseded conversion {} -> {}", from, to);
            return;
        }

        let (rate, table) = match lookup {
            Ok(found) => found,
            Err(e) => {
                warn!(error = %e, "Conversion {} -> {} failed", from, to);
                self.view.show_error(FETCH_FAILED_MESSAGE);
                return;
            }
        };

        let converted = amount * rate;
        debug!(amount, rate, converted, "Converted {} -> {}", from, to);

        self.view.show_rate_info(&format_rate_info(&from, rate, &to));
        self.view
            .show_last_update(&format!("Last update: {}", table.last_update_display()));

        let start = self.state().displayed;
        let tween = Tween::new(start, converted, self.settings.animation_duration);
        animation::run(tween, self.settings.frame_interval, |value| {
            if !self.is_current(ticket) {
                return false;
            }
            self.state().displayed = value;
            self.view.show_result(&format_amount(value));
            true
        })
        .await;
    }

    pub async fn set_amount(&self, input: &str) {
        self.state().amount = input.to_string();
        self.convert().await;
    }

    /// Selects the source currency. Codes missing from the loaded list are
    /// rejected and leave the selection untouched.
    pub async fn select_from(&self, code: &str) -> bool {
        self.select(code, true).await
    }

    pub async fn select_to(&self, code: &str) -> bool {
        self.select(code, false).await
    }

    async fn select(&self, code: &str, source: bool) -> bool {
        let code = normalize_code(code);
        let (from, to) = {
            let mut state = self.state();
            if !state.currencies.is_empty() && !state.currencies.contains(&code) {
                drop(state);
                self.view.show_error(&format!("Unknown currency: {code}"));
                return false;
            }
            if source {
                state.from = code;
            } else {
                state.to = code;
            }
            (state.from.clone(), state.to.clone())
        };
        self.view.show_selection(&from, &to);
        self.convert().await;
        true
    }

    pub async fn swap(&self) {
        let (from, to) = {
            let mut state = self.state();
            let state = &mut *state;
            std::mem::swap(&mut state.from, &mut state.to);
            (state.from.clone(), state.to.clone())
        };
        self.view.show_selection(&from, &to);
        self.convert().await;
    }

    pub fn toggle_theme(&self) -> Theme {
        let theme = {
            let mut state = self.state();
            state.theme = state.theme.toggled();
            state.theme
        };
        self.view.show_theme(theme);
        theme
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::FetchError;
    use crate::core::rates::RateTable;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::collections::{BTreeMap, HashMap};
    use std::sync::atomic::AtomicUsize;

    #[derive(Default)]
    struct ViewLog {
        currencies: Vec<String>,
        selection: (String, String),
        results: Vec<String>,
        rate_info: String,
        last_update: String,
        error: String,
        theme: Theme,
    }

    #[derive(Default)]
    struct RecordingView {
        log: Mutex<ViewLog>,
    }

    impl RecordingView {
        fn log(&self) -> MutexGuard<'_, ViewLog> {
            self.log.lock().unwrap()
        }

        fn result(&self) -> String {
            self.log().results.last().cloned().unwrap_or_default()
        }
    }

    impl WidgetView for RecordingView {
        fn show_currencies(&self, codes: &[String]) {
            self.log().currencies = codes.to_vec();
        }
        fn show_selection(&self, from: &str, to: &str) {
            self.log().selection = (from.to_string(), to.to_string());
        }
        fn show_result(&self, text: &str) {
            self.log().results.push(text.to_string());
        }
        fn show_rate_info(&self, text: &str) {
            self.log().rate_info = text.to_string();
        }
        fn show_last_update(&self, text: &str) {
            self.log().last_update = text.to_string();
        }
        fn show_error(&self, text: &str) {
            self.log().error = text.to_string();
        }
        fn show_theme(&self, theme: Theme) {
            self.log().theme = theme;
        }
    }

    #[derive(Default)]
    struct MockRates {
        tables: HashMap<String, RateTable>,
        delays: HashMap<String, Duration>,
        call_count: AtomicUsize,
    }

    impl MockRates {
        fn with_table(mut self, base: &str, rates: &[(&str, f64)]) -> Self {
            let rates: BTreeMap<String, f64> =
                rates.iter().map(|(c, r)| (c.to_string(), *r)).collect();
            self.tables.insert(
                base.to_string(),
                RateTable::new(base, Utc::now(), rates, "Fri, 02 Apr 2021 00:06:31 +0000"),
            );
            self
        }

        fn with_delay(mut self, base: &str, delay: Duration) -> Self {
            self.delays.insert(base.to_string(), delay);
            self
        }

        fn calls(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RateProvider for MockRates {
        async fn get_rates(&self, base: &str) -> Result<RateTable, FetchError> {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delays.get(base) {
                tokio::time::sleep(*delay).await;
            }
            self.tables
                .get(base)
                .cloned()
                .ok_or_else(|| FetchError::Api {
                    base: base.to_string(),
                    result: "error".to_string(),
                })
        }
    }

    fn instant_settings() -> ControllerSettings {
        ControllerSettings {
            animation_duration: Duration::ZERO,
            ..ControllerSettings::default()
        }
    }

    fn controller_with(
        rates: MockRates,
        settings: ControllerSettings,
    ) -> (ConversionController, Arc<MockRates>, Arc<RecordingView>) {
        let rates = Arc::new(rates);
        let view = Arc::new(RecordingView::default());
        let controller = ConversionController::new(rates.clone(), view.clone(), settings);
        (controller, rates, view)
    }

    fn usd_rates() -> MockRates {
        MockRates::default()
            .with_table("USD", &[("BDT", 110.5), ("EUR", 0.92)])
            .with_table("BDT", &[("USD", 1.0 / 110.5), ("EUR", 0.0083)])
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("100"), Some(100.0));
        assert_eq!(parse_amount(" 2.5 "), Some(2.5));
        assert_eq!(parse_amount("0"), None);
        assert_eq!(parse_amount("-3"), None);
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount("inf"), None);
        assert_eq!(parse_amount("NaN"), None);
    }

    #[test]
    fn test_formatting() {
        assert_eq!(format_amount(11050.0), "11050.00");
        assert_eq!(format_amount(0.005), "0.01");
        assert_eq!(format_rate_info("USD", 110.5, "BDT"), "1 USD = 110.5000 BDT");
    }

    #[tokio::test]
    async fn test_convert_displays_amount_times_rate() {
        let (controller, _, view) = controller_with(usd_rates(), instant_settings());

        controller.set_amount("100").await;

        assert_eq!(view.result(), "11050.00");
        let log = view.log();
        assert_eq!(log.rate_info, "1 USD = 110.5000 BDT");
        assert!(log.last_update.starts_with("Last update: "));
        assert!(log.error.is_empty());
    }

    #[tokio::test]
    async fn test_non_positive_amount_shows_zero_without_fetching() {
        let (controller, rates, view) = controller_with(usd_rates(), instant_settings());

        for input in ["0", "-5", "", "twelve"] {
            controller.set_amount(input).await;
            assert_eq!(view.result(), "0.00");
        }
        assert_eq!(rates.calls(), 0);
    }

    #[tokio::test]
    async fn test_api_failure_keeps_previous_values() {
        let rates = MockRates::default().with_table("USD", &[("BDT", 110.5), ("EUR", 0.92)]);
        let (controller, _, view) = controller_with(rates, instant_settings());

        controller.set_amount("100").await;
        // No table for EUR, the mock answers with an API error
        controller.select_from("EUR").await;

        assert_eq!(view.result(), "11050.00");
        let log = view.log();
        assert_eq!(log.error, FETCH_FAILED_MESSAGE);
        assert_eq!(log.rate_info, "1 USD = 110.5000 BDT");
    }

    #[tokio::test]
    async fn test_unknown_target_is_a_fetch_failure() {
        let (controller, _, view) = controller_with(usd_rates(), instant_settings());

        controller.set_amount("10").await;
        controller.select_to("XYZ").await;

        assert_eq!(view.log().error, FETCH_FAILED_MESSAGE);
        assert_eq!(view.result(), "1105.00");
    }

    #[tokio::test]
    async fn test_error_is_cleared_by_next_conversion() {
        let (controller, _, view) = controller_with(usd_rates(), instant_settings());

        controller.select_to("XYZ").await;
        assert_eq!(view.log().error, FETCH_FAILED_MESSAGE);

        controller.select_to("EUR").await;
        assert!(view.log().error.is_empty());
        assert_eq!(view.result(), "0.92");
    }

    #[tokio::test]
    async fn test_load_currencies_populates_and_converts() {
        let (controller, _, view) = controller_with(usd_rates(), instant_settings());

        let codes = controller.load_currencies().await.unwrap();

        assert_eq!(codes, vec!["BDT", "EUR", "USD"]);
        assert_eq!(controller.currencies(), codes);
        assert_eq!(
            controller.selection(),
            ("USD".to_string(), "BDT".to_string())
        );
        let log = view.log();
        assert_eq!(log.currencies, codes);
        assert_eq!(log.selection, ("USD".to_string(), "BDT".to_string()));
        assert_eq!(log.results.last().unwrap(), "110.50");
    }

    #[tokio::test]
    async fn test_load_currencies_falls_back_when_default_target_missing() {
        let rates = MockRates::default().with_table("USD", &[("EUR", 0.92), ("JPY", 151.2)]);
        let (controller, _, _) = controller_with(rates, instant_settings());

        controller.load_currencies().await.unwrap();
        assert_eq!(
            controller.selection(),
            ("USD".to_string(), "EUR".to_string())
        );
    }

    #[tokio::test]
    async fn test_load_currencies_failure_is_shown() {
        let (controller, _, view) = controller_with(MockRates::default(), instant_settings());

        let result = controller.load_currencies().await;

        assert!(matches!(result, Err(CurrencyListError::Fetch(_))));
        assert_eq!(view.log().error, CURRENCY_LIST_FAILED_MESSAGE);
        assert!(controller.currencies().is_empty());
    }

    #[tokio::test]
    async fn test_selection_outside_loaded_list_is_rejected() {
        let (controller, _, view) = controller_with(usd_rates(), instant_settings());
        controller.load_currencies().await.unwrap();

        let accepted = controller.select_to("xyz").await;

        assert!(!accepted);
        assert_eq!(view.log().error, "Unknown currency: XYZ");
        assert_eq!(
            controller.selection(),
            ("USD".to_string(), "BDT".to_string())
        );

        assert!(controller.select_to("eur").await);
        assert_eq!(controller.selection().1, "EUR");
    }

    #[tokio::test]
    async fn test_swap_twice_restores_selection_and_result() {
        let (controller, _, view) = controller_with(usd_rates(), instant_settings());
        controller.load_currencies().await.unwrap();
        controller.set_amount("100").await;
        let before = view.result();

        controller.swap().await;
        assert_eq!(
            controller.selection(),
            ("BDT".to_string(), "USD".to_string())
        );
        assert_eq!(view.log().rate_info, "1 BDT = 0.0090 USD");

        controller.swap().await;
        assert_eq!(
            controller.selection(),
            ("USD".to_string(), "BDT".to_string())
        );
        assert_eq!(view.result(), before);
    }

    #[tokio::test]
    async fn test_animation_moves_from_previous_value() {
        let settings = ControllerSettings {
            animation_duration: Duration::from_millis(40),
            frame_interval: Duration::from_millis(5),
            ..ControllerSettings::default()
        };
        let (controller, _, view) = controller_with(usd_rates(), settings);

        controller.set_amount("100").await;

        let results = view.log().results.clone();
        assert!(results.len() > 1);
        assert_eq!(results.last().unwrap(), "11050.00");
        let values: Vec<f64> = results.iter().map(|r| r.parse().unwrap()).collect();
        assert!(values.windows(2).all(|w| w[0] <= w[1]));
    }

    #[tokio::test]
    async fn test_superseded_conversion_is_discarded() {
        let rates = usd_rates()
            .with_table("EUR", &[("BDT", 120.0), ("USD", 1.09)])
            .with_delay("USD", Duration::from_millis(100));
        let (controller, _, view) = controller_with(rates, instant_settings());
        controller.state().amount = "2".to_string();

        let slow = controller.convert();
        let fast = async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            controller.select_from("EUR").await;
        };
        futures::join!(slow, fast);

        assert_eq!(view.result(), "240.00");
        assert_eq!(view.log().rate_info, "1 EUR = 120.0000 BDT");
        assert_eq!(view.log().results.len(), 1);
    }

    #[test]
    fn test_toggle_theme() {
        let (controller, _, view) = controller_with(usd_rates(), instant_settings());

        assert_eq!(controller.theme(), Theme::Light);
        assert_eq!(controller.toggle_theme(), Theme::Dark);
        assert_eq!(view.log().theme, Theme::Dark);
        assert_eq!(controller.toggle_theme(), Theme::Light);
        assert_eq!(view.log().theme, Theme::Light);
    }
}
