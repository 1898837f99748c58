pub mod convert;
pub mod currencies;
pub mod setup;
pub mod terminal;
pub mod ui;
pub mod widget;
