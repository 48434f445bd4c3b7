/// CSV export of hourly results and daily totals.
pub mod export;
