pub mod drive_card;
pub mod stat_card;
pub mod status_badge;
pub mod ui;
