pub mod ledger_store;
pub mod public_api;
pub mod services;
pub mod time;
