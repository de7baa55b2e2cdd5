mod helpers;

mod recommendations_api;
mod scans_api;
mod tokens_api;
