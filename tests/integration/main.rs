mod cli_test;
mod config_test;
