pub mod helpers;

mod config_test;
mod reassign_test;
