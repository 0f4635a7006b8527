extern crate axum;
extern crate chrono;
extern crate env_logger;
extern crate log;
extern crate readit_frontend;
extern crate serde;
#[macro_use]
extern crate serde_derive;
extern crate serde_json;

pub mod config;
pub mod error;
pub mod routes;
pub mod storage;

use std::io::Write;

pub fn init_logger() {
    env_logger::builder()
        .format(|buf, record| writeln!(buf, "{}", record.args()))
        .init();
}
