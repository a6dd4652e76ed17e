use market_rs::server::ServerBuilder;
use market_rs::Arg;

use std::time::Duration;

extern crate env_logger;

fn main() {
    env_logger::init();
    let arg = Arg::parse();
    let mut server = ServerBuilder::new()
        .host(arg.host())
        .port(arg.port())
        .max_clients(arg.max_clients())
        .idle_shutdown(Duration::from_millis(arg.idle_shutdown_ms()))
        .build()
        .unwrap();

    server.run().unwrap();
}
