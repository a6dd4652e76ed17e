use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about)]
pub struct Arg {
    #[clap(long, default_value = "localhost")]
    host: String,
    #[clap(short, long, default_value = "6666")]
    port: u16,

    #[clap(long, default_value = "1024")]
    max_clients: usize,

    /// How long the server stays up with zero connected clients, in
    /// milliseconds, before shutting itself down.
    #[clap(long, default_value = "10000")]
    idle_shutdown_ms: u64,
}

impl Arg {
    pub fn parse() -> Self {
        Arg::parse_from(std::env::args())
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn max_clients(&self) -> usize {
        self.max_clients
    }

    pub fn idle_shutdown_ms(&self) -> u64 {
        self.idle_shutdown_ms
    }
}
