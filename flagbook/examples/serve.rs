use flagbook::{ArgParser, Error, Registry};
use tracing_subscriber::{EnvFilter, fmt};

fn main() -> Result<(), Error> {
    init_tracing();

    let mut reg = Registry::new().with_about("serve, a pretend file server");
    reg.declare_string("root", "r", ".", "Directory to serve", None)?;
    reg.declare_string("host", "H", "127.0.0.1", "Address to bind", Some("Network"))?;
    reg.declare_int("port", "p", 8080, "Port to bind", Some("Network"))?;
    reg.declare_float("timeout", "t", 2.5, "Request timeout in seconds", Some("Network"))?;
    reg.declare_flag("verbose", "v", "Log every request", Some("Output"))?;
    reg.declare_flag("quiet", "q", "Only log errors", Some("Output"))?;

    let mut parser = ArgParser::new(reg);
    flagbook::parse_env(&mut parser)?;

    let args = parser.registry();
    tracing::info!(
        root = ?args.get_str("root"),
        host = ?args.get_str("host"),
        port = ?args.get_int("port"),
        timeout = ?args.get_float("timeout"),
        verbose = ?args.get_flag("verbose"),
        quiet = ?args.get_flag("quiet"),
        "starting"
    );

    for (name, value) in args.values() {
        println!("{name:<10} {value}");
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
