use clap::{
    builder::{
        styling::{AnsiColor, Effects, Styles},
        ValueParser,
    },
    Arg, ColorChoice, Command,
};

pub fn validator_log_level() -> ValueParser {
    ValueParser::from(move |level: &str| -> std::result::Result<u8, String> {
        if let Ok(parsed) = level.parse::<u8>() {
            // Successfully parsed as a number
            if parsed <= 5 {
                return Ok(parsed);
            }
        }

        match level.to_lowercase().as_str() {
            "error" => Ok(0),
            "warn" => Ok(1),
            "info" => Ok(2),
            "debug" => Ok(3),
            "trace" => Ok(4),
            _ => Err("invalid log level".to_string()),
        }
    })
}

pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    Command::new("ethiotravel")
        .about("EthioTravel authentication gateway")
        .version(env!("CARGO_PKG_VERSION"))
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .help("Port to listen on")
                .default_value("8080")
                .env("ETHIOTRAVEL_PORT")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new("backend-url")
                .short('b')
                .long("backend-url")
                .help("Backend API base URL, example: https://api.ethiotravel.dev/api")
                .env("ETHIOTRAVEL_BACKEND_URL")
                .required(true),
        )
        .arg(
            Arg::new("frontend-url")
                .long("frontend-url")
                .help("Frontend origin used for CORS and the cookie Secure policy")
                .default_value("http://localhost:3000")
                .env("ETHIOTRAVEL_FRONTEND_URL"),
        )
        .arg(
            Arg::new("session-secret")
                .long("session-secret")
                .help("Secret used to sign session tokens")
                .env("ETHIOTRAVEL_SESSION_SECRET")
                .required(true),
        )
        .arg(
            Arg::new("session-ttl")
                .long("session-ttl")
                .help("Session token lifetime in seconds")
                .default_value("604800")
                .env("ETHIOTRAVEL_SESSION_TTL")
                .value_parser(clap::value_parser!(i64)),
        )
        .arg(
            Arg::new("landing-path")
                .long("landing-path")
                .help("Path authenticated users are sent to from auth-only pages")
                .default_value("/home")
                .env("ETHIOTRAVEL_LANDING_PATH"),
        )
        .arg(
            Arg::new("idp-client-id")
                .long("idp-client-id")
                .help("Identity provider OAuth client id")
                .env("ETHIOTRAVEL_IDP_CLIENT_ID"),
        )
        .arg(
            Arg::new("idp-client-secret")
                .long("idp-client-secret")
                .help("Identity provider OAuth client secret")
                .env("ETHIOTRAVEL_IDP_CLIENT_SECRET"),
        )
        .arg(
            Arg::new("verbosity")
                .short('v')
                .long("verbose")
                .help("Verbosity level: ERROR, WARN, INFO, DEBUG, TRACE (default: ERROR)")
                .env("ETHIOTRAVEL_LOG_LEVEL")
                .global(true)
                .action(clap::ArgAction::Count)
                .value_parser(validator_log_level()),
        )
}
