use clap::{
    Args, CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};
use tracing_subscriber::EnvFilter;

use hypemcli::{
    cli, config,
    types::{LoginCredentials, ParamValue, Signup},
    utils, warning,
};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Call an API endpoint by name or alias
    Call(CallOptions),

    /// Obtain a session token and store it
    Login(LoginOptions),

    /// Create an account and store its session token
    Signup(SignupOptions),

    /// Forget the stored session token
    Logout,

    /// List known endpoints
    Endpoints(EndpointsOptions),

    /// Print the genre tags of a track
    Tags(TrackOption),

    /// Print the stream URL of a track
    Stream(TrackOption),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct CallOptions {
    /// Operation name, e.g. get_tracks or get_site_info
    pub operation: String,

    /// Parameter as name=value; can be repeated
    #[clap(short = 'p', long = "param", value_parser = utils::parse_key_value)]
    pub params: Vec<(String, ParamValue)>,

    /// Session token for this call only
    #[clap(long, conflicts_with = "session")]
    pub token: Option<String>,

    /// Use the stored session token
    #[clap(long)]
    pub session: bool,
}

#[derive(Args, Debug, Clone)]
pub struct LoginOptions {
    #[clap(long)]
    pub username: Option<String>,
    #[clap(long)]
    pub password: Option<String>,
    /// Facebook OAuth token (account must be connected on the website)
    #[clap(long)]
    pub fb_token: Option<String>,
    /// Twitter OAuth token, requires --tw-secret
    #[clap(long, requires = "tw_secret")]
    pub tw_token: Option<String>,
    #[clap(long, requires = "tw_token")]
    pub tw_secret: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct SignupOptions {
    #[clap(long)]
    pub username: String,
    #[clap(long)]
    pub email: String,
    #[clap(long)]
    pub password: String,
    /// Subscribe to the newsletter
    #[clap(long)]
    pub newsletter: bool,
    /// 16 hex characters identifying this device; generated when omitted
    #[clap(long)]
    pub device_id: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct EndpointsOptions {
    /// Build the table from the live API documentation
    #[clap(long)]
    pub refresh: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct TrackOption {
    /// Track id, e.g. 2fv7a
    track_id: String,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = config::load_env().await {
        warning!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Call(opt) => cli::call(opt.operation, opt.params, opt.token, opt.session).await,
        Command::Login(opt) => {
            cli::login(LoginCredentials {
                username: opt.username,
                password: opt.password,
                fb_oauth_token: opt.fb_token,
                tw_oauth_token: opt.tw_token,
                tw_oauth_token_secret: opt.tw_secret,
            })
            .await
        }
        Command::Signup(opt) => {
            cli::signup(Signup {
                username: opt.username,
                email: opt.email,
                password: opt.password,
                newsletter: opt.newsletter,
                device_id: opt.device_id,
                ..Default::default()
            })
            .await
        }
        Command::Logout => cli::logout().await,
        Command::Endpoints(opt) => cli::endpoints(opt.refresh).await,
        Command::Tags(opt) => cli::tags(opt.track_id).await,
        Command::Stream(opt) => cli::stream(opt.track_id).await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
