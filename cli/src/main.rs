
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use client::state::assign::AssignDialog;
use client::state::upload::UploadDialog;
use client::views::{AdsView, DashboardView, DevicesView, ReportsView};
use client::{
    ApiClient, ApiError, AuthContext, AuthError, ClientConfig, ConfigError, FileTokenStore,
    QueryCache,
};
use models::report::{DEFAULT_REPORT_DAYS, MAX_REPORT_DAYS, export_file_name};
use models::upload::{DEFAULT_DURATION_SECS, DURATION_CHOICES};
use models::{ReportFilter, ReportRangeError, Screen, StatusFilter};
use time::{Date, OffsetDateTime, UtcOffset};
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("config: {0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Auth(#[from] AuthError),
    #[error("request failed: {0}")]
    Api(#[from] ApiError),
    #[error("not logged in; run `dooh-admin login` first")]
    LoginRequired,
    #[error("no device matches `{0}`")]
    UnknownDevice(String),
    #[error("no ad matches `{0}`")]
    UnknownAd(String),
    #[error("{0}")]
    Range(#[from] ReportRangeError),
    #[error("{0}")]
    Failed(&'static str),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Parser, Debug)]
#[command(name = "dooh-admin", about = "DOOH ad-network admin CLI")]
struct Cli {
    /// Overrides `DOOH_BASE_URL`.
    #[arg(long)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "DOOH_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Logout,
    Whoami,
    Dashboard,
    Ads(AdsCommand),
    Devices(DevicesCommand),
    Reports(ReportsCommand),
}

#[derive(Args, Debug)]
struct AdsCommand {
    #[command(subcommand)]
    command: AdsSubcommand,
}

#[derive(Subcommand, Debug)]
enum AdsSubcommand {
    List,
    Upload {
        file: PathBuf,
        /// Defaults to the file name.
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long = "client", default_value = "")]
        client_name: String,
        #[arg(long, default_value_t = DEFAULT_DURATION_SECS, value_parser = parse_duration)]
        duration: u32,
    },
    Delete {
        ad_id: String,
    },
}

#[derive(Args, Debug)]
struct DevicesCommand {
    #[command(subcommand)]
    command: DevicesSubcommand,
}

#[derive(Subcommand, Debug)]
enum DevicesSubcommand {
    List {
        #[arg(long, default_value_t = StatusFilter::All)]
        status: StatusFilter,
    },
    Assign {
        /// Server id or hardware id.
        device: String,
        /// Ad ids for the top screen.
        #[arg(long, value_delimiter = ',')]
        screen0: Vec<String>,
        /// Ad ids for the bottom screen.
        #[arg(long, value_delimiter = ',')]
        screen1: Vec<String>,
        /// Ad shown preferentially during charging events.
        #[arg(long)]
        premium: Option<String>,
    },
}

#[derive(Args, Debug)]
struct ReportsCommand {
    #[command(subcommand)]
    command: ReportsSubcommand,
}

#[derive(Args, Debug)]
struct RangeArgs {
    /// Window length ending now.
    #[arg(
        long,
        default_value_t = DEFAULT_REPORT_DAYS,
        value_parser = clap::value_parser!(i64).range(1..=MAX_REPORT_DAYS)
    )]
    days: i64,
}

#[derive(Subcommand, Debug)]
enum ReportsSubcommand {
    Stats {
        #[command(flatten)]
        range: RangeArgs,
        #[arg(long)]
        device: Option<String>,
        #[arg(long)]
        ad: Option<String>,
    },
    Export {
        #[command(flatten)]
        range: RangeArgs,
        /// Defaults to `dooh-report-<today>.csv`.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn parse_duration(raw: &str) -> Result<u32, String> {
    let secs: u32 = raw.parse().map_err(|_| format!("`{raw}` is not a number of seconds"))?;
    if DURATION_CHOICES.contains(&secs) {
        Ok(secs)
    } else {
        Err(format!("duration must be one of {DURATION_CHOICES:?}"))
    }
}

fn main() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    // The local offset can only be read while the process is single-threaded.
    let local_offset = UtcOffset::current_local_offset().unwrap_or_else(|error| {
        tracing::debug!(%error, "local offset unavailable; using UTC");
        UtcOffset::UTC
    });

    let cli = Cli::parse();
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(cli, local_offset))
}

async fn run(cli: Cli, local_offset: UtcOffset) -> Result<(), CliError> {
    let mut config = ClientConfig::from_env()?;
    if let Some(base_url) = cli.base_url {
        config = config.with_base_url(&base_url);
    }

    let api = ApiClient::new(&config)?;
    let auth = AuthContext::new(api, Arc::new(FileTokenStore::new(config.token_file.clone())));

    if let Command::Login { email, password } = cli.command {
        return run_login(&auth, &email, &password).await;
    }

    auth.init().await?;
    auth.require_user().await.map_err(|_| CliError::LoginRequired)?;
    let cache = QueryCache::new(auth.api().clone());

    match cli.command {
        Command::Login { .. } => Ok(()),
        Command::Logout => run_logout(&auth).await,
        Command::Whoami => run_whoami(&auth).await,
        Command::Dashboard => run_dashboard(&cache).await,
        Command::Ads(ads) => run_ads(&cache, ads).await,
        Command::Devices(devices) => run_devices(&cache, devices).await,
        Command::Reports(reports) => run_reports(auth.api(), reports, local_offset).await,
    }
}

async fn run_login(auth: &AuthContext, email: &str, password: &str) -> Result<(), CliError> {
    let user = auth.login(email, password).await?;
    println!("logged in as {} ({})", user.email, user.role);
    Ok(())
}

async fn run_logout(auth: &AuthContext) -> Result<(), CliError> {
    auth.logout().await?;
    println!("logged out");
    Ok(())
}

async fn run_whoami(auth: &AuthContext) -> Result<(), CliError> {
    let user = auth.require_user().await.map_err(|_| CliError::LoginRequired)?;
    println!("{} ({})", user.email, user.role);
    Ok(())
}

async fn run_dashboard(cache: &QueryCache) -> Result<(), CliError> {
    print!("{}", DashboardView::load(cache).await?);
    Ok(())
}

async fn run_ads(cache: &QueryCache, ads: AdsCommand) -> Result<(), CliError> {
    match ads.command {
        AdsSubcommand::List => {
            print!("{}", AdsView::load(cache).await?);
            Ok(())
        }
        AdsSubcommand::Upload {
            file,
            name,
            client_name,
            duration,
        } => {
            let mut dialog = UploadDialog::new();
            dialog.select_path(&file).await?;
            dialog.set_name(&name);
            dialog.set_client_name(&client_name);
            dialog.set_duration(duration);
            match dialog.submit(cache).await {
                Some(ad) => {
                    println!("uploaded {} ({})", ad.name, ad.id);
                    Ok(())
                }
                None => Err(failure(dialog.status().error_message())),
            }
        }
        AdsSubcommand::Delete { ad_id } => {
            client::state::ads::delete_ad(cache, &ad_id).await?;
            println!("deleted {ad_id}");
            Ok(())
        }
    }
}

async fn run_devices(cache: &QueryCache, devices: DevicesCommand) -> Result<(), CliError> {
    match devices.command {
        DevicesSubcommand::List { status } => {
            print!("{}", DevicesView::load(cache, status).await?);
            Ok(())
        }
        DevicesSubcommand::Assign {
            device,
            screen0,
            screen1,
            premium,
        } => {
            let target = cache
                .devices()
                .await?
                .into_iter()
                .find(|d| d.id == device || d.device_id == device)
                .ok_or(CliError::UnknownDevice(device))?;

            let mut dialog = AssignDialog::open(cache, target).await?;
            for (screen, ids) in [(Screen::Top, &screen0), (Screen::Bottom, &screen1)] {
                for ad_id in ids {
                    if dialog.find_ad(ad_id).is_none() {
                        return Err(CliError::UnknownAd(ad_id.clone()));
                    }
                    if !dialog.selection().is_selected(ad_id, screen) {
                        dialog.toggle(ad_id, screen);
                    }
                }
            }
            dialog.set_premium(premium.as_deref());

            let count = dialog.assignments().len();
            let status = dialog.submit(cache).await;
            if status.is_error() {
                return Err(failure(status.error_message()));
            }
            println!("assigned {count} ads to {}", dialog.device().name);
            Ok(())
        }
    }
}

async fn run_reports(
    api: &ApiClient,
    reports: ReportsCommand,
    local_offset: UtcOffset,
) -> Result<(), CliError> {
    let now = OffsetDateTime::now_utc();
    match reports.command {
        ReportsSubcommand::Stats { range, device, ad } => {
            let mut filter = ReportFilter::last_days(now, range.days)?;
            filter.device_id = device;
            filter.ad_id = ad;
            print!("{}", ReportsView::load(api, filter).await?);
            Ok(())
        }
        ReportsSubcommand::Export { range, output } => {
            let filter = ReportFilter::last_days(now, range.days)?;
            let csv = api.export_csv(&filter).await?;
            let path = export_path(output, now.to_offset(local_offset).date());
            tokio::fs::write(&path, &csv).await?;
            tracing::info!(path = %path.display(), bytes = csv.len(), "report exported");
            println!("wrote {}", path.display());
            Ok(())
        }
    }
}

/// `--output` if given, otherwise the dated default in the working directory.
fn export_path(output: Option<PathBuf>, today: Date) -> PathBuf {
    output.unwrap_or_else(|| PathBuf::from(export_file_name(today)))
}

fn failure(message: Option<&'static str>) -> CliError {
    CliError::Failed(message.unwrap_or("request failed"))
}
