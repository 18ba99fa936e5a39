//! Command-line front end for the transit backend.

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

use transit_client::config::load_or_default;
use transit_client::models::{BookingQuery, FareQuery};
use transit_client::observability::logging;
use transit_client::ApiClient;

#[derive(Parser)]
#[command(name = "transit-client")]
#[command(about = "Query the transit booking backend", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Backend base URL, overriding the configuration
    #[arg(short, long)]
    url: Option<String>,

    /// Where the session token is kept when the configuration names no file
    #[arg(long, default_value = ".transit-session.json")]
    session_file: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check backend health
    Health,
    /// List all routes
    Routes,
    /// Show one route with its stops
    Route { id: u64 },
    /// Search routes by start or end point
    Search {
        #[arg(long)]
        from: Option<String>,
        #[arg(long)]
        to: Option<String>,
    },
    /// List upcoming trips
    Trips {
        #[arg(long)]
        route: Option<u64>,
    },
    /// Quote a fare
    Fare {
        trip: u64,
        pickup: u64,
        dropoff: u64,
        #[arg(default_value_t = 1)]
        passengers: u32,
    },
    /// Log in and persist the session token
    Login { phone: String, password: String },
    /// Forget the persisted session token
    Logout,
    /// List your bookings
    Bookings {
        #[arg(long)]
        status: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = load_or_default(cli.config.as_deref())?;
    if let Some(url) = cli.url {
        config.api.base_url = url;
    }
    if config.session.token_path.is_none() {
        config.session.token_path = Some(cli.session_file.to_string_lossy().into_owned());
    }
    logging::init(&config.observability);

    let client = ApiClient::builder(config).build()?;

    match cli.command {
        Commands::Health => print_json(&client.check_health().await)?,
        Commands::Routes => print_json(&client.routes().get_all_routes().await?)?,
        Commands::Route { id } => print_json(&client.routes().get_route_with_stops(id).await?)?,
        Commands::Search { from, to } => print_json(
            &client
                .routes()
                .search_routes(from.as_deref(), to.as_deref())
                .await?,
        )?,
        Commands::Trips { route } => print_json(&client.trips().get_upcoming_trips(route).await?)?,
        Commands::Fare {
            trip,
            pickup,
            dropoff,
            passengers,
        } => {
            let query = FareQuery {
                trip_id: trip,
                pickup_stop_id: pickup,
                dropoff_stop_id: dropoff,
                passenger_count: passengers,
            };
            print_json(&client.bookings().calculate_fare(&query).await?)?
        }
        Commands::Login { phone, password } => {
            let user = client.auth().login(&phone, &password).await?;
            print_json(&user)?
        }
        Commands::Logout => {
            client.auth().logout();
            println!("Logged out");
        }
        Commands::Bookings { status } => {
            if client.auth().restore_session().await.is_none() {
                eprintln!("Not logged in. Run `transit-client login` first.");
                std::process::exit(1);
            }
            let query = BookingQuery {
                status,
                ..Default::default()
            };
            print_json(&client.bookings().get_user_bookings(&query).await?)?
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
