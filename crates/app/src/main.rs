//! Rental fleet administration CLI.

use std::process;

use clap::{Args, Parser, Subcommand};
use rental_app::{
    auth::{Role, generate_api_token, hash_api_token},
    database,
    domain::cars::{
        CarsRepository, PgCarsRepository,
        models::{CarCategory, CarUuid, FuelType, NewCar, Transmission},
    },
    users::{NewUser, PgUsersRepository, UserUuid, UsersRepository},
};
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(name = "rental-app", about = "Car rental CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    User(UserCommand),
    Car(CarCommand),
}

#[derive(Debug, Args)]
struct UserCommand {
    #[command(subcommand)]
    command: UserSubcommand,
}

#[derive(Debug, Subcommand)]
enum UserSubcommand {
    Create(CreateUserArgs),
}

#[derive(Debug, Args)]
struct CreateUserArgs {
    /// Display name
    #[arg(long)]
    name: String,

    /// Contact email
    #[arg(long)]
    email: String,

    /// Grant the administrator role
    #[arg(long)]
    admin: bool,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    /// Optional user UUID; generated when omitted
    #[arg(long)]
    user_uuid: Option<Uuid>,

    /// Optional raw API token; generated when omitted
    #[arg(long)]
    token: Option<String>,
}

#[derive(Debug, Args)]
struct CarCommand {
    #[command(subcommand)]
    command: CarSubcommand,
}

#[derive(Debug, Subcommand)]
enum CarSubcommand {
    Add(AddCarArgs),
}

#[derive(Debug, Args)]
struct AddCarArgs {
    /// Model name
    #[arg(long)]
    name: String,

    /// Manufacturer
    #[arg(long)]
    brand: String,

    /// Daily rate in cents
    #[arg(long)]
    price_per_day: u64,

    /// Catalog category (Sedan, SUV, Luxury, Electric, Sports)
    #[arg(long)]
    category: CarCategory,

    /// Gearbox (Automatic, Manual)
    #[arg(long)]
    transmission: Transmission,

    /// Seat count
    #[arg(long)]
    seats: u8,

    /// Fuel type (Petrol, Diesel, Electric, Hybrid)
    #[arg(long)]
    fuel_type: FuelType,

    /// Listing description
    #[arg(long, default_value = "")]
    description: String,

    /// Image URL
    #[arg(long, default_value = "")]
    image: String,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,
}

#[tokio::main]
async fn main() {
    let _env = dotenvy::dotenv();

    let cli = Cli::parse();

    if let Err(error) = run(cli).await {
        eprintln!("{error}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), String> {
    match cli.command {
        Commands::User(UserCommand {
            command: UserSubcommand::Create(args),
        }) => create_user(args).await,
        Commands::Car(CarCommand {
            command: CarSubcommand::Add(args),
        }) => add_car(args).await,
    }
}

async fn create_user(args: CreateUserArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let repository = PgUsersRepository::new(pool);
    let user_uuid = args.user_uuid.map_or_else(UserUuid::new, UserUuid::from_uuid);
    let raw_token = args.token.unwrap_or_else(generate_api_token);

    if raw_token.trim().is_empty() {
        return Err("token cannot be empty".to_string());
    }

    let role = if args.admin { Role::Admin } else { Role::User };

    let profile = repository
        .insert_user(&NewUser {
            uuid: user_uuid,
            name: args.name,
            email: args.email,
            role,
            token_hash: hash_api_token(&raw_token),
        })
        .await
        .map_err(|error| format!("failed to create user: {error}"))?;

    println!("user_uuid: {}", profile.uuid);
    println!("user_name: {}", profile.name);
    println!("role: {}", role.as_str());
    println!("api_token: {raw_token}");
    println!("store this token now; it is only shown once");

    Ok(())
}

async fn add_car(args: AddCarArgs) -> Result<(), String> {
    let pool = database::connect(&args.database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    let repository = PgCarsRepository::new(pool);

    let car = repository
        .insert_car(&NewCar {
            uuid: CarUuid::new(),
            name: args.name,
            brand: args.brand,
            price_per_day: args.price_per_day,
            category: args.category,
            transmission: args.transmission,
            seats: args.seats,
            fuel_type: args.fuel_type,
            description: args.description,
            image: args.image,
        })
        .await
        .map_err(|error| format!("failed to add car: {error}"))?;

    println!("car_uuid: {}", car.uuid);
    println!("car_name: {}", car.name);
    println!("daily_rate_cents: {}", car.price_per_day);

    Ok(())
}
