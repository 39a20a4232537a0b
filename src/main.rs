use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error};

use estate_nearby::finance::{self, Buyer, Employment, FinanceError, RentVsBuyInput};
use estate_nearby::geojson::places_to_feature_collection;
use estate_nearby::logging::init_logging;
use estate_nearby::{NearbyService, Settings, SettingsError, categories};

#[derive(Parser)]
#[command(name = "estate-nearby")]
#[command(about = "Nearby places and home-loan arithmetic for property listings")]
#[command(version)]
struct Cli {
    /// Settings file; defaults to settings.json in the user config directory
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the place categories that can be searched
    Categories,

    /// Find places of one category around a point
    Nearby {
        /// Category key, e.g. hospital or metro
        category: String,

        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        #[arg(long, allow_negative_numbers = true)]
        lng: f64,

        /// Search radius in metres
        #[arg(short, long)]
        radius: Option<u32>,

        /// Write the places as a GeoJSON FeatureCollection instead
        #[arg(long)]
        geojson: Option<PathBuf>,
    },

    /// Monthly installment for a loan
    Emi {
        principal: f64,

        /// Annual interest rate in percent
        #[arg(long, default_value_t = 8.5)]
        rate: f64,

        /// Tenure in years
        #[arg(long, default_value_t = 20)]
        years: u32,

        /// Include the month-by-month schedule
        #[arg(long)]
        schedule: bool,
    },

    /// Property price a monthly income can support
    Afford {
        monthly_income: f64,

        #[arg(long, default_value_t = 0.0)]
        existing_emis: f64,

        #[arg(long, default_value_t = 8.5)]
        rate: f64,

        #[arg(long, default_value_t = 20)]
        years: u32,
    },

    /// Largest loan a lender is likely to offer
    Eligibility {
        annual_income: f64,

        #[arg(long)]
        age: u32,

        #[arg(long, value_enum, default_value_t = EmploymentArg::Salaried)]
        employment: EmploymentArg,

        #[arg(long, default_value_t = 0.0)]
        liabilities: f64,
    },

    /// Stamp duty and registration for a purchase
    StampDuty {
        price: f64,

        /// State key, e.g. maharashtra or tamilnadu
        #[arg(long)]
        state: String,

        #[arg(long, value_enum, default_value_t = BuyerArg::Male)]
        buyer: BuyerArg,
    },

    /// Security deposit and move-in cost for a rental
    Deposit {
        monthly_rent: f64,

        /// City key, e.g. mumbai or bangalore
        #[arg(long)]
        city: String,
    },

    /// Compare renting with buying over a period
    RentVsBuy {
        #[arg(long)]
        price: Option<f64>,

        #[arg(long)]
        rent: Option<f64>,

        #[arg(long)]
        years: Option<u32>,

        #[arg(long)]
        appreciation: Option<f64>,

        #[arg(long)]
        rent_increase: Option<f64>,

        #[arg(long)]
        down_payment: Option<f64>,

        #[arg(long)]
        rate: Option<f64>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum EmploymentArg {
    Salaried,
    SelfEmployed,
}

impl From<EmploymentArg> for Employment {
    fn from(arg: EmploymentArg) -> Self {
        match arg {
            EmploymentArg::Salaried => Employment::Salaried,
            EmploymentArg::SelfEmployed => Employment::SelfEmployed,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum BuyerArg {
    Male,
    Female,
}

impl From<BuyerArg> for Buyer {
    fn from(arg: BuyerArg) -> Self {
        match arg {
            BuyerArg::Male => Buyer::Male,
            BuyerArg::Female => Buyer::Female,
        }
    }
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Finance(#[from] FinanceError),
    #[error("could not encode output: {0}")]
    Json(#[from] serde_json::Error),
    #[error("could not write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{0}")]
    Lookup(String),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn load_settings(path: Option<&PathBuf>) -> Result<Settings, SettingsError> {
    match path {
        Some(path) => Settings::from_path(path),
        None => Settings::load(),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Categories => print_json(&categories()),
        Commands::Nearby {
            category,
            lat,
            lng,
            radius,
            geojson,
        } => {
            let settings = load_settings(cli.config.as_ref())?;
            debug!(?settings, "using settings");
            let service = NearbyService::new(&settings);
            let response = service.fetch_nearby_places(&category, lat, lng, radius);

            match geojson {
                Some(path) => {
                    if let Some(message) = &response.error {
                        return Err(CliError::Lookup(message.clone()));
                    }
                    let collection = places_to_feature_collection(&response.data);
                    let text = serde_json::to_string_pretty(&collection)?;
                    fs::write(&path, text).map_err(|source| CliError::Write { path, source })
                }
                None => {
                    print_json(&response)?;
                    match response.error {
                        Some(message) => Err(CliError::Lookup(message)),
                        None => Ok(()),
                    }
                }
            }
        }
        Commands::Emi {
            principal,
            rate,
            years,
            schedule,
        } => {
            let loan = finance::amortization_schedule(principal, rate, years.saturating_mul(12))?;
            if schedule {
                print_json(&loan)
            } else {
                print_json(&loan.summary)
            }
        }
        Commands::Afford {
            monthly_income,
            existing_emis,
            rate,
            years,
        } => print_json(&finance::affordability(monthly_income, existing_emis, rate, years)?),
        Commands::Eligibility {
            annual_income,
            age,
            employment,
            liabilities,
        } => print_json(&finance::eligibility(annual_income, age, employment.into(), liabilities)?),
        Commands::StampDuty { price, state, buyer } => {
            print_json(&finance::stamp_duty(price, &state, buyer.into())?)
        }
        Commands::Deposit { monthly_rent, city } => {
            print_json(&finance::rental_deposit(monthly_rent, &city)?)
        }
        Commands::RentVsBuy {
            price,
            rent,
            years,
            appreciation,
            rent_increase,
            down_payment,
            rate,
        } => {
            let defaults = RentVsBuyInput::default();
            let input = RentVsBuyInput {
                price: price.unwrap_or(defaults.price),
                monthly_rent: rent.unwrap_or(defaults.monthly_rent),
                years: years.unwrap_or(defaults.years),
                appreciation_pct: appreciation.unwrap_or(defaults.appreciation_pct),
                rent_increase_pct: rent_increase.unwrap_or(defaults.rent_increase_pct),
                down_payment_pct: down_payment.unwrap_or(defaults.down_payment_pct),
                interest_rate_pct: rate.unwrap_or(defaults.interest_rate_pct),
            };
            print_json(&finance::rent_vs_buy(&input)?)
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn southern_hemisphere_coordinates_parse() {
        let cli = Cli::try_parse_from([
            "estate-nearby",
            "nearby",
            "park",
            "--lat",
            "-33.86",
            "--lng",
            "151.21",
        ])
        .unwrap();
        match cli.command {
            Commands::Nearby { lat, category, .. } => {
                assert_eq!(lat, -33.86);
                assert_eq!(category, "park");
            }
            _ => panic!("parsed the wrong subcommand"),
        }
    }
}
