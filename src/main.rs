//! Command-line front end for the basket backend.

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use basket_client::api::types::{PaginationParams, Period, SubscriptionRequest};
use basket_client::api::ApiServices;
use basket_client::auth::{self, AuthEvents, FileStore, LoginError, LoginFlow};
use basket_client::config::{load_config, override_base_url, ClientConfig};
use basket_client::observability::logging;
use basket_client::{ApiError, PipelineConfig, RequestPipeline};

#[derive(Parser)]
#[command(name = "basket-client")]
#[command(about = "Browse baskets, subscribe and manage mandates", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the backend base URL
    #[arg(short, long)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Request a login OTP for a mobile number
    SendOtp { mobile: String },
    /// Verify an OTP and store the access token
    VerifyOtp { mobile: String, otp: String },
    /// List all baskets
    Baskets,
    /// Show one basket
    Basket { id: String },
    /// Subscribe to a basket
    Subscribe {
        basket_id: String,
        #[arg(long, default_value = "weekly")]
        period: Period,
        #[arg(long, default_value_t = 10)]
        units: u32,
    },
    /// List your investments
    Investments,
    /// List payment mandates
    Mandates {
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Show one mandate
    Mandate { id: String },
    /// Delete a mandate
    DeleteMandate { id: String },
    /// Forget the stored credentials
    Logout,
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ClientConfig::default(),
    };
    let config = override_base_url(config, cli.base_url)?;

    logging::init(&config.observability.log_level);

    let store = Arc::new(FileStore::new(&config.storage.credentials_path));
    let events = AuthEvents::new();
    let mut unauthorized = events.subscribe();
    let pipeline = Arc::new(RequestPipeline::with_reqwest(
        PipelineConfig::from_api_config(&config.api),
        store.clone(),
        events,
    )?);
    let api = ApiServices::new(pipeline.clone());

    let outcome = match cli.command {
        Commands::SendOtp { mobile } => {
            let mut flow = LoginFlow::new(pipeline.clone());
            match flow.send_otp(&mobile).await {
                Ok(otp) => {
                    println!("OTP sent to {} (received: {})", mobile, otp);
                    Ok(())
                }
                Err(e) => Err(login_error_message(e)),
            }
        }
        Commands::VerifyOtp { mobile, otp } => {
            let result = match LoginFlow::awaiting_otp(pipeline.clone(), &mobile) {
                Ok(mut flow) => flow.verify_otp(&otp).await,
                Err(e) => Err(e),
            };
            match result {
                Ok(profile) => {
                    println!("Logged in as {}", profile.mobile);
                    Ok(())
                }
                Err(e) => Err(login_error_message(e)),
            }
        }
        Commands::Baskets => print_result(api.dashboard.baskets().await),
        Commands::Basket { id } => print_result(api.dashboard.basket_details(&id).await),
        Commands::Subscribe {
            basket_id,
            period,
            units,
        } => {
            let request = SubscriptionRequest { period, units };
            print_result(api.dashboard.subscribe_to_basket(&basket_id, &request).await)
        }
        Commands::Investments => print_result(api.dashboard.investments().await),
        Commands::Mandates { page, limit } => {
            let params = PaginationParams {
                page,
                limit,
                ..Default::default()
            };
            print_result(api.mandate.list(&params).await)
        }
        Commands::Mandate { id } => print_result(api.mandate.get(&id).await),
        Commands::DeleteMandate { id } => print_result(api.mandate.delete(&id).await),
        Commands::Logout => match auth::session::logout(store.as_ref()) {
            Ok(()) => {
                println!("Logged out");
                Ok(())
            }
            Err(e) => Err(e.to_string()),
        },
    };

    if unauthorized.try_recv().is_ok() {
        eprintln!("Session expired. Run `basket-client send-otp <mobile>` to log in again.");
    }

    match outcome {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(message) => {
            eprintln!("{}", message);
            Ok(ExitCode::FAILURE)
        }
    }
}

fn print_result<T: Serialize>(
    result: Result<basket_client::ResultEnvelope<T>, ApiError>,
) -> Result<(), String> {
    match result {
        Ok(envelope) => {
            let json = serde_json::to_string_pretty(&envelope.data).map_err(|e| e.to_string())?;
            println!("{}", json);
            Ok(())
        }
        Err(e) => Err(api_error_message(&e)),
    }
}

fn api_error_message(e: &ApiError) -> String {
    format!("Error ({}): {}", e.status, e.message)
}

/// Backend failures keep the status; local validation errors print as-is.
fn login_error_message(e: LoginError) -> String {
    match e {
        LoginError::Api(e) => api_error_message(&e),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_api_error_includes_status() {
        let err = LoginError::Api(ApiError::new(400, "Invalid OTP"));
        assert_eq!(login_error_message(err), "Error (400): Invalid OTP");
    }

    #[test]
    fn test_login_validation_error_is_plain() {
        assert_eq!(
            login_error_message(LoginError::InvalidMobile),
            "Please enter a valid 10-digit mobile number"
        );
    }
}
