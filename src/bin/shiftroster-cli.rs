#![forbid(unsafe_code)]
use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use shiftroster::{
    build_model, io,
    model::{EmployeeId, Roster, ScheduleRequest},
    notification::{prepare_message, Dispatcher, OutboxSink, RateLimiter, TextMessage},
    roster::verify_roster,
    service::{schedule, ScheduleError, ScheduleResponse},
    solver::SolveOptions,
    storage::{JsonStorage, Storage},
};
use std::time::Duration;
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI de planification d'équipes sous contraintes
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Calculer un planning à partir d'une demande JSON
    Solve {
        /// Demande JSON {employees, days, shifts, availability, max_shifts, coverage, holidays?}
        #[arg(long)]
        request: String,
        /// Disponibilités supplémentaires (CSV `employee,day,shift`)
        #[arg(long)]
        availability_csv: Option<String>,
        /// Budget de recherche en millisecondes
        #[arg(long, default_value_t = 5_000)]
        time_limit_ms: u64,
        /// Nœuds entre deux lectures de l'horloge
        #[arg(long, default_value_t = 1_000)]
        check_interval: u64,
        /// Sauvegarde atomique du planning (JSON)
        #[arg(long)]
        save: Option<String>,
        #[arg(long)]
        out_csv: Option<String>,
    },

    /// Vérifier un planning existant contre une demande
    Check {
        #[arg(long)]
        request: String,
        #[arg(long)]
        roster: String,
    },

    /// Préparer et envoyer (boîte d'envoi locale) le message d'un employé
    Notify {
        #[arg(long)]
        roster: String,
        #[arg(long)]
        employee: String,
        /// Numéro du destinataire (E.164)
        #[arg(long)]
        to: String,
        /// Le destinataire a consenti aux messages
        #[arg(long)]
        consent: bool,
        /// Fichier de sortie (texte brut)
        #[arg(long)]
        out: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .try_init();
    }

    let code = match cli.cmd {
        Commands::Solve {
            request,
            availability_csv,
            time_limit_ms,
            check_interval,
            save,
            out_csv,
        } => {
            let mut req: ScheduleRequest = io::load_request_json(&request)?;
            if let Some(path) = availability_csv {
                let extra = io::import_availability_csv(&path)
                    .with_context(|| format!("importing availability {path}"))?;
                req.availability.extend(extra);
            }
            let opts = SolveOptions::default()
                .with_time_limit(Duration::from_millis(time_limit_ms))
                .with_check_interval(check_interval);

            let result = schedule(&req, &opts);
            let code = match &result {
                Ok(roster) => {
                    if let Some(path) = &save {
                        JsonStorage::open(path).save(roster)?;
                    }
                    if let Some(path) = &out_csv {
                        io::export_roster_csv(path, roster)?;
                    }
                    0
                }
                // Code 2 = aucun planning (infaisable ou budget épuisé)
                Err(ScheduleError::NoFeasibleSchedule { .. }) => 2,
                Err(_) => 1,
            };
            let response = ScheduleResponse::from(result);
            println!("{}", io::response_to_json(&response)?);
            code
        }
        Commands::Check { request, roster } => {
            let req: ScheduleRequest = io::load_request_json(&request)?;
            let model = build_model(&req)?;
            let roster: Roster = JsonStorage::open(&roster).load()?;
            let violations = verify_roster(&model, &roster);
            if violations.is_empty() {
                println!("OK: no violations");
                0
            } else {
                eprintln!("Found {} violation(s)", violations.len());
                for v in &violations {
                    println!("{v}");
                }
                2
            }
        }
        Commands::Notify {
            roster,
            employee,
            to,
            consent,
            out,
        } => {
            let roster: Roster = JsonStorage::open(&roster).load()?;
            let employee = EmployeeId::new(employee);
            let message = prepare_message(&roster, &employee, &to, &TextMessage)?;
            let mut dispatcher = Dispatcher::new(OutboxSink::default(), RateLimiter::default());
            let record = dispatcher.dispatch(&message, consent, Utc::now())?;
            match out {
                Some(path) => std::fs::write(&path, &record.body)?,
                None => println!("{}", record.body),
            }
            eprintln!(
                "Message {} queued for {} at {}",
                record.id,
                record.to,
                record.sent_at.to_rfc3339()
            );
            0
        }
    };

    std::process::exit(code);
}
