//! CLI for the ledger-acl access evaluator.
//!
//! Pipeline: load snapshot -> resolve caller -> parse query -> evaluate -> report.

use clap::{Parser, Subcommand};
use ledger_acl_core::AclError;
use ledger_acl_evaluator::sink::json_stream::JsonStreamSink;
use ledger_acl_evaluator::sink::SinkTarget;
use ledger_acl_evaluator::{AccessEvaluator, AccessQuery, Summary};
use ledger_acl_store::{Directory, PermissionStore, SnapshotStore};
use std::io::BufReader;
use std::process::ExitCode;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "ledger-acl", version, about = "Ledger read-access evaluator")]
struct Cli {
    /// JSON snapshot of users, members, and log_access_permissions.
    #[arg(short, long, global = true, env = "LEDGER_ACL_STORE")]
    store: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decide one read request. Exits 0 on allow, 1 on deny.
    Check {
        #[arg(short, long)]
        user: String,

        /// Request query, e.g. "log_id=7&seq_no=150".
        #[arg(short, long)]
        query: String,

        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Print the stored permission record for a caller.
    Show {
        #[arg(short, long)]
        user: String,
    },

    /// Decide every request in an NDJSON file.
    Batch {
        /// One {"user_id", "log_id", "seq_no"} object per line.
        #[arg(short, long)]
        input: String,

        /// Sink output: "ndjson" writes NDJSON to stdout,
        /// "ndjson:/path/to/file" writes to file.
        #[arg(long)]
        sink: Option<String>,

        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let store_path = cli.store.ok_or_else(|| {
        AclError::InvalidInput("no snapshot given; pass --store or set LEDGER_ACL_STORE".into())
    })?;
    let store = SnapshotStore::open(&store_path)?;

    match cli.command {
        Commands::Check { user, query, json } => {
            if user.is_empty() {
                return Err(AclError::InvalidInput("user id must not be empty".into()).into());
            }
            if !store.is_user(&user) {
                tracing::warn!(user = %user, "caller is not a registered user");
                eprintln!("denied: {user} is not a registered user");
                return Ok(ExitCode::FAILURE);
            }

            let request = AccessQuery::parse(&query)?.into_request(user);
            let eval = AccessEvaluator::new(store);
            let decision = eval.evaluate(&request);

            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({
                        "request": request,
                        "allowed": decision.is_allowed(),
                        "reason": decision.reason(),
                    }))?
                );
            } else {
                match decision.reason() {
                    None => println!("allowed"),
                    Some(reason) => println!("denied ({reason})"),
                }
            }

            Ok(if decision.is_allowed() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }

        Commands::Show { user } => {
            let role = match (store.is_user(&user), store.is_member(&user)) {
                (true, true) => "user, member",
                (true, false) => "user",
                (false, true) => "member",
                (false, false) => "unregistered",
            };
            println!("{user}: {role}");
            match store.try_get(&user)? {
                Some(item) => {
                    println!("log ids: {}", item.log_id);
                    println!("seq nos: {}", item.seq_no);
                    println!("{}", serde_json::to_string_pretty(&item)?);
                }
                None => println!("no permission record (all reads denied)"),
            }
            Ok(ExitCode::SUCCESS)
        }

        Commands::Batch { input, sink, json } => {
            let t0 = Instant::now();
            let target = sink.as_deref().map(SinkTarget::parse).transpose()?;

            let file = std::fs::File::open(&input)
                .map_err(|e| AclError::InvalidInput(format!("Failed to open {input}: {e}")))?;
            let requests = ledger_acl_evaluator::read_requests(BufReader::new(file))?;
            tracing::info!(requests = requests.len(), input = %input, "loaded requests");

            let eval = AccessEvaluator::new(store);
            let records = ledger_acl_evaluator::evaluate_batch(&eval, &requests);
            let summary = Summary::build(&records, t0.elapsed());

            tracing::info!(
                allowed = summary.allowed,
                denied = summary.denied,
                elapsed_ms = summary.elapsed.as_millis(),
                "batch complete"
            );

            if let Some(target) = target {
                let (head, rows) = summary.to_rows(&records);

                match target {
                    SinkTarget::Stdout => {
                        let mut s = JsonStreamSink::stdout();
                        s.write_summary(&head)?;
                        s.write_decisions(&rows)?;
                        let n = s.finish()?;
                        tracing::info!(rows = n, "ndjson sink: wrote to stdout");
                    }
                    SinkTarget::File(path) => {
                        let file = std::fs::File::create(&path)?;
                        let mut s = JsonStreamSink::new(file);
                        s.write_summary(&head)?;
                        s.write_decisions(&rows)?;
                        let n = s.finish()?;
                        tracing::info!(
                            rows = n,
                            path = %path.display(),
                            "ndjson sink: wrote to file"
                        );
                    }
                }

                // Still print the report to stderr so it's visible.
                eprint!("{}", summary.render());
            } else if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else {
                print!("{}", summary.render());
            }

            Ok(ExitCode::SUCCESS)
        }
    }
}
