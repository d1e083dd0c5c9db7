//! synth-runner: headless generator for the CRM dashboard dataset.
//!
//! Usage:
//!   synth-runner --seed 12345 --mode fixture --json dataset.json
//!   synth-runner --seed 12345 --mode enhanced --db crm.db
//!   synth-runner --seed 12345 --ipc-mode
//!   synth-runner --seed random --mode fixture

use anyhow::{Context, Result};
use chrono::Utc;
use crm_synth_core::{
    config::GeneratorConfig,
    customer::Customer,
    dataset::{Dataset, DatasetMode},
    metrics::DashboardMetrics,
    revenue,
    rng::RngBank,
    store::DatasetStore,
    synthesizer::Synthesizer,
    transaction::Transaction,
    types::Seed,
};
use serde_json::Value;
use std::env;
use std::io::{self, BufRead, Write};

/// Transactions returned alongside a customer lookup.
const CUSTOMER_HISTORY_LIMIT: usize = 20;

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GetMetrics,
    GetInsights,
    GetCustomer { id: String },
    Regenerate { seed: Seed },
    Quit,
}

#[derive(serde::Serialize)]
struct CustomerView<'a> {
    customer: &'a Customer,
    recent_transactions: Vec<&'a Transaction>,
}

/// One generated dataset plus the synthesizer that produced it.
struct Session {
    synth: Synthesizer,
    mode: DatasetMode,
    dataset: Dataset,
}

impl Session {
    fn generate(config: GeneratorConfig, seed: Seed, mode: DatasetMode) -> Result<Self> {
        let mut synth = Synthesizer::new(config, seed, Utc::now())?;
        let dataset = synth.build_dataset(mode);
        Ok(Self {
            synth,
            mode,
            dataset,
        })
    }

    fn metrics(&self) -> DashboardMetrics {
        self.synth
            .generate_dashboard_metrics(&self.dataset.customers, &self.dataset.transactions)
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = resolve_seed(string_arg(&args, "--seed"))?;
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let mode = match string_arg(&args, "--mode") {
        Some(raw) => DatasetMode::parse(raw)
            .with_context(|| format!("unknown --mode '{raw}' (expected fixture or enhanced)"))?,
        None => DatasetMode::from_env(),
    };
    let config = match string_arg(&args, "--config") {
        Some(path) => GeneratorConfig::load(path)?,
        None => GeneratorConfig::builtin(),
    };
    let db = string_arg(&args, "--db");
    let json = string_arg(&args, "--json");

    if !ipc_mode {
        println!("CRM synth-runner");
        println!("  seed:  {seed}");
        println!("  mode:  {}", mode.as_str());
        println!("  db:    {}", db.unwrap_or("-"));
        println!("  json:  {}", json.unwrap_or("-"));
        println!();
    }

    let mut session = Session::generate(config, seed, mode)?;

    if let Some(path) = json {
        session.dataset.save_json(path)?;
    }
    if let Some(path) = db {
        let store = DatasetStore::open(path)?;
        store.migrate()?;
        let run_id = format!("run-{seed}-{}", session.dataset.generated_at.timestamp());
        store.export_dataset(&run_id, &session.dataset, env!("CARGO_PKG_VERSION"))?;
    }

    if ipc_mode {
        run_ipc_loop(&mut session)?;
    } else {
        print_summary(&session);
    }
    Ok(())
}

fn run_ipc_loop(session: &mut Session) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("unrecognized IPC command: {}", buffer.trim());
                let err_json = serde_json::json!({ "error": e.to_string() });
                writeln!(stdout, "{err_json}")?;
                stdout.flush()?;
                continue;
            }
        };

        let Some(reply) = handle_command(session, cmd)? else {
            break;
        };
        writeln!(stdout, "{reply}")?;
        stdout.flush()?;
    }
    Ok(())
}

/// Reply for one IPC command, or `None` when the loop should stop.
fn handle_command(session: &mut Session, cmd: IpcCommand) -> Result<Option<Value>> {
    let reply = match cmd {
        IpcCommand::Quit => return Ok(None),
        IpcCommand::GetMetrics => serde_json::to_value(session.metrics())?,
        IpcCommand::GetInsights => {
            let Session { synth, dataset, .. } = session;
            serde_json::to_value(synth.generate_ai_insights(&dataset.customers))?
        }
        IpcCommand::GetCustomer { id } => match session.dataset.find_customer(&id) {
            Some(customer) => serde_json::to_value(CustomerView {
                customer,
                recent_transactions: session
                    .dataset
                    .transactions_for(&id)
                    .take(CUSTOMER_HISTORY_LIMIT)
                    .collect(),
            })?,
            None => serde_json::json!({ "error": "customer not found" }),
        },
        IpcCommand::Regenerate { seed } => {
            let config = session.synth.config().clone();
            *session = Session::generate(config, seed, session.mode)?;
            log::info!("regenerated dataset with seed {seed}");
            serde_json::json!({
                "seed": seed,
                "mode": session.mode.as_str(),
                "customers": session.dataset.customers.len(),
                "transactions": session.dataset.transactions.len(),
            })
        }
    };
    Ok(Some(reply))
}

fn print_summary(session: &Session) {
    let dataset = &session.dataset;
    let metrics = session.metrics();

    println!("=== DATASET SUMMARY ===");
    println!("  customers:      {}", metrics.total_customers);
    println!("  active:         {}", metrics.active_customers);
    println!("  vip:            {}", metrics.vip_customers);
    println!("  transactions:   {}", dataset.transactions.len());
    println!("  campaigns:      {}", dataset.campaigns.len());
    println!("  lottery draws:  {}", dataset.lottery_draws.len());
    for (segment, count) in &metrics.segment_counts {
        println!("  {:<14}  {count}", format!("{segment}:"));
    }

    println!();
    println!("=== REVENUE ===");
    println!("  GGR total:      {:.2}", metrics.total_revenue);
    println!("  GGR 24h:        {:.2}", metrics.daily_revenue);
    println!("  GGR 7d:         {:.2}", metrics.weekly_revenue);
    println!("  GGR 30d:        {:.2}", metrics.monthly_revenue);
    println!("  NGR series:     {:.2} over {} days", revenue::total_ngr(&dataset.revenue), dataset.revenue.len());
    println!("  churn rate:     {:.1}%", metrics.churn_rate * 100.0);
    println!("  conversion:     {:.1}%", metrics.conversion_rate * 100.0);
}

/// `--seed N` or `--seed random`; absent means 42.
fn resolve_seed(raw: Option<&str>) -> Result<Seed> {
    match raw {
        None => Ok(42),
        Some("random") => {
            let seed = RngBank::from_entropy().master_seed();
            log::info!("drew seed {seed} from OS entropy");
            Ok(seed)
        }
        Some(n) => n
            .parse()
            .with_context(|| format!("invalid --seed '{n}' (expected a number or 'random')")),
    }
}

fn string_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture_session() -> Session {
        Session::generate(GeneratorConfig::builtin(), 42, DatasetMode::Fixture).unwrap()
    }

    fn command(json: &str) -> IpcCommand {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn unknown_customer_gets_not_found_reply() {
        let mut session = fixture_session();
        let reply = handle_command(&mut session, command(r#"{"type":"get_customer","id":"cus_missing"}"#))
            .unwrap()
            .unwrap();
        assert_eq!(reply, serde_json::json!({ "error": "customer not found" }));
    }

    #[test]
    fn known_customer_comes_back_with_history() {
        let mut session = fixture_session();
        let id = session.dataset.customers[0].id.clone();
        let raw = format!(r#"{{"type":"get_customer","id":"{id}"}}"#);
        let reply = handle_command(&mut session, command(&raw)).unwrap().unwrap();

        assert_eq!(reply["customer"]["id"], Value::String(id.clone()));
        let history = reply["recent_transactions"].as_array().unwrap();
        assert!(history.len() <= CUSTOMER_HISTORY_LIMIT);
        assert!(history.iter().all(|t| t["customer_id"] == Value::String(id.clone())));
    }

    #[test]
    fn regenerate_swaps_the_session_dataset() {
        let mut session = fixture_session();
        let before = session.dataset.customers[0].id.clone();
        let reply = handle_command(&mut session, command(r#"{"type":"regenerate","seed":7}"#))
            .unwrap()
            .unwrap();

        assert_eq!(reply["seed"], 7);
        assert_eq!(session.dataset.seed, 7);
        assert_ne!(session.dataset.customers[0].id, before);
    }

    #[test]
    fn quit_stops_the_loop() {
        let mut session = fixture_session();
        assert!(handle_command(&mut session, IpcCommand::Quit).unwrap().is_none());
    }

    #[test]
    fn seed_flag_accepts_numbers_and_random() {
        assert_eq!(resolve_seed(None).unwrap(), 42);
        assert_eq!(resolve_seed(Some("12345")).unwrap(), 12345);
        assert!(resolve_seed(Some("twelve")).is_err());

        let a = resolve_seed(Some("random")).unwrap();
        let b = resolve_seed(Some("random")).unwrap();
        assert_ne!(a, b, "entropy seeds should not repeat");
    }
}
