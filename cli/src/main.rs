use clap::{Args, Parser, Subcommand};
use insights::model::form_date;
use insights::{CampaignStatus, CampaignType, LeadStatus};
use reqwest::header::{COOKIE, HeaderMap, HeaderValue};
use serde_json::{Map, Value, json};
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("missing session token; pass --session-token or set LEADBOARD_SESSION_TOKEN")]
    MissingSessionToken,
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
    #[error("server returned {status}: {message}")]
    ServerError { status: u16, message: String },
    #[error("missing expected field `{0}`")]
    MissingField(&'static str),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "leadboard-cli", about = "Leadboard API CLI")]
struct Cli {
    #[arg(long, env = "LEADBOARD_BASE_URL", default_value = "http://127.0.0.1:3000")]
    base_url: String,

    #[arg(long, env = "LEADBOARD_SESSION_TOKEN")]
    session_token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone)]
struct CliContext {
    base_url: String,
    session_token: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check `/healthz`.
    Ping,
    /// Open a dev session (server must run with `DEV_AUTH_BYPASS=true`).
    Session,
    Leads(LeadsCommand),
    Campaigns(CampaignsCommand),
    Analytics,
    Dashboard,
    /// Campaign summary cards.
    Stats,
}

#[derive(Args, Debug)]
struct LeadsCommand {
    #[command(subcommand)]
    command: LeadsSubcommand,
}

#[derive(Subcommand, Debug)]
enum LeadsSubcommand {
    List {
        #[arg(long, default_value_t = 0)]
        offset: i64,
        #[arg(long)]
        search: Option<String>,
        #[arg(long, value_parser = parse_lead_status)]
        status: Option<LeadStatus>,
    },
    Get {
        lead_id: Uuid,
    },
    Create(LeadCreateArgs),
    Status {
        lead_id: Uuid,
        #[arg(value_parser = parse_lead_status)]
        status: LeadStatus,
    },
}

#[derive(Args, Debug)]
struct LeadCreateArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    company: Option<String>,
    #[arg(long)]
    position: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    linkedin_url: Option<String>,
    #[arg(long)]
    source: Option<String>,
    #[arg(long)]
    notes: Option<String>,
}

#[derive(Args, Debug)]
struct CampaignsCommand {
    #[command(subcommand)]
    command: CampaignsSubcommand,
}

#[derive(Subcommand, Debug)]
enum CampaignsSubcommand {
    List {
        #[arg(long)]
        search: Option<String>,
        #[arg(long, value_parser = parse_campaign_status)]
        status: Option<CampaignStatus>,
    },
    Get {
        campaign_id: Uuid,
    },
    Create(CampaignCreateArgs),
    /// Flip active ↔ paused.
    Toggle {
        campaign_id: Uuid,
    },
    /// Show all leads and which are linked to the campaign.
    Members {
        campaign_id: Uuid,
    },
    /// Replace the campaign's leads with the given ids (none clears it).
    SetMembers {
        campaign_id: Uuid,
        lead_ids: Vec<Uuid>,
    },
}

#[derive(Args, Debug)]
struct CampaignCreateArgs {
    #[arg(long)]
    name: String,
    #[arg(long = "type", value_parser = parse_campaign_type)]
    campaign_type: Option<CampaignType>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    target_audience: Option<String>,
    #[arg(long, value_parser = parse_form_date, help = "YYYY-MM-DD")]
    start_date: Option<String>,
    #[arg(long, value_parser = parse_form_date, help = "YYYY-MM-DD")]
    end_date: Option<String>,
}

fn parse_lead_status(raw: &str) -> Result<LeadStatus, String> {
    LeadStatus::parse(raw).ok_or_else(|| format!("expected one of: {}", join_names(LeadStatus::ALL.map(LeadStatus::as_str))))
}

fn parse_campaign_status(raw: &str) -> Result<CampaignStatus, String> {
    CampaignStatus::parse(raw)
        .ok_or_else(|| format!("expected one of: {}", join_names(CampaignStatus::ALL.map(CampaignStatus::as_str))))
}

fn parse_campaign_type(raw: &str) -> Result<CampaignType, String> {
    CampaignType::parse(raw)
        .ok_or_else(|| format!("expected one of: {}", join_names(CampaignType::ALL.map(CampaignType::as_str))))
}

fn parse_form_date(raw: &str) -> Result<String, String> {
    form_date::parse(raw)
        .map(|_| raw.trim().to_owned())
        .map_err(|e| e.to_string())
}

fn join_names<const N: usize>(names: [&str; N]) -> String {
    names.join(", ")
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    let ctx = CliContext { base_url: cli.base_url, session_token: cli.session_token };

    match cli.command {
        Command::Ping => run_ping(&ctx).await,
        Command::Session => run_session(&ctx).await,
        Command::Leads(leads) => run_leads(&ctx, leads).await,
        Command::Campaigns(campaigns) => run_campaigns(&ctx, campaigns).await,
        Command::Analytics => get_and_print(&ctx, "/api/analytics", &[]).await,
        Command::Dashboard => get_and_print(&ctx, "/api/dashboard", &[]).await,
        Command::Stats => get_and_print(&ctx, "/api/campaigns/stats", &[]).await,
    }
}

async fn run_ping(cli: &CliContext) -> Result<(), CliError> {
    let client = reqwest::Client::new();
    let response = client.get(api_url(&cli.base_url, "/healthz")).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(CliError::ServerError { status: status.as_u16(), message: "health check failed".to_owned() });
    }
    println!("ok");
    Ok(())
}

async fn run_session(cli: &CliContext) -> Result<(), CliError> {
    let client = reqwest::Client::new();
    let response = client
        .post(api_url(&cli.base_url, "/api/dev/session"))
        .send()
        .await?;
    let status = response.status();
    let value = response.json::<Value>().await.unwrap_or(Value::Null);
    if !status.is_success() {
        return Err(CliError::ServerError { status: status.as_u16(), message: value.to_string() });
    }

    let token = value
        .get("token")
        .and_then(Value::as_str)
        .ok_or(CliError::MissingField("token"))?;
    println!("{token}");
    Ok(())
}

async fn run_leads(cli: &CliContext, leads: LeadsCommand) -> Result<(), CliError> {
    match leads.command {
        LeadsSubcommand::List { offset, search, status } => {
            let query = list_query(Some(offset), search, status.map(LeadStatus::as_str));
            get_and_print(cli, "/api/leads", &query).await
        }
        LeadsSubcommand::Get { lead_id } => get_and_print(cli, &format!("/api/leads/{lead_id}"), &[]).await,
        LeadsSubcommand::Create(args) => {
            let json = api_request(cli, reqwest::Method::POST, "/api/leads", &[], Some(lead_body(args))).await?;
            print_json(&json)
        }
        LeadsSubcommand::Status { lead_id, status } => {
            let path = format!("/api/leads/{lead_id}/status");
            let body = json!({ "status": status.as_str() });
            let json = api_request(cli, reqwest::Method::PATCH, &path, &[], Some(body)).await?;
            print_json(&json)
        }
    }
}

async fn run_campaigns(cli: &CliContext, campaigns: CampaignsCommand) -> Result<(), CliError> {
    match campaigns.command {
        CampaignsSubcommand::List { search, status } => {
            let query = list_query(None, search, status.map(CampaignStatus::as_str));
            get_and_print(cli, "/api/campaigns", &query).await
        }
        CampaignsSubcommand::Get { campaign_id } => {
            get_and_print(cli, &format!("/api/campaigns/{campaign_id}"), &[]).await
        }
        CampaignsSubcommand::Create(args) => {
            let body = campaign_body(args);
            let json = api_request(cli, reqwest::Method::POST, "/api/campaigns", &[], Some(body)).await?;
            print_json(&json)
        }
        CampaignsSubcommand::Toggle { campaign_id } => {
            let path = format!("/api/campaigns/{campaign_id}/toggle");
            let json = api_request(cli, reqwest::Method::POST, &path, &[], None).await?;
            print_json(&json)
        }
        CampaignsSubcommand::Members { campaign_id } => {
            get_and_print(cli, &format!("/api/campaigns/{campaign_id}/leads"), &[]).await
        }
        CampaignsSubcommand::SetMembers { campaign_id, lead_ids } => {
            let path = format!("/api/campaigns/{campaign_id}/leads");
            let body = json!({ "lead_ids": lead_ids });
            let json = api_request(cli, reqwest::Method::PUT, &path, &[], Some(body)).await?;
            print_json(&json)
        }
    }
}

fn list_query(offset: Option<i64>, search: Option<String>, status: Option<&str>) -> Vec<(&'static str, String)> {
    let mut query = Vec::new();
    if let Some(offset) = offset.filter(|o| *o > 0) {
        query.push(("offset", offset.to_string()));
    }
    if let Some(search) = search.filter(|s| !s.trim().is_empty()) {
        query.push(("search", search));
    }
    if let Some(status) = status {
        query.push(("status", status.to_owned()));
    }
    query
}

fn insert_opt(map: &mut Map<String, Value>, key: &str, value: Option<String>) {
    if let Some(value) = value {
        map.insert(key.to_owned(), Value::String(value));
    }
}

fn lead_body(args: LeadCreateArgs) -> Value {
    let mut map = Map::new();
    map.insert("name".to_owned(), Value::String(args.name));
    map.insert("email".to_owned(), Value::String(args.email));
    insert_opt(&mut map, "company", args.company);
    insert_opt(&mut map, "position", args.position);
    insert_opt(&mut map, "phone", args.phone);
    insert_opt(&mut map, "linkedin_url", args.linkedin_url);
    insert_opt(&mut map, "source", args.source);
    insert_opt(&mut map, "notes", args.notes);
    Value::Object(map)
}

fn campaign_body(args: CampaignCreateArgs) -> Value {
    let mut map = Map::new();
    map.insert("name".to_owned(), Value::String(args.name));
    insert_opt(&mut map, "type", args.campaign_type.map(|t| t.as_str().to_owned()));
    insert_opt(&mut map, "description", args.description);
    insert_opt(&mut map, "target_audience", args.target_audience);
    insert_opt(&mut map, "start_date", args.start_date);
    insert_opt(&mut map, "end_date", args.end_date);
    Value::Object(map)
}

fn api_url(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

async fn get_and_print(cli: &CliContext, path: &str, query: &[(&str, String)]) -> Result<(), CliError> {
    let json = api_request(cli, reqwest::Method::GET, path, query, None).await?;
    print_json(&json)
}

async fn api_request(
    cli: &CliContext,
    method: reqwest::Method,
    path: &str,
    query: &[(&str, String)],
    body: Option<Value>,
) -> Result<Value, CliError> {
    let session_token = cli
        .session_token
        .as_deref()
        .ok_or(CliError::MissingSessionToken)?;

    let mut headers = HeaderMap::new();
    headers.insert(COOKIE, HeaderValue::from_str(&format!("session_token={session_token}"))?);

    let client = reqwest::Client::builder()
        .default_headers(headers)
        .build()?;

    let request = client.request(method, api_url(&cli.base_url, path)).query(query);
    let request = if let Some(json) = body { request.json(&json) } else { request };

    let response = request.send().await?;
    let status = response.status();
    let value = response
        .json::<Value>()
        .await
        .unwrap_or_else(|_| Value::Null);

    if !status.is_success() {
        return Err(CliError::ServerError { status: status.as_u16(), message: value.to_string() });
    }

    Ok(value)
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
