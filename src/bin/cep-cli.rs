use clap::{Parser, Subcommand};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "cep-cli")]
#[command(about = "Query a running cep-temperature gateway or resolver", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8082")]
    gateway_url: String,

    #[arg(short, long, default_value = "http://localhost:8081")]
    resolver_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit a postal code through the gateway
    Submit { cep: String },
    /// Ask the resolver directly
    Resolve { cep: String },
    /// Check that both services answer
    Health,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Submit { cep } => {
            let res = client
                .post(format!("{}/cep", cli.gateway_url))
                .json(&json!({ "cep": cep }))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Resolve { cep } => {
            let mut url = reqwest::Url::parse(&cli.resolver_url)?;
            url.path_segments_mut()
                .map_err(|_| "resolver url cannot carry a path")?
                .pop_if_empty()
                .extend(["temperatura", cep.as_str()]);
            let res = client.get(url).send().await?;
            print_response(res).await?;
        }
        Commands::Health => {
            for (name, base) in [("gateway", &cli.gateway_url), ("resolver", &cli.resolver_url)] {
                match client.get(format!("{}/health", base)).send().await {
                    Ok(res) => println!("{name}: {}", res.status()),
                    Err(e) => println!("{name}: unreachable ({e})"),
                }
            }
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    if !status.is_success() {
        eprintln!("Error: {} {}", status, text.trim());
        return Ok(());
    }

    let json: Value = serde_json::from_str(&text)?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
