//! Interactive CLI for tic-tac-toe on Ethereum
//!
//! Run with: cargo run --example interactive
//!
//! Reads NETWORK (`local` or `sepolia`, default `local`), the RPC URL and
//! player keys for that network, and the factory address from
//! DEPLOYMENT_FILE (default `deployment_output_hardhat_local.json` or
//! `deployment_output_sepolia_testnet.json`).

use std::io::{self, Write};

use eyre::Context;
use tictactoe_chain::{
    ClientOptions, ContractAbis, Deployment, HttpRpc, NetworkProfile, TicTacToeClient,
};

type Client = TicTacToeClient<HttpRpc>;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let network = std::env::var("NETWORK").unwrap_or_else(|_| "local".to_string());
    let profile = load_profile(&network)?;

    let client = TicTacToeClient::connect(
        profile,
        ContractAbis::bundled().context("Bundled ABI artifacts are invalid")?,
        ClientOptions::default(),
    )?;

    println!("\n========================================");
    println!("     Tic-Tac-Toe on Ethereum CLI");
    println!("========================================");
    print_identity(&client).await;

    // Main loop
    loop {
        println!("\n----------------------------------------");
        println!("Select an option:");
        println!("  1. Create game");
        println!("  2. Join game");
        println!("  3. Make move");
        println!("  4. Show board");
        println!("  5. Switch network");
        println!("  q. Quit");
        println!("----------------------------------------");

        let choice = prompt("Enter choice: ")?;

        let result = match choice.as_str() {
            "1" => create_game_flow(&client).await,
            "2" => join_game_flow(&client).await,
            "3" => make_move_flow(&client).await,
            "4" => show_board(&client).await,
            "5" => switch_network_flow(&client).await,
            "q" | "Q" => {
                println!("\nGoodbye!");
                break;
            }
            _ => {
                println!("\nInvalid choice. Please try again.");
                Ok(())
            }
        };

        if let Err(e) = result {
            println!("\nError: {:#}", e);
        }
    }

    client.shutdown();
    Ok(())
}

fn load_profile(network: &str) -> eyre::Result<NetworkProfile> {
    let (profile, default_file) = match network {
        "local" => (NetworkProfile::local(), "deployment_output_hardhat_local.json"),
        "sepolia" => (NetworkProfile::sepolia(), "deployment_output_sepolia_testnet.json"),
        other => eyre::bail!("Unknown network {other:?}; use `local` or `sepolia`"),
    };

    let file = std::env::var("DEPLOYMENT_FILE").unwrap_or_else(|_| default_file.to_string());
    match Deployment::from_file(&file) {
        Ok(deployment) => profile
            .with_deployment(&deployment)
            .with_context(|| format!("Invalid deployment file {file}")),
        Err(e) => {
            println!("No deployment loaded ({e}); set a factory before creating games");
            Ok(profile)
        }
    }
}

async fn print_identity(client: &Client) {
    let profile = client.profile().await;
    println!("Network: {} ({})", profile.name, profile.rpc_url);

    match client.check_connection().await {
        Ok(block) => println!("Latest block: {}", block),
        Err(e) => println!("Node unreachable: {}", e),
    }

    match client.factory_address().await {
        Some(factory) => println!("Factory: {}", factory),
        None => println!("Factory: (none)"),
    }

    for player in 0..profile.keys.len() {
        match client.player_address(player).await {
            Ok(address) => println!("Player {}: {}", player + 1, address),
            Err(e) => println!("Player {}: unavailable ({})", player + 1, e),
        }
    }
}

async fn create_game_flow(client: &Client) -> eyre::Result<()> {
    println!("\n=== CREATE GAME ===");
    let player = prompt_player()?;

    println!("Creating game...");
    let game = client.create_game(player).await.context("Failed to create game")?;
    println!("Game created at {}", game);

    Ok(())
}

async fn join_game_flow(client: &Client) -> eyre::Result<()> {
    println!("\n=== JOIN GAME ===");
    let address = prompt("Game address: ")?;
    let game = client.join_game(&address).await?;
    println!("Joined {}", game);

    show_board(client).await
}

async fn make_move_flow(client: &Client) -> eyre::Result<()> {
    println!("\n=== MAKE MOVE ===");
    let player = prompt_player()?;
    let row: u8 = prompt("Row (0-2): ")?.parse().context("Row must be a number")?;
    let col: u8 = prompt("Col (0-2): ")?.parse().context("Col must be a number")?;

    let tx_hash = client
        .make_move(player, row, col)
        .await
        .context("Failed to make move")?;
    println!("Move confirmed: {}", tx_hash);

    show_board(client).await
}

/// Board plus game status, read in parallel
async fn show_board(client: &Client) -> eyre::Result<()> {
    let (board, status) = tokio::join!(client.board(), client.status());

    println!("\n{}", board?);
    let status = status?;
    if status.is_draw() {
        println!("Game over, draw");
    } else if let Some(winner) = status.winner {
        println!("Game over, winner: {}", winner);
    } else {
        println!("Game in progress");
    }

    Ok(())
}

async fn switch_network_flow(client: &Client) -> eyre::Result<()> {
    let network = prompt("Network (local/sepolia): ")?;
    let profile = load_profile(&network)?;
    client.switch_network(profile).await?;

    print_identity(client).await;
    Ok(())
}

fn prompt_player() -> eyre::Result<usize> {
    let player: usize = prompt("Player (1 or 2): ")?
        .parse()
        .context("Player must be a number")?;
    if player == 0 {
        eyre::bail!("Players are numbered from 1");
    }
    Ok(player - 1)
}

fn prompt(label: &str) -> eyre::Result<String> {
    print!("{}", label);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}
