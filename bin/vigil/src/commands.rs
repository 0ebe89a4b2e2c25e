//! Command handlers.

use std::sync::Arc;

use eyre::{Result, WrapErr, bail};
use vigil_node::{ClientBuilder, DataDirs, load_signer};
use vigil_primitives::{VoteId, WalletAddress};
use vigil_storage::ReceiptStore;
use vigil_vote::{VoteCoordinator, VoteError};

use crate::cli::{Cli, Commands, StateCommand};

pub(crate) async fn run(cli: Cli) -> Result<()> {
    let (dirs, config) = cli.load_config()?;

    if let Commands::Config = cli.command {
        let rendered = toml::to_string_pretty(&config).wrap_err("Failed to render configuration")?;
        print!("{rendered}");
        return Ok(());
    }

    let builder = ClientBuilder::new(config)?;
    match cli.command {
        Commands::State(args) => state(&builder, &args).await,
        Commands::Vote(args) => {
            let coordinator = coordinator(&builder, &dirs).await?;
            let vote_id = VoteId::new(args.vote_id);
            let outcome = submit(coordinator.submit_vote(vote_id, args.direct).await)?;
            println!("vote {vote_id}: {}", outcome.kind());
            if let Some(receipt) = outcome.receipt() {
                println!("{}", serde_json::to_string_pretty(receipt)?);
            }
            Ok(())
        }
        Commands::VotePending(args) => {
            let coordinator = coordinator(&builder, &dirs).await?;
            let outcomes = submit(coordinator.submit_pending(args.direct).await)?;
            if outcomes.is_empty() {
                println!("no pending votes");
            }
            for (vote_id, outcome) in outcomes {
                println!("vote {vote_id}: {}", outcome.kind());
            }
            Ok(())
        }
        Commands::Journal => journal(&builder, &dirs),
        Commands::Config => Ok(()),
    }
}

async fn state(builder: &ClientBuilder, args: &StateCommand) -> Result<()> {
    let state = if args.head {
        builder.bundler().head_state().await?
    } else {
        let contract = &builder.config().network.contract;
        let reader = builder.state_reader();
        let state = if args.fresh {
            reader.get_fresh(contract).await?
        } else {
            reader.get(contract).await?
        };
        Arc::unwrap_or_clone(state)
    };
    println!("{}", serde_json::to_string_pretty(&state)?);
    Ok(())
}

async fn coordinator(builder: &ClientBuilder, dirs: &DataDirs) -> Result<VoteCoordinator> {
    let signer = Arc::new(load_signer(&builder.config().wallet)?);
    let store = Arc::new(builder.open_journal(dirs)?);
    let coordinator = VoteCoordinator::new(builder.vote_services(signer, store));
    coordinator.restore().await?;
    Ok(coordinator)
}

fn submit<T>(result: Result<T, VoteError>) -> Result<T> {
    match result {
        Err(VoteError::DirectVotingUnavailable) => {
            bail!("Direct voting needs a ledger writer; this client only relays votes")
        }
        other => Ok(other?),
    }
}

fn journal(builder: &ClientBuilder, dirs: &DataDirs) -> Result<()> {
    let signer = load_signer(&builder.config().wallet)?;
    let wallet = WalletAddress::new(signer.signer_address().to_string());
    let store = builder.open_journal(dirs)?;

    let Some(record) = store.load(&wallet)? else {
        println!("no journal for wallet {wallet}");
        return Ok(());
    };
    println!("wallet {wallet}: {} votes counted", record.total_voted);
    for receipt in &record.receipts {
        println!("{}", serde_json::to_string(receipt)?);
    }
    Ok(())
}
