use tokio::io::{AsyncBufReadExt, BufReader};

use crate::demo::DemoClient;
use crate::render;
use crate::types::DemoCommand;

/// Reads demo commands from stdin, one per line, and drives the workflow.
/// Errors print as a single banner line and never kill the loop — the
/// operator just re-issues the command.
pub async fn run_stdin(client: DemoClient) {
    tracing::info!("console started — type `help` for commands");

    let stdin = tokio::io::stdin();
    let reader = BufReader::new(stdin);
    let mut lines = reader.lines();

    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                let raw = line.trim();
                if raw.is_empty() {
                    continue;
                }
                match DemoCommand::parse(raw) {
                    Some(DemoCommand::Quit) => {
                        tracing::info!("quit — console stopping");
                        return;
                    }
                    Some(command) => dispatch(&client, command).await,
                    None => {
                        tracing::warn!(input = raw, "unknown command, ignoring");
                        println!("unknown command — type `help`");
                    }
                }
            }
            Ok(None) => {
                tracing::info!("stdin closed — console stopping");
                return;
            }
            Err(e) => {
                tracing::error!(error = %e, "stdin read error");
                return;
            }
        }
    }
}

async fn dispatch(client: &DemoClient, command: DemoCommand) {
    let state = client.state().clone();
    let round_contracts = state.config.read().unwrap().round_contracts;

    match command {
        DemoCommand::Analyze(kind) => match client.analyze_portfolio(kind).await {
            Ok(_) => {
                let workflow = state.workflow.lock().unwrap();
                if let Some(analysis) = workflow.analysis() {
                    println!("{}", render::render_analysis(analysis));
                }
            }
            Err(e) => println!("!! analyze failed: {}", render::format_error(&e)),
        },
        DemoCommand::Custom { size, side } => {
            match client.analyze_custom_position(size, side).await {
                Ok(_) => {
                    let workflow = state.workflow.lock().unwrap();
                    if let Some(analysis) = workflow.analysis() {
                        println!("{}", render::render_analysis(analysis));
                    }
                }
                Err(e) => println!("!! analyze failed: {}", render::format_error(&e)),
            }
        }
        DemoCommand::Portfolio(kind) => match client.generate_portfolio(kind).await {
            Ok(p) => println!(
                "generated {} | AUM {} | {} net BTC @ {}",
                p.fund_type.as_deref().unwrap_or("fund"),
                render::format_usd(p.aum),
                render::format_btc(p.net_btc_exposure),
                render::format_usd(p.current_btc_price),
            ),
            Err(e) => println!("!! portfolio generation failed: {}", render::format_error(&e)),
        },
        DemoCommand::Build(positions) => match client.create_custom_portfolio(positions).await {
            Ok(p) => println!(
                "built custom book | net {} | gross {} | value {}",
                render::format_btc(p.net_btc_exposure),
                p.gross_btc_exposure
                    .map(render::format_btc)
                    .unwrap_or_else(|| "—".to_string()),
                render::format_usd(p.total_current_value),
            ),
            Err(e) => println!("!! custom book failed: {}", render::format_error(&e)),
        },
        DemoCommand::Strategies => match client.generate_strategies().await {
            Ok(strategies) => {
                println!("{}", render::render_strategies(&strategies, round_contracts))
            }
            Err(e) => println!("!! strategy generation failed: {}", render::format_error(&e)),
        },
        DemoCommand::Select(strategy_type) => {
            match client.select_strategy(&strategy_type).await {
                Ok(report) => println!("{}", render::render_execution(&report, round_contracts)),
                Err(e) => println!("!! select/execute failed: {}", render::format_error(&e)),
            }
        }
        DemoCommand::Execute => match client.execute_strategy().await {
            Ok(report) => println!("{}", render::render_execution(&report, round_contracts)),
            Err(e) => println!("!! execution failed: {}", render::format_error(&e)),
        },
        DemoCommand::Market => {
            println!("{}", render::render_market(&state.market.read().unwrap()));
        }
        DemoCommand::Exposure => {
            println!("{}", render::render_exposure(state.exposure.read().unwrap().as_ref()));
        }
        DemoCommand::Status => {
            {
                let workflow = state.workflow.lock().unwrap();
                println!("step {}/4 ({})", workflow.step(), workflow.stage_name());
                if let Some(execution) = workflow.execution() {
                    println!("{}", render::render_execution(execution, round_contracts));
                }
            }
            println!("{}", render::render_market(&state.market.read().unwrap()));
            println!("{}", render::render_exposure(state.exposure.read().unwrap().as_ref()));
            let events = state.events.lock().unwrap();
            for entry in events.iter().rev().take(5) {
                println!("  {} [{}] {}", entry.ts, entry.kind, entry.detail);
            }
        }
        DemoCommand::Reset => {
            client.reset();
            println!("reset — back to step 1");
        }
        DemoCommand::Help => println!("{}", render::help_text()),
        DemoCommand::Quit => unreachable!("handled by the loop"),
    }
}
