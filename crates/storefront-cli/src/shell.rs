//! Interactive cart session.
//!
//! One engine lives for the whole session, so lines held in local mode,
//! `clear` and `sync` carry over from one command to the next.

use clap::{Parser, Subcommand};
use storefront_api::CommerceClient;
use storefront_cart::CartEngine;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::cart::{self, print_cart, CartCommands};

/// One line typed into the shell.
#[derive(Debug, Parser)]
#[command(no_binary_name = true)]
pub(crate) struct ShellLine {
    #[command(subcommand)]
    pub(crate) command: ShellCommand,
}

#[derive(Debug, Subcommand)]
pub(crate) enum ShellCommand {
    #[command(flatten)]
    Cart(CartCommands),
    /// Empty the cart for the rest of this session; the remote cart is not touched
    Clear,
    /// Push lines and edits made offline to the remote cart
    Sync,
    /// Leave the shell
    #[command(alias = "quit")]
    Exit,
}

/// Reads commands from `input` until `exit` or end of input.
///
/// A bad or failing command is reported and the session continues.
///
/// # Errors
///
/// Fails only if `input` cannot be read.
pub(crate) async fn run<R>(
    engine: &CartEngine<CommerceClient>,
    client: &CommerceClient,
    input: R,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    println!("cart shell: show, add, update, remove, clear, sync, exit (help for details)");
    print_cart(&engine.view());

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        let words: Vec<&str> = line.split_whitespace().collect();
        if words.is_empty() {
            continue;
        }
        let command = match ShellLine::try_parse_from(words) {
            Ok(parsed) => parsed.command,
            Err(err) => {
                println!("{err}");
                continue;
            }
        };

        match command {
            ShellCommand::Exit => break,
            ShellCommand::Cart(command) => {
                if let Err(err) = cart::run(engine, client, command).await {
                    eprintln!("error: {err:#}");
                }
            }
            ShellCommand::Clear => {
                engine.clear_cart();
                println!("cart cleared for this session");
                print_cart(&engine.view());
            }
            ShellCommand::Sync => {
                let report = engine.reconcile().await;
                println!(
                    "sync: {} change(s) pushed, {} still local, mode {}",
                    report.replayed, report.pending, report.mode
                );
                print_cart(&engine.view());
            }
        }
    }
    Ok(())
}
