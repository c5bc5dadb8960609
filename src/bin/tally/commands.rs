//! Command execution

use std::io;

use thiserror::Error;
use tracing::info;

use tally::{
    cart::CartError,
    display::DisplayError,
    items::LineItemId,
    receipt::{self, ReceiptError},
    session::{CartSession, CheckoutError},
    snapshot::{FileStore, SnapshotError},
};

use crate::config::{Command, Config};

/// Errors surfaced by the CLI.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    #[error(transparent)]
    Display(#[from] DisplayError),

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    #[error(transparent)]
    Receipt(#[from] ReceiptError),
}

/// Open the configured cart, run the command and render the result to `out`.
pub(crate) fn run(config: Config, out: impl io::Write) -> Result<(), CliError> {
    let display = config.cart.display()?;
    let store = FileStore::in_dir(&config.store.store_dir, &config.store.cart_key)?;

    info!(path = %store.path().display(), "opening cart");

    let mut session = CartSession::open(store, config.cart.merge_policy.into());

    match config.command {
        Command::Show => {}
        Command::Add(args) => session.add_item(args.into())?,
        Command::Remove { id } => session.remove_item(&LineItemId::new(id))?,
        Command::SetQuantity { id, quantity } => {
            session.set_quantity(&LineItemId::new(id), quantity)?;
        }
        Command::Clear => session.clear(),
        Command::Checkout => {
            let order = session.complete_checkout()?;

            receipt::write_order(out, &order, &display)?;

            return Ok(());
        }
    }

    receipt::write_cart(out, session.cart(), &display)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use clap::Parser;
    use tempfile::tempdir;
    use testresult::TestResult;

    use super::*;

    fn run_args(dir: &Path, args: &[&str]) -> Result<String, Box<dyn std::error::Error>> {
        let store_dir = dir.to_string_lossy();
        let mut argv = vec!["tally", "--store-dir", &*store_dir];

        argv.extend_from_slice(args);

        let config = Config::try_parse_from(argv)?;
        let mut out = Vec::new();

        run(config, &mut out)?;

        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn edits_persist_between_runs() -> TestResult {
        let dir = tempdir()?;
        let add = [
            "add", "--product", "p1", "--name", "Shirt", "--price", "10", "--variant", "M",
        ];

        run_args(dir.path(), &add)?;
        run_args(dir.path(), &add)?;

        let shown = run_args(dir.path(), &["show"])?;

        assert!(shown.contains(" Items:    2"), "unexpected output {shown}");
        assert!(shown.contains(" Subtotal: 20.00"), "unexpected output {shown}");

        run_args(dir.path(), &["set-quantity", "p1-M", "0"])?;

        assert_eq!(run_args(dir.path(), &["show"])?, "Cart is empty\n");

        Ok(())
    }

    #[test]
    fn checkout_empties_the_cart() -> TestResult {
        let dir = tempdir()?;

        run_args(
            dir.path(),
            &["add", "--product", "p2", "--name", "Cap", "--price", "5"],
        )?;

        let receipt = run_args(dir.path(), &["checkout"])?;

        assert!(receipt.starts_with("Order placed"), "unexpected output {receipt}");
        assert_eq!(run_args(dir.path(), &["show"])?, "Cart is empty\n");

        Ok(())
    }

    #[test]
    fn checkout_of_empty_cart_is_an_error() -> TestResult {
        let dir = tempdir()?;
        let config = Config::try_parse_from([
            "tally",
            "--store-dir",
            &*dir.path().to_string_lossy(),
            "checkout",
        ])?;

        let result = run(config, Vec::new());

        assert!(
            matches!(result, Err(CliError::Checkout(CheckoutError::EmptyCart))),
            "unexpected result {result:?}"
        );

        Ok(())
    }
}
